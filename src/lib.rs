//! Goban: a Go rules engine with a heuristic automated player.
//!
//! The crate keeps track of a game of Go on an NxN board: legality (ko and
//! suicide), captures, undo history, territory scoring, and a one-ply
//! heuristic move evaluator that runs off the caller's thread.
//!
//! ## Modules
//!
//! - [`board`] - Grid, colors and coordinates
//! - [`group`] - Flood fill, groups and liberties
//! - [`rules`] - Move legality
//! - [`capture`] - Stone placement and capture resolution
//! - [`session`] - Turn state machine, history and the automated player
//! - [`scoring`] - Territory attribution and final score
//! - [`evaluator`] - Heuristic move selection
//! - [`worker`] - Background evaluation with stale-reply protection
//! - [`gtp`] - Go Text Protocol front end
//! - [`config`], [`constants`], [`error`] - Configuration, tuning values, errors
//!
//! ## Example
//!
//! ```
//! use goban::config::Config;
//! use goban::session::{GameSession, GameState};
//!
//! let mut session = GameSession::new(Config::default()).unwrap();
//! session.play(6, 6).unwrap();
//!
//! // Let the engine answer for White.
//! session.request_evaluation().unwrap();
//! let event = session.wait_evaluation().unwrap();
//! println!("{}", event.grid);
//!
//! session.pass().unwrap();
//! let event = session.pass().unwrap();
//! assert!(matches!(event.state, GameState::Finished(_)));
//! ```

pub mod board;
pub mod capture;
pub mod config;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod group;
pub mod gtp;
pub mod rules;
pub mod scoring;
pub mod session;
pub mod worker;

pub use board::{Color, Grid, Move, Point};
pub use config::Config;
pub use error::{ConfigError, MoveError, SessionError};
pub use session::{EventKind, GameSession, GameState, SessionEvent};
