//! Error types for move legality, session transitions, and configuration.
//!
//! None of these are fatal: every error leaves the session in its last
//! valid state and can be surfaced to the player as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Why a stone placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// Coordinates fall outside the board
    #[error("illegal move: point is off the board")]
    OutOfBounds,
    /// Point is not empty
    #[error("illegal move: point is occupied")]
    Occupied,
    /// Move immediately retakes a ko
    #[error("illegal move: retakes ko")]
    Ko,
    /// Move would leave its own group without liberties and captures nothing
    #[error("illegal move: suicide")]
    Suicide,
}

/// A session operation that was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    IllegalMove(#[from] MoveError),
    #[error("game is already finished")]
    GameFinished,
    #[error("nothing to undo")]
    NothingToUndo,
    #[error("waiting for the automated player")]
    EvaluationPending,
    #[error("no evaluation is outstanding")]
    NoEvaluationPending,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
    #[error("board size {0} is outside the supported range")]
    BoardSize(usize),
    #[error("{0} must be at least 1")]
    Zero(&'static str),
    #[error("komi {0} is not a finite number")]
    Komi(f32),
    #[error("opening acceptance {0} is not a probability")]
    Probability(f64),
}
