//! Default configuration values and move-evaluation weights.
//!
//! Everything that tunes the automated player lives here so the scoring
//! pipeline in [`crate::evaluator`] reads as a sequence of named adjustments.

// =============================================================================
// Board and Game Defaults
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_BOARD_SIZE: usize = 13;

/// Smallest supported board.
pub const MIN_BOARD_SIZE: usize = 5;

/// Largest supported board. Bounded by the 25 GTP column letters (A-Z without I).
pub const MAX_BOARD_SIZE: usize = 25;

/// Compensation added to White's total.
pub const DEFAULT_KOMI: f32 = 6.5;

/// Consecutive passes that end the game.
pub const PASSES_TO_END: u32 = 2;

// =============================================================================
// Evaluator Parameters
// =============================================================================

/// Below this move count the evaluator looks at star points first.
pub const DEFAULT_OPENING_MOVES: usize = 14;

/// Probability of accepting a free star point during the opening.
pub const DEFAULT_OPENING_ACCEPT: f64 = 0.4;

/// Number of top candidates that get tactical verification.
pub const DEFAULT_SHORTLIST: usize = 6;

/// Chebyshev radius around existing stones used for candidate generation.
pub const DEFAULT_SEARCH_RADIUS: usize = 2;

// =============================================================================
// Heuristic Weights (first pass)
// =============================================================================

/// Playing on the first line.
pub const EDGE_PENALTY: f64 = -40.0;

/// Playing on the third line (distance 2 from the edge).
pub const THIRD_LINE_BONUS: f64 = 35.0;

/// Playing on the fourth line (distance 3 from the edge).
pub const FOURTH_LINE_BONUS: f64 = 30.0;

/// Any other line.
pub const DEFAULT_LINE_BONUS: f64 = 10.0;

/// Bonus per stone captured by the move.
pub const CAPTURE_BONUS: f64 = 5000.0;

/// Adjacent opponent group left with one liberty.
pub const ATARI_BONUS: f64 = 200.0;

/// Adjacent opponent group left with two liberties.
pub const PRESSURE_BONUS: f64 = 50.0;

/// Upper bound of the random tie-break jitter.
pub const JITTER: f64 = 5.0;

// =============================================================================
// Tactical Penalties (shortlist verification)
// =============================================================================

/// Self-atari that cannot escape a one-ply ladder. Effectively disqualifies.
pub const LADDER_PENALTY: f64 = -8000.0;

/// Self-atari with an escape route.
pub const SELF_ATARI_PENALTY: f64 = -100.0;

/// Stone left with only two liberties and nothing captured.
pub const SHORT_OF_LIBERTIES_PENALTY: f64 = -60.0;

/// Joining own stones without gaining a liberty.
pub const USELESS_CONNECTION_PENALTY: f64 = -150.0;

/// Filling a point whose neighbors are all own stones.
pub const EYE_FILL_PENALTY: f64 = -50.0;
