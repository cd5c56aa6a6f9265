//! Session configuration.
//!
//! A [`Config`] is fixed when a session is created. It can be built in code,
//! loaded from a TOML file (missing keys fall back to defaults), and is
//! validated before use.
//!
//! ```toml
//! board_size = 9
//! komi = 5.5
//! shortlist = 8
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_KOMI, DEFAULT_OPENING_ACCEPT, DEFAULT_OPENING_MOVES,
    DEFAULT_SEARCH_RADIUS, DEFAULT_SHORTLIST, MAX_BOARD_SIZE, MIN_BOARD_SIZE,
};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Board side length
    pub board_size: usize,
    /// Compensation added to White's total
    pub komi: f32,
    /// Move count below which the evaluator prefers star points
    pub opening_moves: usize,
    /// Probability of taking a free star point during the opening
    pub opening_accept: f64,
    /// Candidates that get tactical verification
    pub shortlist: usize,
    /// Chebyshev distance from existing stones for candidate generation
    pub search_radius: usize,
    /// Seed for the evaluator's RNG (random when unset)
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            komi: DEFAULT_KOMI,
            opening_moves: DEFAULT_OPENING_MOVES,
            opening_accept: DEFAULT_OPENING_ACCEPT,
            shortlist: DEFAULT_SHORTLIST,
            search_radius: DEFAULT_SEARCH_RADIUS,
            seed: None,
        }
    }
}

impl Config {
    /// Default configuration on a board of the given size.
    pub fn with_board_size(board_size: usize) -> Self {
        Self {
            board_size,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if !self.komi.is_finite() {
            return Err(ConfigError::Komi(self.komi));
        }
        if self.shortlist == 0 {
            return Err(ConfigError::Zero("shortlist"));
        }
        if self.search_radius == 0 {
            return Err(ConfigError::Zero("search_radius"));
        }
        if !(0.0..=1.0).contains(&self.opening_accept) {
            return Err(ConfigError::Probability(self.opening_accept));
        }
        Ok(())
    }

    /// RNG for the evaluator, seeded when the config asks for reproducibility.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
