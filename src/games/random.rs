//! Random bimatrix games.
//!
//! Payoffs are drawn uniformly from `[low, high)`. Continuous payoffs give
//! non-degenerate games with probability one; integer payoffs from a small
//! range are a cheap source of degenerate ones.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::games::bimatrix::{BimatrixGame, GameError};

/// Configuration for random game generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomGameConfig {
    /// Number of row strategies.
    pub rows: usize,
    /// Number of column strategies.
    pub cols: usize,
    /// Lower payoff bound (inclusive).
    pub low: f64,
    /// Upper payoff bound (exclusive).
    pub high: f64,
    /// Random seed (None = use entropy).
    pub seed: Option<u64>,
    /// Round payoffs down to integers.
    pub integer: bool,
}

impl Default for RandomGameConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            low: -5.0,
            high: 5.0,
            seed: None,
            integer: false,
        }
    }
}

impl RandomGameConfig {
    /// Create a config for an `rows × cols` game with default bounds.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Default::default()
        }
    }

    /// Builder method: set the payoff range.
    pub fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low = low;
        self.high = high;
        self
    }

    /// Builder method: set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: draw integer payoffs.
    pub fn with_integer_payoffs(mut self, integer: bool) -> Self {
        self.integer = integer;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(GameError::InvalidRandomConfig(format!(
                "shape {}x{} has no strategies",
                self.rows, self.cols
            )));
        }
        if !self.low.is_finite() || !self.high.is_finite() || self.low >= self.high {
            return Err(GameError::InvalidRandomConfig(format!(
                "payoff range [{}, {}) is empty or not finite",
                self.low, self.high
            )));
        }
        Ok(())
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn draw_payoffs(config: &RandomGameConfig, rng: &mut StdRng) -> Array2<f64> {
    Array2::from_shape_simple_fn((config.rows, config.cols), || {
        let x: f64 = rng.gen_range(config.low..config.high);
        if config.integer {
            x.floor()
        } else {
            x
        }
    })
}

/// Generate one random game.
pub fn random_game(config: &RandomGameConfig) -> Result<BimatrixGame, GameError> {
    config.validate()?;
    let mut rng = config.rng();
    let a = draw_payoffs(config, &mut rng);
    let b = draw_payoffs(config, &mut rng);
    BimatrixGame::new(a, b)
}

/// Generate `count` random games from one random stream.
///
/// With a seed the whole batch is reproducible.
pub fn random_games(config: &RandomGameConfig, count: usize) -> Result<Vec<BimatrixGame>, GameError> {
    config.validate()?;
    let mut rng = config.rng();
    (0..count)
        .map(|i| {
            let a = draw_payoffs(config, &mut rng);
            let b = draw_payoffs(config, &mut rng);
            BimatrixGame::new(a, b).map(|game| game.with_name(format!("random_{}", i)))
        })
        .collect()
}
