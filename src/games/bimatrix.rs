//! Two-player normal-form games.
//!
//! [`BimatrixGame`] owns a validated pair of payoff matrices and is the
//! game-facing entry point to the pivoting solver. Games can be loaded from
//! and saved to JSON:
//!
//! ```json
//! {
//!   "name": "matching_pennies",
//!   "row_payoffs": [[1, -1], [-1, 1]],
//!   "col_payoffs": [[-1, 1], [1, -1]]
//! }
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pivot::{validate_payoffs, Equilibrium, LemkeHowson, PivotConfig, SolverError};

/// Tolerance used by [`BimatrixGame::is_best_response`].
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised when building, loading or solving a game.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    /// Reading or writing a game file failed.
    #[error("IO error: {0}")]
    Io(String),
    /// A game file is not valid JSON for a game.
    #[error("parse error: {0}")]
    Parse(String),
    /// A payoff row has a different length than the first row.
    #[error("{matrix} row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        /// Which matrix (`row_payoffs` or `col_payoffs`).
        matrix: &'static str,
        /// Offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// The payoff matrices do not form a solvable game, or the run
    /// configuration does not fit it.
    #[error(transparent)]
    Solver(#[from] SolverError),
    /// A random game configuration is unusable.
    #[error("invalid random game configuration: {0}")]
    InvalidRandomConfig(String),
}

// ============================================================================
// Game File
// ============================================================================

/// On-disk representation of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFile {
    /// Optional display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Row player's payoffs, one inner list per row strategy.
    pub row_payoffs: Vec<Vec<f64>>,
    /// Column player's payoffs, same shape.
    pub col_payoffs: Vec<Vec<f64>>,
}

fn to_array(matrix: &'static str, rows: &[Vec<f64>]) -> Result<Array2<f64>, GameError> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != width)
    {
        return Err(GameError::RaggedRow {
            matrix,
            row,
            expected: width,
            found,
        });
    }

    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), width), flat)
        .map_err(|e| GameError::Parse(e.to_string()))
}

fn to_rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.outer_iter().map(|row| row.to_vec()).collect()
}

// ============================================================================
// Bimatrix Game
// ============================================================================

/// A two-player game in normal form.
///
/// # Example
/// ```
/// use lemke_howson::games::BimatrixGame;
/// use ndarray::array;
///
/// let game = BimatrixGame::zero_sum(array![[1.0, -1.0], [-1.0, 1.0]]).unwrap();
/// let eq = game.lemke_howson(0).unwrap();
/// assert_eq!(game.is_best_response(&eq.row_strategy, &eq.col_strategy), (true, true));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BimatrixGame {
    name: Option<String>,
    row_payoffs: Array2<f64>,
    col_payoffs: Array2<f64>,
}

impl BimatrixGame {
    /// Create a game from the row player's payoffs `A` and the column
    /// player's payoffs `B`.
    pub fn new(row_payoffs: Array2<f64>, col_payoffs: Array2<f64>) -> Result<Self, GameError> {
        validate_payoffs(row_payoffs.view(), col_payoffs.view())?;
        Ok(Self {
            name: None,
            row_payoffs,
            col_payoffs,
        })
    }

    /// Create the zero-sum game `(A, -A)`.
    pub fn zero_sum(row_payoffs: Array2<f64>) -> Result<Self, GameError> {
        let col_payoffs = row_payoffs.mapv(|x| -x);
        Self::new(row_payoffs, col_payoffs)
    }

    /// Game built from matrices known to be valid.
    pub(crate) fn named_unchecked(
        name: &str,
        row_payoffs: Array2<f64>,
        col_payoffs: Array2<f64>,
    ) -> Self {
        Self {
            name: Some(name.to_string()),
            row_payoffs,
            col_payoffs,
        }
    }

    /// Builder method: set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Row player's payoffs `A`.
    pub fn row_payoffs(&self) -> &Array2<f64> {
        &self.row_payoffs
    }

    /// Column player's payoffs `B`.
    pub fn col_payoffs(&self) -> &Array2<f64> {
        &self.col_payoffs
    }

    /// `(m, n)`: number of row and column strategies.
    pub fn shape(&self) -> (usize, usize) {
        self.row_payoffs.dim()
    }

    /// Number of labels, `m + n`.
    pub fn num_labels(&self) -> usize {
        let (m, n) = self.shape();
        m + n
    }

    // ------------------------------------------------------------------------
    // JSON
    // ------------------------------------------------------------------------

    /// Load a game from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GameError::Io(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse a game from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, GameError> {
        let file: GameFile =
            serde_json::from_str(json).map_err(|e| GameError::Parse(e.to_string()))?;
        Self::from_game_file(file)
    }

    /// Build a game from its on-disk representation.
    pub fn from_game_file(file: GameFile) -> Result<Self, GameError> {
        let row_payoffs = to_array("row_payoffs", &file.row_payoffs)?;
        let col_payoffs = to_array("col_payoffs", &file.col_payoffs)?;
        let game = Self::new(row_payoffs, col_payoffs)?;
        Ok(match file.name {
            Some(name) => game.with_name(name),
            None => game,
        })
    }

    /// On-disk representation of this game.
    pub fn to_game_file(&self) -> GameFile {
        GameFile {
            name: self.name.clone(),
            row_payoffs: to_rows(&self.row_payoffs),
            col_payoffs: to_rows(&self.col_payoffs),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, GameError> {
        serde_json::to_string_pretty(&self.to_game_file()).map_err(|e| GameError::Parse(e.to_string()))
    }

    /// Save to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), GameError> {
        let json = self.to_json_string()?;
        let mut file = File::create(path).map_err(|e| GameError::Io(e.to_string()))?;
        file.write_all(json.as_bytes())
            .map_err(|e| GameError::Io(e.to_string()))
    }

    // ------------------------------------------------------------------------
    // Solving
    // ------------------------------------------------------------------------

    fn solver(&self, config: PivotConfig) -> Result<LemkeHowson, GameError> {
        Ok(LemkeHowson::new(
            self.row_payoffs.clone(),
            self.col_payoffs.clone(),
            config,
        )?)
    }

    /// Run Lemke-Howson from `initial_dropped_label` with lexicographic
    /// tie-breaking.
    pub fn lemke_howson(&self, initial_dropped_label: usize) -> Result<Equilibrium, GameError> {
        self.lemke_howson_with(PivotConfig::new().with_label(initial_dropped_label))
    }

    /// Run Lemke-Howson with a full configuration.
    pub fn lemke_howson_with(&self, config: PivotConfig) -> Result<Equilibrium, GameError> {
        Ok(self.solver(config)?.solve())
    }

    /// Run Lemke-Howson from every label with lexicographic tie-breaking.
    ///
    /// Results are in label order; the same equilibrium may appear several
    /// times and degenerate games may produce flagged results. Errors from
    /// building the solver are returned rather than swallowed.
    pub fn lemke_howson_enumeration(&self) -> Result<Vec<Equilibrium>, GameError> {
        self.lemke_howson_enumeration_with(PivotConfig::new())
    }

    /// Run Lemke-Howson from every label. The configured initial label is
    /// ignored.
    pub fn lemke_howson_enumeration_with(
        &self,
        config: PivotConfig,
    ) -> Result<Vec<Equilibrium>, GameError> {
        Ok(self.solver(config.with_label(0))?.enumerate())
    }

    /// Distinct valid equilibria reached from any label.
    ///
    /// Two equilibria are the same when every entry differs by at most
    /// `tolerance`. Order follows the first label reaching each one.
    pub fn equilibria(&self, tolerance: f64) -> Result<Vec<(Vec<f64>, Vec<f64>)>, GameError> {
        let mut found: Vec<(Vec<f64>, Vec<f64>)> = Vec::new();
        for eq in self.lemke_howson_enumeration()? {
            if !eq.is_valid() {
                continue;
            }
            let duplicate = found.iter().any(|(x, y)| {
                approx_eq(x, &eq.row_strategy, tolerance) && approx_eq(y, &eq.col_strategy, tolerance)
            });
            if !duplicate {
                found.push((eq.row_strategy, eq.col_strategy));
            }
        }
        Ok(found)
    }

    // ------------------------------------------------------------------------
    // Analysis
    // ------------------------------------------------------------------------

    /// Expected payoffs `(xᵀAy, xᵀBy)`.
    pub fn payoffs(&self, row_strategy: &[f64], col_strategy: &[f64]) -> (f64, f64) {
        let x = Array1::from(row_strategy.to_vec());
        let y = Array1::from(col_strategy.to_vec());
        (
            x.dot(&self.row_payoffs.dot(&y)),
            x.dot(&self.col_payoffs.dot(&y)),
        )
    }

    /// Check whether each strategy is a best response to the other.
    ///
    /// # Returns
    /// `(row_is_best_response, col_is_best_response)`. Only strategies
    /// played with positive probability are judged. Strategies of the wrong
    /// length are never best responses.
    pub fn is_best_response(&self, row_strategy: &[f64], col_strategy: &[f64]) -> (bool, bool) {
        let (m, n) = self.shape();
        if row_strategy.len() != m || col_strategy.len() != n {
            return (false, false);
        }

        let x = Array1::from(row_strategy.to_vec());
        let y = Array1::from(col_strategy.to_vec());
        let row_utilities = self.row_payoffs.dot(&y);
        let col_utilities = self.col_payoffs.t().dot(&x);

        (
            supports_best_responses(&x, &row_utilities),
            supports_best_responses(&y, &col_utilities),
        )
    }
}

/// Every strategy in the support attains the maximum utility.
fn supports_best_responses(strategy: &Array1<f64>, utilities: &Array1<f64>) -> bool {
    let best = utilities.fold(f64::NEG_INFINITY, |acc, &u| acc.max(u));
    strategy
        .iter()
        .zip(utilities.iter())
        .filter(|&(&p, _)| p > DEFAULT_TOLERANCE)
        .all(|(_, &u)| u >= best - DEFAULT_TOLERANCE)
}

fn approx_eq(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}
