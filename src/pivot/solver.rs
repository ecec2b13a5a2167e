//! The Lemke-Howson driver.
//!
//! Pivots alternate between the row player's and the column player's
//! tableau. Each pivot drops one label; that label is picked up by pivoting
//! it into the other tableau, and so on, until both tableaux together carry
//! every label again. The vertex pair reached at that point is a Nash
//! equilibrium on non-degenerate games.
//!
//! ```text
//!   drop initial label
//!          │
//!          ▼
//!   ┌─────────────┐  dropped label   ┌─────────────┐
//!   │ row tableau │ ───────────────▶ │ col tableau │
//!   │   (from B)  │ ◀─────────────── │   (from A)  │
//!   └─────────────┘  dropped label   └─────────────┘
//!          │
//!          ▼  union of non-basic sets == all labels
//!   extract strategies
//! ```
//!
//! Degenerate games can make the walk misbehave. Every such case is reported
//! through [`Outcome`] with a warning instead of an error, so callers can
//! simply retry from another label.

use std::time::Instant;

use log::{debug, warn};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::pivot::config::{ConfigError, PivotConfig, PivotStats};
use crate::pivot::tableau::{
    create_col_tableau, create_row_tableau, LabelSet, PivotError, PivotRule, Tableau,
};
use crate::pivot::trace::{CycleGuard, PivotStep, PivotTrace, Side};

/// Errors raised before any pivoting happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// `A` and `B` do not have the same shape.
    #[error("payoff matrices have different shapes: A is {row:?}, B is {col:?}")]
    ShapeMismatch {
        /// Shape of the row player's payoffs.
        row: (usize, usize),
        /// Shape of the column player's payoffs.
        col: (usize, usize),
    },
    /// One of the players has no strategies.
    #[error("game has no strategies: shape {0:?}")]
    EmptyGame((usize, usize)),
    /// A payoff is NaN or infinite.
    #[error("payoff at ({row}, {col}) is not finite")]
    NonFinitePayoff {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
    },
    /// The configuration does not fit this game.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Check that two payoff matrices describe a solvable game.
pub fn validate_payoffs<'a>(
    a: ArrayView2<'a, f64>,
    b: ArrayView2<'a, f64>,
) -> Result<(), SolverError> {
    if a.dim() != b.dim() {
        return Err(SolverError::ShapeMismatch {
            row: a.dim(),
            col: b.dim(),
        });
    }

    let (m, n) = a.dim();
    if m == 0 || n == 0 {
        return Err(SolverError::EmptyGame((m, n)));
    }

    for payoffs in [a, b] {
        if let Some(((row, col), _)) = payoffs.indexed_iter().find(|(_, x)| !x.is_finite()) {
            return Err(SolverError::NonFinitePayoff { row, col });
        }
    }

    Ok(())
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Both vectors are probability vectors of the right length.
    Equilibrium,
    /// The walk completed on a degenerate vertex and a strategy has the wrong
    /// number of entries.
    Malformed {
        /// Length of the row strategy.
        row_len: usize,
        /// Length of the column strategy.
        col_len: usize,
    },
    /// Lengths are right but a vector has NaN or negative entries, or does
    /// not sum to one.
    NotProbability,
    /// A pivot failed.
    Stalled {
        /// Tableau being pivoted.
        side: Side,
        /// Entering label.
        label: usize,
        /// What went wrong.
        error: PivotError,
    },
    /// The walk came back to a state it had already visited.
    Cycled {
        /// Tableau about to be pivoted.
        side: Side,
        /// Entering label.
        label: usize,
    },
    /// The configured pivot limit was reached.
    PivotLimit {
        /// Pivots performed.
        pivots: u64,
    },
}

impl Outcome {
    /// Whether the run produced a valid equilibrium.
    pub fn is_equilibrium(&self) -> bool {
        matches!(self, Outcome::Equilibrium)
    }

    /// Whether the walk was cut short before becoming fully labeled.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self,
            Outcome::Stalled { .. } | Outcome::Cycled { .. } | Outcome::PivotLimit { .. }
        )
    }
}

/// Result of one Lemke-Howson run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equilibrium {
    /// The label dropped first.
    pub initial_dropped_label: usize,
    /// Pivot rule used for both tableaux.
    pub rule: PivotRule,
    /// Row player's mixed strategy.
    pub row_strategy: Vec<f64>,
    /// Column player's mixed strategy.
    pub col_strategy: Vec<f64>,
    /// How the run ended.
    pub outcome: Outcome,
    /// Every pivot in order.
    pub trace: PivotTrace,
    /// Run statistics.
    pub stats: PivotStats,
}

impl Equilibrium {
    /// Whether the strategies form a valid equilibrium.
    pub fn is_valid(&self) -> bool {
        self.outcome.is_equilibrium()
    }

    /// `(row_strategy, col_strategy)`.
    pub fn strategies(&self) -> (&[f64], &[f64]) {
        (&self.row_strategy, &self.col_strategy)
    }
}

/// Whether `v` is non-negative and sums to one within `tolerance`.
pub fn is_probability_vector(v: &[f64], tolerance: f64) -> bool {
    if v.iter().any(|x| !x.is_finite() || *x < -tolerance) {
        return false;
    }
    (v.iter().sum::<f64>() - 1.0).abs() <= tolerance
}

fn classify(row: &[f64], col: &[f64], (m, n): (usize, usize), tolerance: f64) -> Outcome {
    if row.len() != m || col.len() != n {
        Outcome::Malformed {
            row_len: row.len(),
            col_len: col.len(),
        }
    } else if !is_probability_vector(row, tolerance) || !is_probability_vector(col, tolerance) {
        Outcome::NotProbability
    } else {
        Outcome::Equilibrium
    }
}

/// Lemke-Howson solver for one bimatrix game.
///
/// # Example
/// ```
/// use lemke_howson::pivot::{LemkeHowson, PivotConfig};
/// use ndarray::array;
///
/// let a = array![[1.0, -1.0], [-1.0, 1.0]];
/// let b = array![[-1.0, 1.0], [1.0, -1.0]];
/// let solver = LemkeHowson::new(a, b, PivotConfig::default()).unwrap();
///
/// let eq = solver.solve();
/// assert!(eq.is_valid());
/// assert_eq!(eq.row_strategy, vec![0.5, 0.5]);
/// ```
#[derive(Debug, Clone)]
pub struct LemkeHowson {
    row_payoffs: Array2<f64>,
    col_payoffs: Array2<f64>,
    config: PivotConfig,
}

impl LemkeHowson {
    /// Create a solver for the game `(A, B)`.
    ///
    /// # Arguments
    /// * `row_payoffs` - `A`, the row player's payoffs
    /// * `col_payoffs` - `B`, the column player's payoffs (same shape)
    /// * `config` - Run configuration, validated against the game
    pub fn new(
        row_payoffs: Array2<f64>,
        col_payoffs: Array2<f64>,
        config: PivotConfig,
    ) -> Result<Self, SolverError> {
        validate_payoffs(row_payoffs.view(), col_payoffs.view())?;
        let (m, n) = row_payoffs.dim();
        config.validate(m + n)?;

        Ok(Self {
            row_payoffs,
            col_payoffs,
            config,
        })
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

    /// The configuration this solver was built with.
    pub fn config(&self) -> &PivotConfig {
        &self.config
    }

    /// Run from the configured initial label.
    pub fn solve(&self) -> Equilibrium {
        self.run(&self.config)
    }

    /// Run from `label`, keeping every other setting.
    pub fn solve_from(&self, label: usize) -> Result<Equilibrium, SolverError> {
        let config = self.config.clone().with_label(label);
        config.validate(self.num_labels())?;
        Ok(self.run(&config))
    }

    /// Run once from every label, in label order.
    ///
    /// Runs are independent and execute on the rayon pool. Different labels
    /// may reach the same equilibrium.
    pub fn enumerate(&self) -> Vec<Equilibrium> {
        (0..self.num_labels())
            .into_par_iter()
            .map(|label| self.run(&self.config.clone().with_label(label)))
            .collect()
    }

    fn run(&self, config: &PivotConfig) -> Equilibrium {
        let start_time = Instant::now();
        let rule = PivotRule::from_lexicographic(config.lexicographic);
        let (m, n) = self.shape();

        let mut col_tableau = create_col_tableau(self.row_payoffs.view(), rule);
        let mut row_tableau = create_row_tableau(self.col_payoffs.view(), rule);

        let label = config.initial_dropped_label;
        let mut side = if row_tableau.non_basic_variables().contains(&label) {
            Side::Row
        } else {
            Side::Col
        };
        let mut entering = label;

        let mut trace = PivotTrace::new();
        let mut stats = PivotStats::new();
        let mut guard = CycleGuard::new();

        debug!(
            "lemke-howson on {}x{} game from label {} ({} rule), {} tableau first",
            m, n, label, rule, side
        );

        let interrupted = loop {
            if let Some(limit) = config.max_pivots {
                if stats.pivots >= limit {
                    break Some(Outcome::PivotLimit {
                        pivots: stats.pivots,
                    });
                }
            }

            if config.detect_cycles {
                let row_nb = row_tableau.non_basic_variables();
                let col_nb = col_tableau.non_basic_variables();
                if !guard.visit(side, entering, &row_nb, &col_nb) {
                    break Some(Outcome::Cycled {
                        side,
                        label: entering,
                    });
                }
            }

            let tableau = match side {
                Side::Row => &mut row_tableau,
                Side::Col => &mut col_tableau,
            };
            let pivot = match tableau.pivot(entering) {
                Ok(pivot) => pivot,
                Err(error) => {
                    break Some(Outcome::Stalled {
                        side,
                        label: entering,
                        error,
                    })
                }
            };

            debug!(
                "{} tableau: label {} entered on row {}, label {} dropped",
                side, entering, pivot.pivot_row, pivot.dropped
            );

            stats.pivots += 1;
            match side {
                Side::Row => stats.row_pivots += 1,
                Side::Col => stats.col_pivots += 1,
            }
            if pivot.tie_broken {
                stats.tie_breaks += 1;
            }
            trace.push(PivotStep {
                side,
                entering,
                pivot_row: pivot.pivot_row,
                dropped: pivot.dropped,
                tie_broken: pivot.tie_broken,
            });

            entering = pivot.dropped;
            side = side.other();

            if is_fully_labeled(&row_tableau, &col_tableau, m + n) {
                break None;
            }
        };

        let (row_strategy, col_strategy, outcome) = match interrupted {
            Some(outcome) => (vec![f64::NAN; m], vec![f64::NAN; n], outcome),
            None => {
                let row = row_tableau.to_strategy(&col_tableau.non_basic_variables());
                let col = col_tableau.to_strategy(&row_tableau.non_basic_variables());
                let outcome = classify(&row, &col, (m, n), config.tolerance);
                (row, col, outcome)
            }
        };

        stats.elapsed_seconds = start_time.elapsed().as_secs_f64();

        if !outcome.is_equilibrium() {
            warn!(
                "label {} ({} rule) did not reach a valid equilibrium after {} pivots: {:?}",
                label, rule, stats.pivots, outcome
            );
        }

        Equilibrium {
            initial_dropped_label: label,
            rule,
            row_strategy,
            col_strategy,
            outcome,
            trace,
            stats,
        }
    }
}

fn is_fully_labeled(row_tableau: &Tableau, col_tableau: &Tableau, num_labels: usize) -> bool {
    let row_nb = row_tableau.non_basic_variables();
    let col_nb = col_tableau.non_basic_variables();
    let carried: LabelSet = row_nb.union(&col_nb).copied().collect();
    carried.len() == num_labels
}

/// Compute an equilibrium by complementary pivoting.
///
/// # Arguments
/// * `a` - Row player's payoff matrix
/// * `b` - Column player's payoff matrix
/// * `initial_dropped_label` - Label to drop first, in `[0, m + n)`
/// * `lexicographic` - Use lexicographic tie-breaking in the ratio test
///
/// # Returns
/// The run result. Degenerate games may produce an invalid result, flagged in
/// [`Equilibrium::outcome`].
pub fn lemke_howson(
    a: &Array2<f64>,
    b: &Array2<f64>,
    initial_dropped_label: usize,
    lexicographic: bool,
) -> Result<Equilibrium, SolverError> {
    let config = PivotConfig::new()
        .with_label(initial_dropped_label)
        .with_lexicographic(lexicographic);
    LemkeHowson::new(a.clone(), b.clone(), config).map(|solver| solver.solve())
}

/// Run [`lemke_howson`] from every label, in label order.
pub fn lemke_howson_enumeration(
    a: &Array2<f64>,
    b: &Array2<f64>,
    lexicographic: bool,
) -> Result<Vec<Equilibrium>, SolverError> {
    let config = PivotConfig::new().with_lexicographic(lexicographic);
    LemkeHowson::new(a.clone(), b.clone(), config).map(|solver| solver.enumerate())
}
