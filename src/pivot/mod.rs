//! Complementary pivoting for bimatrix games.
//!
//! This module contains the Lemke-Howson algorithm and the tableau machinery
//! it runs on. It is independent of how games are stored or loaded; it only
//! needs the two payoff matrices.
//!
//! ## Components
//!
//! - [`tableau`]: Tableau construction, the ratio test and integer pivoting
//! - [`lex`]: Lexicographic tie-breaking for degenerate ratio tests
//! - [`solver`]: The alternating driver and strategy extraction
//! - [`trace`]: Pivot history and cycle detection
//! - [`config`]: Run configuration and statistics
//!
//! ## Example
//!
//! ```
//! use lemke_howson::pivot::lemke_howson;
//! use ndarray::array;
//!
//! let a = array![[3.0, 3.0], [2.0, 5.0], [0.0, 6.0]];
//! let b = array![[3.0, 2.0], [2.0, 6.0], [3.0, 1.0]];
//!
//! let eq = lemke_howson(&a, &b, 0, true).unwrap();
//! assert!(eq.is_valid());
//! assert_eq!(eq.row_strategy, vec![1.0, 0.0, 0.0]);
//! assert_eq!(eq.col_strategy, vec![1.0, 0.0]);
//! ```

pub mod config;
pub mod lex;
pub mod solver;
pub mod tableau;
pub mod trace;

pub use config::{ConfigError, PivotConfig, PivotStats};
pub use solver::{
    is_probability_vector, lemke_howson, lemke_howson_enumeration, validate_payoffs,
    Equilibrium, LemkeHowson, Outcome, SolverError,
};
pub use tableau::{
    build_tableau_matrix, create_col_tableau, create_row_tableau, LabelSet, Pivot, PivotError,
    PivotRule, Tableau,
};
pub use trace::{CycleGuard, PivotStep, PivotTrace, Side};
