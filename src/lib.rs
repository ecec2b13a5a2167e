//! # Lemke-Howson
//!
//! Nash equilibria of two-player normal-form (bimatrix) games by
//! complementary pivoting.
//!
//! ## Features
//!
//! - **Integer Pivoting**: Tableau updates never divide, so integer payoffs
//!   stay exact until the final strategy extraction
//! - **Lexicographic Tie-Breaking**: Handles degenerate games where the plain
//!   ratio test is ambiguous
//! - **Flagged Outcomes**: Degenerate runs return a tagged result instead of
//!   panicking, so callers can retry from another label
//! - **Label Enumeration**: Every starting label solved in parallel
//! - **Pivot Traces**: Each run records the labels entering and leaving
//!
//! ## Quick Start
//!
//! ```
//! use lemke_howson::games::classic;
//!
//! let game = classic::matching_pennies();
//! let eq = game.lemke_howson(0).unwrap();
//!
//! assert!(eq.is_valid());
//! assert_eq!(eq.row_strategy, vec![0.5, 0.5]);
//! assert_eq!(eq.col_strategy, vec![0.5, 0.5]);
//! ```
//!
//! ## Modules
//!
//! - [`pivot`]: Tableaux, pivot rules and the Lemke-Howson driver
//! - [`games`]: Game type, named games and random games
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       BimatrixGame (A, B)                       │
//! │  - JSON loading           - Best-response checks                │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     LemkeHowson driver                          │
//! │  - Alternating pivots     - Cycle guard / pivot limit           │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!              ┌────────────────┴────────────────┐
//!              ▼                                 ▼
//!       ┌─────────────┐                   ┌─────────────┐
//!       │ Row tableau │                   │ Col tableau │
//!       │   from Bᵀ   │                   │   from A    │
//!       └─────────────┘                   └─────────────┘
//! ```

#![warn(missing_docs)]

/// Complementary pivoting module.
///
/// This is the core module containing the tableau and the Lemke-Howson driver.
pub mod pivot;

/// Game module.
///
/// Contains the bimatrix game type and fixture games.
pub mod games;

// Re-export commonly used types at crate root for convenience
pub use games::{BimatrixGame, GameError};
pub use pivot::{
    lemke_howson, lemke_howson_enumeration, Equilibrium, LemkeHowson, Outcome, PivotConfig,
    PivotRule, SolverError,
};
