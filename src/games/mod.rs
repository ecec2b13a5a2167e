//! Bimatrix games for the pivoting solver.
//!
//! This module wraps payoff matrices in a validated game type and provides
//! games to solve. These serve as:
//!
//! 1. **Validation**: Games with known equilibria (prisoner's dilemma,
//!    matching pennies, rock-paper-scissors) verify the solver.
//!
//! 2. **Regression fixtures**: Degenerate games that exercise tie-breaking
//!    and the flagged outcomes.
//!
//! 3. **Benchmarks**: Seeded random games of any size.
//!
//! ## Available Modules
//!
//! - [`bimatrix`]: The [`BimatrixGame`] type, JSON game files, best-response checks
//! - [`classic`]: Named games with known equilibria
//! - [`random`]: Random game generation

pub mod bimatrix;
pub mod classic;
pub mod random;

pub use bimatrix::{BimatrixGame, GameError, GameFile, DEFAULT_TOLERANCE};
pub use random::{random_game, random_games, RandomGameConfig};
