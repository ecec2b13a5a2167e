//! Configuration options for the Lemke-Howson driver.
//!
//! This module provides the configuration struct that controls a single
//! pivoting run (starting label, pivot rule, safety limits) and the
//! statistics collected while the run walks the polytope graph.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for a Lemke-Howson run.
///
/// # Example
/// ```
/// use lemke_howson::pivot::PivotConfig;
///
/// let config = PivotConfig::default();
/// assert!(config.lexicographic); // lexicographic tie-breaking is enabled by default
/// assert_eq!(config.initial_dropped_label, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotConfig {
    /// The label dropped first, in `[0, m + n)`.
    ///
    /// Different starting labels may reach different equilibria. Labels
    /// below `m` belong to the row player, the rest to the column player.
    pub initial_dropped_label: usize,

    /// Break ratio-test ties lexicographically.
    ///
    /// Required for most degenerate games; on non-degenerate games both
    /// rules walk the same path.
    pub lexicographic: bool,

    /// Hard cap on the number of pivots across both tableaux.
    ///
    /// Set to `None` to rely on cycle detection alone.
    pub max_pivots: Option<u64>,

    /// Stop the walk when a driver state is visited twice.
    pub detect_cycles: bool,

    /// Tolerance used when checking that results are probability vectors.
    pub tolerance: f64,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            initial_dropped_label: 0,
            lexicographic: true,
            max_pivots: None,
            detect_cycles: true,
            tolerance: 1e-9,
        }
    }
}

impl PivotConfig {
    /// Create a new PivotConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration using the plain max-ratio test with no tie-breaking.
    ///
    /// Kept for comparison; it can walk into malformed vertices on
    /// degenerate games.
    pub fn basic() -> Self {
        Self {
            lexicographic: false,
            ..Default::default()
        }
    }

    /// Configuration using lexicographic tie-breaking (the default).
    pub fn lexicographic() -> Self {
        Self::default()
    }

    /// Builder method: set the initial dropped label.
    pub fn with_label(mut self, label: usize) -> Self {
        self.initial_dropped_label = label;
        self
    }

    /// Builder method: set whether to use lexicographic tie-breaking.
    pub fn with_lexicographic(mut self, enable: bool) -> Self {
        self.lexicographic = enable;
        self
    }

    /// Builder method: cap the number of pivots.
    pub fn with_max_pivots(mut self, max_pivots: u64) -> Self {
        self.max_pivots = Some(max_pivots);
        self
    }

    /// Builder method: enable or disable cycle detection.
    pub fn with_cycle_detection(mut self, enable: bool) -> Self {
        self.detect_cycles = enable;
        self
    }

    /// Builder method: set the probability-vector tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Validate the configuration against a game with `num_labels` labels.
    pub fn validate(&self, num_labels: usize) -> Result<(), ConfigError> {
        if self.initial_dropped_label >= num_labels {
            return Err(ConfigError::LabelOutOfRange {
                label: self.initial_dropped_label,
                num_labels,
            });
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(self.tolerance));
        }

        if self.max_pivots == Some(0) {
            return Err(ConfigError::ZeroPivotLimit);
        }

        // Without either guard a degenerate game may pivot forever.
        if self.max_pivots.is_none() && !self.detect_cycles {
            return Err(ConfigError::Unbounded);
        }

        Ok(())
    }
}

/// Errors that can occur when validating a [`PivotConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The starting label does not exist in the game.
    #[error("initial dropped label {label} is out of range [0, {num_labels})")]
    LabelOutOfRange {
        /// The requested label.
        label: usize,
        /// Number of labels in the game (`m + n`).
        num_labels: usize,
    },
    /// Tolerance is negative or not finite.
    #[error("tolerance {0} must be finite and non-negative")]
    InvalidTolerance(f64),
    /// A pivot limit of zero would never leave the artificial equilibrium.
    #[error("max_pivots must be at least 1")]
    ZeroPivotLimit,
    /// Neither a pivot limit nor cycle detection is configured.
    #[error("either max_pivots or cycle detection must be enabled")]
    Unbounded,
}

/// Statistics tracked during a single pivoting run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotStats {
    /// Total number of pivots performed across both tableaux.
    pub pivots: u64,

    /// Pivots performed on the row player's tableau.
    pub row_pivots: u64,

    /// Pivots performed on the column player's tableau.
    pub col_pivots: u64,

    /// Pivots whose ratio test needed a lexicographic tie-break.
    pub tie_breaks: u64,

    /// Wall-clock time of the run (in seconds).
    pub elapsed_seconds: f64,
}

impl PivotStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pivots per second, or zero if the run took no measurable time.
    pub fn pivots_per_second(&self) -> f64 {
        if self.elapsed_seconds > 0.0 {
            self.pivots as f64 / self.elapsed_seconds
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_lexicographic() {
        let config = PivotConfig::default();
        assert!(config.lexicographic);
        assert!(config.detect_cycles);
        assert_eq!(config.max_pivots, None);
        assert!(config.validate(4).is_ok());
    }

    #[test]
    fn test_builders() {
        let config = PivotConfig::basic()
            .with_label(3)
            .with_max_pivots(50)
            .with_tolerance(1e-6);
        assert!(!config.lexicographic);
        assert_eq!(config.initial_dropped_label, 3);
        assert_eq!(config.max_pivots, Some(50));
        assert_eq!(config.tolerance, 1e-6);
    }

    #[test]
    fn test_validate_rejects_out_of_range_label() {
        let config = PivotConfig::default().with_label(5);
        assert_eq!(
            config.validate(5),
            Err(ConfigError::LabelOutOfRange { label: 5, num_labels: 5 })
        );
    }

    #[test]
    fn test_validate_rejects_unbounded_walk() {
        let config = PivotConfig::default().with_cycle_detection(false);
        assert_eq!(config.validate(4), Err(ConfigError::Unbounded));
        assert!(config.with_max_pivots(100).validate(4).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        let config = PivotConfig::default().with_tolerance(f64::NAN);
        assert!(matches!(config.validate(4), Err(ConfigError::InvalidTolerance(_))));
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = PivotConfig::basic().with_label(2).with_max_pivots(10);
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PivotConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_pivots_per_second() {
        let mut stats = PivotStats::new();
        assert_eq!(stats.pivots_per_second(), 0.0);
        stats.pivots = 10;
        stats.elapsed_seconds = 2.0;
        assert_eq!(stats.pivots_per_second(), 5.0);
    }
}
