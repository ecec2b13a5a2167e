//! Pivot history and cycle detection.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::pivot::tableau::LabelSet;

/// Which player's tableau a pivot was applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The row player's tableau (built from `B`).
    Row,
    /// The column player's tableau (built from `A`).
    Col,
}

impl Side {
    /// The tableau pivoted after this one.
    pub fn other(self) -> Self {
        match self {
            Side::Row => Side::Col,
            Side::Col => Side::Row,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Row => write!(f, "row"),
            Side::Col => write!(f, "col"),
        }
    }
}

/// One pivot of the driver loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotStep {
    /// Tableau that was pivoted.
    pub side: Side,
    /// Label that entered the basis.
    pub entering: usize,
    /// Row chosen by the ratio test.
    pub pivot_row: usize,
    /// Label that left the basis.
    pub dropped: usize,
    /// Whether the lexicographic tie-break decided the row.
    pub tie_broken: bool,
}

/// Ordered record of every pivot in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PivotTrace {
    steps: Vec<PivotStep>,
}

impl PivotTrace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn push(&mut self, step: PivotStep) {
        self.steps.push(step);
    }

    /// All steps in order.
    pub fn steps(&self) -> &[PivotStep] {
        &self.steps
    }

    /// Number of pivots.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no pivot happened.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Labels dropped by each pivot, in order.
    pub fn dropped_labels(&self) -> Vec<usize> {
        self.steps.iter().map(|step| step.dropped).collect()
    }

    /// `(side, entering, dropped)` per step, convenient for comparisons.
    pub fn path(&self) -> Vec<(Side, usize, usize)> {
        self.steps
            .iter()
            .map(|step| (step.side, step.entering, step.dropped))
            .collect()
    }
}

type DriverState = (Side, usize, Vec<usize>, Vec<usize>);

/// Remembers every driver state seen so far.
///
/// A state is the tableau about to be pivoted, the entering label and both
/// non-basic sets. Pivoting is deterministic, so seeing a state twice means
/// the walk is on a loop.
#[derive(Debug, Default)]
pub struct CycleGuard {
    seen: FxHashSet<DriverState>,
}

impl CycleGuard {
    /// Create an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a state. Returns `false` if it was already visited.
    pub fn visit(
        &mut self,
        side: Side,
        entering: usize,
        row_non_basic: &LabelSet,
        col_non_basic: &LabelSet,
    ) -> bool {
        self.seen.insert((
            side,
            entering,
            row_non_basic.iter().copied().collect(),
            col_non_basic.iter().copied().collect(),
        ))
    }

    /// Number of distinct states visited.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no state was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
