//! Tableaux for integer pivoting.
//!
//! A tableau encodes one player's best-response polytope `{z : Mz <= 1, z >= 0}`
//! as the matrix `[M | I | 1]`. Each column is a label; a label is carried by
//! the current vertex (a *non-basic variable*) when its column is not a unit
//! column. Pivoting never divides: every row update is scaled by the pivot
//! element so integer inputs stay integer.
//!
//! ## Layout
//!
//! ```text
//! row tableau (from Bᵀ, n rows)        column tableau (from A, m rows)
//! ┌──────────┬──────────┬───┐          ┌──────────┬──────────┬───┐
//! │  Bᵀ      │  I_n     │ 1 │          │  I_m     │  A       │ 1 │
//! └──────────┴──────────┴───┘          └──────────┴──────────┴───┘
//!   0 .. m     m .. m+n                  0 .. m     m .. m+n
//! ```
//!
//! The column tableau is built "shifted" so that both tableaux use the same
//! label for the same column index.

use std::collections::BTreeSet;
use std::fmt;

use log::trace;
use ndarray::{s, Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pivot::lex;

/// Ordered set of labels. Ascending iteration order is relied upon when
/// identifying dropped labels and extracting strategies.
pub type LabelSet = BTreeSet<usize>;

/// How the pivot row is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotRule {
    /// Plain max-ratio test, first maximal row wins.
    ///
    /// Reads the non-basic set off the matrix, which cannot tell labels
    /// apart in a single-row tableau. Games with one row or one column
    /// therefore end as [`Outcome::Cycled`](crate::pivot::Outcome::Cycled)
    /// from every label under this rule.
    Basic,
    /// Max-ratio test with lexicographic tie-breaking and an explicitly
    /// tracked non-basic set.
    #[default]
    Lexicographic,
}

impl PivotRule {
    /// Rule matching a `lexicographic` flag.
    pub fn from_lexicographic(lexicographic: bool) -> Self {
        if lexicographic {
            PivotRule::Lexicographic
        } else {
            PivotRule::Basic
        }
    }
}

impl fmt::Display for PivotRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotRule::Basic => write!(f, "basic"),
            PivotRule::Lexicographic => write!(f, "lexicographic"),
        }
    }
}

/// Errors raised by a single pivot.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PivotError {
    /// The requested column is not a label of this tableau.
    #[error("label {label} is out of range [0, {num_labels})")]
    LabelOutOfRange {
        /// Requested label.
        label: usize,
        /// Number of labels in the tableau.
        num_labels: usize,
    },
    /// The tableau has no rows to pivot on.
    #[error("no pivot row for column {column}")]
    NoPivotRow {
        /// Entering column.
        column: usize,
    },
    /// No previously basic variable has a non-zero entry in the pivot row.
    #[error("could not find dropped label in pivot row {pivot_row}")]
    NoDroppedLabel {
        /// Row that was pivoted on.
        pivot_row: usize,
    },
    /// The entering label was not tracked as non-basic.
    #[error("entering label {label} is not a non-basic variable")]
    LabelNotNonBasic {
        /// Entering label.
        label: usize,
    },
}

/// Result of one successful pivot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pivot {
    /// Column that entered the basis.
    pub column: usize,
    /// Row chosen by the ratio test.
    pub pivot_row: usize,
    /// Label that left the basis and becomes non-basic.
    pub dropped: usize,
    /// Whether the ratio test needed the lexicographic tie-break.
    pub tie_broken: bool,
}

/// Build the tableau matrix for a payoff matrix.
///
/// Payoffs are shifted to be strictly positive first (adding a constant
/// never changes the equilibria). When `shifted` is true the identity block
/// comes first so slack columns line up with the opponent's labels.
pub fn build_tableau_matrix(payoffs: ArrayView2<f64>, shifted: bool) -> Array2<f64> {
    let min = payoffs.iter().copied().fold(f64::INFINITY, f64::min);
    let payoffs = if min <= 0.0 {
        payoffs.mapv(|x| x + min.abs() + 1.0)
    } else {
        payoffs.to_owned()
    };

    let (rows, width) = payoffs.dim();
    let (payoff_start, slack_start) = if shifted { (rows, 0) } else { (0, width) };

    let mut matrix = Array2::<f64>::zeros((rows, rows + width + 1));
    matrix
        .slice_mut(s![.., payoff_start..payoff_start + width])
        .assign(&payoffs);
    for i in 0..rows {
        matrix[[i, slack_start + i]] = 1.0;
    }
    matrix.column_mut(rows + width).fill(1.0);
    matrix
}

/// Create the row player's tableau from the column player's payoffs `B`.
pub fn create_row_tableau(payoffs: ArrayView2<f64>, rule: PivotRule) -> Tableau {
    let (rows, cols) = payoffs.dim();
    let matrix = build_tableau_matrix(payoffs.t(), false);
    Tableau::with_original_labels(matrix, rule, 0..rows).seeded(0..rows, cols)
}

/// Create the column player's tableau from the row player's payoffs `A`.
pub fn create_col_tableau(payoffs: ArrayView2<f64>, rule: PivotRule) -> Tableau {
    let (rows, cols) = payoffs.dim();
    let matrix = build_tableau_matrix(payoffs, true);
    Tableau::with_original_labels(matrix, rule, rows..rows + cols).seeded(rows..rows + cols, rows)
}

/// Labels whose column does not have exactly one non-zero entry.
fn structural_non_basic(matrix: &Array2<f64>) -> LabelSet {
    let num_labels = matrix.ncols().saturating_sub(1);
    (0..num_labels)
        .filter(|&j| matrix.column(j).iter().filter(|&&x| x != 0.0).count() != 1)
        .collect()
}

/// A tableau owned and mutated by a single pivoting run.
#[derive(Debug, Clone, PartialEq)]
pub struct Tableau {
    matrix: Array2<f64>,
    rule: PivotRule,
    /// Labels carried by the vertex at construction; the coordinate frame
    /// used by [`Tableau::to_strategy`].
    original_labels: LabelSet,
    /// Non-basic set maintained by the lexicographic rule.
    tracked_non_basic: LabelSet,
}

impl Tableau {
    /// Wrap an existing matrix. The original labels are the non-basic
    /// variables of the matrix as given.
    pub fn from_matrix(matrix: Array2<f64>, rule: PivotRule) -> Self {
        let original_labels = structural_non_basic(&matrix);
        Self {
            tracked_non_basic: original_labels.clone(),
            matrix,
            rule,
            original_labels,
        }
    }

    /// Wrap an existing matrix with an explicit set of original labels.
    ///
    /// Only needed when the matrix was manipulated before construction.
    pub fn with_original_labels<I>(matrix: Array2<f64>, rule: PivotRule, labels: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        Self {
            tracked_non_basic: structural_non_basic(&matrix),
            original_labels: labels.into_iter().collect(),
            matrix,
            rule,
        }
    }

    /// Override the tracked non-basic set, resuming a lexicographic walk from
    /// a known vertex. Has no effect on the basic rule, which always reads
    /// the non-basic set off the matrix.
    pub fn with_non_basic_variables<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.tracked_non_basic = labels.into_iter().collect();
        self
    }

    /// Seed the tracked set from the construction layout. A single-row
    /// tableau makes every column look like a unit column, so the structural
    /// rule cannot be trusted there.
    fn seeded<I>(self, labels: I, rows: usize) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        if rows <= 1 {
            self.with_non_basic_variables(labels)
        } else {
            self
        }
    }

    /// The tableau matrix.
    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// The pivot rule chosen at construction.
    pub fn rule(&self) -> PivotRule {
        self.rule
    }

    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of labels (every column except the right-hand side).
    pub fn num_labels(&self) -> usize {
        self.matrix.ncols().saturating_sub(1)
    }

    /// The full set of labels.
    pub fn labels(&self) -> LabelSet {
        (0..self.num_labels()).collect()
    }

    /// Labels carried by the current vertex.
    ///
    /// For the basic rule these are the columns without exactly one non-zero
    /// entry. The lexicographic rule tracks them explicitly because that
    /// structural test is ambiguous right after a degenerate pivot.
    pub fn non_basic_variables(&self) -> LabelSet {
        match self.rule {
            PivotRule::Basic => structural_non_basic(&self.matrix),
            PivotRule::Lexicographic => self.tracked_non_basic.clone(),
        }
    }

    /// Labels not carried by the current vertex.
    pub fn basic_variables(&self) -> LabelSet {
        let non_basic = self.non_basic_variables();
        self.labels().difference(&non_basic).copied().collect()
    }

    /// Labels of the slack block. Fixed for the tableau's lifetime.
    pub fn slack_variables(&self) -> LabelSet {
        self.labels()
            .difference(&self.original_labels)
            .copied()
            .collect()
    }

    /// Labels carried at construction.
    pub fn original_labels(&self) -> &LabelSet {
        &self.original_labels
    }

    fn ratios(&self, column: usize) -> Vec<f64> {
        let rhs = self.num_labels();
        self.matrix
            .outer_iter()
            .map(|row| row[column] / row[rhs])
            .collect()
    }

    /// Find the row to pivot on for `column`.
    ///
    /// This is the min-ratio test written as a max-ratio test on the
    /// reciprocals, which avoids dividing by zero entries of the column.
    pub fn find_pivot_row(&self, column: usize) -> Result<usize, PivotError> {
        self.check_label(column)?;
        self.select_pivot_row(column).map(|(row, _)| row)
    }

    fn select_pivot_row(&self, column: usize) -> Result<(usize, bool), PivotError> {
        let ratios = self.ratios(column);
        if ratios.is_empty() {
            return Err(PivotError::NoPivotRow { column });
        }

        match self.rule {
            PivotRule::Basic => {
                // A NaN ratio wins outright, as with `argmax`.
                if let Some(row) = ratios.iter().position(|r| r.is_nan()) {
                    return Ok((row, false));
                }
                Ok((first_max(&ratios), false))
            }
            PivotRule::Lexicographic => {
                let ratios: Vec<f64> = ratios.into_iter().map(lex::nan_to_neg_inf).collect();
                let max = ratios.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let ties: Vec<bool> = ratios.iter().map(|&r| r == max).collect();

                if ties.iter().filter(|&&t| t).count() > 1 {
                    let slack: Vec<usize> = self.slack_variables().into_iter().collect();
                    trace!("lexicographic tie-break on column {} over ties {:?}", column, ties);
                    let row = lex::tie_break(self.matrix.view(), column, &slack, &ties)
                        .ok_or(PivotError::NoPivotRow { column })?;
                    return Ok((row, true));
                }
                Ok((first_max(&ratios), false))
            }
        }
    }

    fn check_label(&self, column: usize) -> Result<(), PivotError> {
        if column >= self.num_labels() {
            return Err(PivotError::LabelOutOfRange {
                label: column,
                num_labels: self.num_labels(),
            });
        }
        Ok(())
    }

    /// Eliminate `column` from every row except `pivot_row`.
    fn eliminate(&mut self, column: usize, pivot_row: usize) {
        let pivot = self.matrix.row(pivot_row).to_owned();
        let pivot_element = pivot[column];

        for (i, mut row) in self.matrix.outer_iter_mut().enumerate() {
            if i == pivot_row {
                continue;
            }
            let row_pivot_val = row[column];
            row.zip_mut_with(&pivot, |x, &p| *x = *x * pivot_element - p * row_pivot_val);
        }
    }

    /// Identify the label that left the basis.
    ///
    /// # Arguments
    /// * `pivot_row` - The row that was pivoted on
    /// * `candidates` - Labels that were basic before the pivot
    ///
    /// # Returns
    /// The smallest candidate with a non-zero entry in the pivot row.
    pub fn find_dropped(&self, pivot_row: usize, candidates: &LabelSet) -> Result<usize, PivotError> {
        candidates
            .iter()
            .copied()
            .find(|&label| self.matrix[[pivot_row, label]] != 0.0)
            .ok_or(PivotError::NoDroppedLabel { pivot_row })
    }

    /// Pivot on `column` and report what happened.
    pub fn pivot(&mut self, column: usize) -> Result<Pivot, PivotError> {
        self.check_label(column)?;

        let previously_basic = self.basic_variables();
        let (pivot_row, tie_broken) = self.select_pivot_row(column)?;
        // Elimination leaves the pivot row untouched, so every check runs
        // before the matrix changes.
        let dropped = self.find_dropped(pivot_row, &previously_basic)?;
        if self.rule == PivotRule::Lexicographic
            && dropped != column
            && !self.tracked_non_basic.contains(&column)
        {
            return Err(PivotError::LabelNotNonBasic { label: column });
        }

        self.eliminate(column, pivot_row);
        if self.rule == PivotRule::Lexicographic {
            self.tracked_non_basic.insert(dropped);
            self.tracked_non_basic.remove(&column);
        }

        trace!(
            "pivot column {} on row {} dropped label {}",
            column,
            pivot_row,
            dropped
        );

        Ok(Pivot {
            column,
            pivot_row,
            dropped,
            tie_broken,
        })
    }

    /// Pivot on `column` and return the dropped label.
    pub fn pivot_and_drop_label(&mut self, column: usize) -> Result<usize, PivotError> {
        self.pivot(column).map(|pivot| pivot.dropped)
    }

    /// Values a label takes at the current vertex: `rhs / entry` for every
    /// non-zero entry of its column. A well-formed vertex has exactly one.
    fn extract_label_values(&self, column: usize) -> Vec<f64> {
        let rhs = self.matrix.column(self.num_labels());
        self.matrix
            .column(column)
            .iter()
            .zip(rhs.iter())
            .filter(|&(&entry, _)| entry != 0.0)
            .map(|(&entry, &value)| value / entry)
            .collect()
    }

    /// Read a normalized strategy off the tableau.
    ///
    /// # Arguments
    /// * `other_non_basic` - The non-basic variables of the complementary tableau.
    ///   An original label of this tableau can only be played if the other
    ///   tableau carries it.
    ///
    /// # Returns
    /// One entry per original label on a well-formed vertex. Degenerate
    /// vertices can produce extra entries; callers check the length.
    pub fn to_strategy(&self, other_non_basic: &LabelSet) -> Vec<f64> {
        let mut vertex = Vec::with_capacity(self.original_labels.len());
        for &label in &self.original_labels {
            if other_non_basic.contains(&label) {
                vertex.extend(self.extract_label_values(label));
            } else {
                vertex.push(0.0);
            }
        }

        let total: f64 = vertex.iter().sum();
        vertex.into_iter().map(|v| v / total).collect()
    }
}

/// Index of the first maximal entry. Expects NaN-free input.
fn first_max(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn both_rules() -> [PivotRule; 2] {
        [PivotRule::Basic, PivotRule::Lexicographic]
    }

    #[test]
    fn test_creation_of_particular_row_tableau() {
        let m = array![[3.0, 2.0, -1.0], [3.0, 5.0, 6.0]];
        let expected = array![
            [5.0, 5.0, 1.0, 0.0, 0.0, 1.0],
            [4.0, 7.0, 0.0, 1.0, 0.0, 1.0],
            [1.0, 8.0, 0.0, 0.0, 1.0, 1.0],
        ];
        let t = create_row_tableau(m.view(), PivotRule::Basic);
        assert_eq!(t.matrix(), &expected);
        assert_eq!(t.non_basic_variables(), LabelSet::from([0, 1]));
        assert_eq!(t.original_labels(), &LabelSet::from([0, 1]));
        assert_eq!(t.labels(), (0..5).collect::<LabelSet>());
        assert_eq!(t.basic_variables(), LabelSet::from([2, 3, 4]));
        assert_eq!(t.slack_variables(), LabelSet::from([2, 3, 4]));
    }

    #[test]
    fn test_creation_of_particular_col_tableau() {
        let m = array![[3.0, 2.0, 3.0], [2.0, 6.0, 1.0]];
        let expected = array![[1.0, 0.0, 3.0, 2.0, 3.0, 1.0], [0.0, 1.0, 2.0, 6.0, 1.0, 1.0]];
        let t = create_col_tableau(m.view(), PivotRule::Basic);
        assert_eq!(t.matrix(), &expected);
        assert_eq!(t.non_basic_variables(), LabelSet::from([2, 3, 4]));
        assert_eq!(t.original_labels(), &LabelSet::from([2, 3, 4]));
        assert_eq!(t.basic_variables(), LabelSet::from([0, 1]));
        assert_eq!(t.slack_variables(), LabelSet::from([0, 1]));
    }

    #[test]
    fn test_tableau_shape_and_blocks() {
        let m = array![
            [1.0, -2.0, 3.0, 0.0, 4.0],
            [2.0, 2.0, -7.0, 1.0, 1.0],
            [0.0, 5.0, 3.0, 3.0, -1.0],
            [9.0, 1.0, 1.0, 2.0, 2.0],
        ];
        // Four row strategies, five column strategies: Bᵀ has five rows.
        let (m_rows, n_cols) = m.dim();
        let t = create_row_tableau(m.view(), PivotRule::Basic);
        let matrix = t.matrix();
        assert_eq!(matrix.dim(), (n_cols, m_rows + n_cols + 1));
        assert_eq!(
            matrix.slice(s![.., m_rows..m_rows + n_cols]),
            Array2::<f64>::eye(n_cols)
        );
        assert!(matrix.column(m_rows + n_cols).iter().all(|&x| x == 1.0));
        assert!(matrix.slice(s![.., ..m_rows]).iter().all(|&x| x > 0.0));
        assert_eq!(t.original_labels(), &(0..m_rows).collect::<LabelSet>());
    }

    #[test]
    fn test_positive_payoffs_are_not_shifted() {
        let m = array![[1.0, 2.0], [3.0, 4.0]];
        let matrix = build_tableau_matrix(m.view(), false);
        assert_eq!(matrix.slice(s![.., ..2]), m);
    }

    #[test]
    fn test_find_particular_pivot_row() {
        for rule in both_rules() {
            let t = Tableau::from_matrix(
                array![
                    [3.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                    [2.0, 5.0, 0.0, 1.0, 0.0, 1.0],
                    [0.0, 6.0, 0.0, 0.0, 1.0, 1.0],
                ],
                rule,
            );
            for (column, row) in [(0, 0), (1, 2), (2, 0), (3, 1), (4, 2)] {
                assert_eq!(t.find_pivot_row(column), Ok(row), "{rule} column {column}");
            }

            let t = Tableau::from_matrix(
                array![[3.0, 2.0, 3.0, 1.0, 0.0, 1.0], [2.0, 6.0, 1.0, 0.0, 1.0, 1.0]],
                rule,
            );
            for (column, row) in [(0, 0), (1, 1), (2, 0), (3, 0), (4, 1)] {
                assert_eq!(t.find_pivot_row(column), Ok(row), "{rule} column {column}");
            }
        }
    }

    #[test]
    fn test_find_particular_pivot_row_on_degenerate_tableau() {
        let t = Tableau::with_original_labels(
            array![
                [3.0, 1.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, -6.0, -3.0, 3.0, 0.0, 0.0],
                [0.0, 8.0, 6.0, -1.0, 0.0, 3.0, 2.0],
            ],
            PivotRule::Lexicographic,
            [0, 1, 2],
        );
        for (column, row) in [(0, 0), (1, 2), (2, 0), (3, 0), (4, 1)] {
            assert_eq!(t.find_pivot_row(column), Ok(row), "column {column}");
        }
    }

    #[test]
    fn test_non_basic_variables() {
        let t = Tableau::from_matrix(
            array![
                [3.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                [2.0, 5.0, 0.0, 1.0, 0.0, 1.0],
                [0.0, 6.0, 0.0, 0.0, 1.0, 1.0],
            ],
            PivotRule::Basic,
        );
        assert_eq!(t.non_basic_variables(), LabelSet::from([0, 1]));

        let t = Tableau::from_matrix(
            array![[3.0, 2.0, 3.0, 1.0, 0.0, 1.0], [2.0, 6.0, 1.0, 0.0, 1.0, 1.0]],
            PivotRule::Basic,
        );
        assert_eq!(t.non_basic_variables(), LabelSet::from([0, 1, 2]));
    }

    #[test]
    fn test_particular_pivot() {
        for rule in both_rules() {
            let mut t = Tableau::from_matrix(
                array![
                    [3.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                    [2.0, 5.0, 0.0, 1.0, 0.0, 1.0],
                    [0.0, 6.0, 0.0, 0.0, 1.0, 1.0],
                ],
                rule,
            );
            assert_eq!(t.pivot_and_drop_label(0), Ok(2));
            assert_eq!(
                t.matrix(),
                &array![
                    [3.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                    [0.0, 9.0, -2.0, 3.0, 0.0, 1.0],
                    [0.0, 18.0, 0.0, 0.0, 3.0, 3.0],
                ]
            );
            assert_eq!(t.pivot_and_drop_label(2), Ok(0));
            assert_eq!(
                t.matrix(),
                &array![
                    [3.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                    [6.0, 15.0, 0.0, 3.0, 0.0, 3.0],
                    [0.0, 18.0, 0.0, 0.0, 3.0, 3.0],
                ]
            );
            assert_eq!(t.non_basic_variables(), LabelSet::from([0, 1]));
        }
    }

    #[test]
    fn test_degenerate_pivot_from_known_vertex() {
        let mut t = Tableau::with_original_labels(
            array![
                [3.0, 1.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, -6.0, -3.0, 3.0, 0.0, 0.0],
                [0.0, 8.0, 6.0, -1.0, 0.0, 3.0, 2.0],
            ],
            PivotRule::Lexicographic,
            [0, 1, 2],
        )
        .with_non_basic_variables([1, 2, 3]);

        assert_eq!(t.pivot_and_drop_label(1), Ok(5));
        assert_eq!(
            t.matrix(),
            &array![
                [24.0, 0.0, 18.0, 9.0, 0.0, -3.0, 6.0],
                [0.0, 0.0, -48.0, -24.0, 24.0, 0.0, 0.0],
                [0.0, 8.0, 6.0, -1.0, 0.0, 3.0, 2.0],
            ]
        );
        assert_eq!(t.non_basic_variables(), LabelSet::from([2, 3, 5]));
    }

    #[test]
    fn test_degenerate_pivot_with_three_way_tie() {
        let mut t = Tableau::from_matrix(
            array![
                [10.0, 11.0, 10.0, 1.0, 0.0, 0.0, 1.0],
                [10.0, 11.0, 10.0, 0.0, 1.0, 0.0, 1.0],
                [10.0, 11.0, 1.0, 0.0, 0.0, 1.0, 1.0],
            ],
            PivotRule::Lexicographic,
        );
        let pivot = t.pivot(0).unwrap();
        assert_eq!(pivot.dropped, 3);
        assert_eq!(pivot.pivot_row, 0);
        assert!(pivot.tie_broken);
        assert_eq!(
            t.matrix(),
            &array![
                [10.0, 11.0, 10.0, 1.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, -10.0, 10.0, 0.0, 0.0],
                [0.0, 0.0, -90.0, -10.0, 0.0, 10.0, 0.0],
            ]
        );
    }

    #[test]
    fn test_find_dropped() {
        let t = Tableau::from_matrix(
            array![
                [3.0, 1.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                [3.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0],
                [1.0, 3.0, 3.0, 0.0, 0.0, 1.0, 1.0],
            ],
            PivotRule::Lexicographic,
        );
        for (row, dropped) in [(0, 3), (1, 4), (2, 5)] {
            assert_eq!(t.find_dropped(row, &t.slack_variables()), Ok(dropped));
        }

        let t = Tableau::from_matrix(
            array![
                [3.0, 1.0, 3.0, 1.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, -6.0, -3.0, 3.0, 0.0, 0.0],
                [0.0, 8.0, 6.0, -1.0, 0.0, 3.0, 2.0],
            ],
            PivotRule::Lexicographic,
        );
        let candidates: LabelSet = t.labels().difference(&LabelSet::from([1, 2, 3])).copied().collect();
        for (row, dropped) in [(0, 0), (1, 4), (2, 5)] {
            assert_eq!(t.find_dropped(row, &candidates), Ok(dropped));
        }
    }

    #[test]
    fn test_fail_fast_on_no_dropped_label() {
        let t = Tableau::from_matrix(array![[3.0]], PivotRule::Basic);
        assert_eq!(
            t.find_dropped(0, &LabelSet::new()),
            Err(PivotError::NoDroppedLabel { pivot_row: 0 })
        );
    }

    #[test]
    fn test_pivot_rejects_unknown_label() {
        let mut t = create_row_tableau(array![[1.0, 2.0], [3.0, 4.0]].view(), PivotRule::Basic);
        assert_eq!(
            t.pivot_and_drop_label(4),
            Err(PivotError::LabelOutOfRange { label: 4, num_labels: 4 })
        );
    }

    #[test]
    fn test_lexicographic_pivot_on_basic_label_keeps_tracked_set() {
        // Entering a label that is already basic drops that same label.
        let mut t = create_col_tableau(array![[1.0, 2.0], [3.0, 4.0]].view(), PivotRule::Lexicographic);
        assert_eq!(t.pivot_and_drop_label(0), Ok(0));
        assert_eq!(t.non_basic_variables(), LabelSet::from([2, 3]));
    }

    #[test]
    fn test_rejected_pivot_leaves_tableau_unchanged() {
        let mut t = create_col_tableau(array![[1.0, 2.0], [3.0, 4.0]].view(), PivotRule::Lexicographic)
            .with_non_basic_variables([3]);
        let before = t.matrix().clone();

        assert_eq!(
            t.pivot_and_drop_label(2),
            Err(PivotError::LabelNotNonBasic { label: 2 })
        );
        assert_eq!(t.matrix(), &before);
        assert_eq!(t.non_basic_variables(), LabelSet::from([3]));
    }

    #[test]
    fn test_single_row_tableau_is_seeded() {
        let payoffs = array![[1.0, 2.0, 3.0]];

        let lex = create_col_tableau(payoffs.view(), PivotRule::Lexicographic);
        assert_eq!(lex.num_rows(), 1);
        assert_eq!(lex.non_basic_variables(), LabelSet::from([1, 2, 3]));
        assert_eq!(lex.slack_variables(), LabelSet::from([0]));

        // Every column of a one-row matrix is a unit column.
        let basic = create_col_tableau(payoffs.view(), PivotRule::Basic);
        assert!(basic.non_basic_variables().is_empty());
        assert_eq!(basic.original_labels(), &LabelSet::from([1, 2, 3]));
    }

    #[test]
    fn test_particular_tableau_to_strategy() {
        let t = Tableau::with_original_labels(
            array![
                [3.0, 0.0, 1.0, 1.0, 0.0, 1.0],
                [0.0, 0.0, 1.0, 1.0, 1.0, 1.0],
                [0.0, 6.0, 0.0, 0.0, 1.0, 1.0],
            ],
            PivotRule::Basic,
            [0, 1],
        );
        assert_eq!(t.to_strategy(&LabelSet::from([0, 1])), vec![2.0 / 3.0, 1.0 / 3.0]);

        let t = Tableau::with_original_labels(
            array![
                [3.0, 0.0, 1.0, 0.0, 0.0, 1.0],
                [0.0, 3.0, 1.0, 3.0, 1.0, 1.0],
                [0.0, 6.0, 0.0, 0.0, 1.0, 1.0],
            ],
            PivotRule::Basic,
            [0, 1],
        );
        assert_eq!(t.to_strategy(&LabelSet::from([0, 3])), vec![1.0, 0.0]);
    }

    #[test]
    fn test_repeated_pivots_are_deterministic() {
        let payoffs = array![[3.0, 3.0], [2.0, 5.0], [0.0, 6.0]];
        let run = || {
            let mut t = create_col_tableau(payoffs.view(), PivotRule::Lexicographic);
            let dropped: Vec<usize> = [3, 1, 4]
                .iter()
                .filter_map(|&c| t.pivot_and_drop_label(c).ok())
                .collect();
            (dropped, t)
        };
        let (first_dropped, first) = run();
        let (second_dropped, second) = run();
        assert_eq!(first_dropped, second_dropped);
        let bits = |t: &Tableau| t.matrix().iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
    }
}
