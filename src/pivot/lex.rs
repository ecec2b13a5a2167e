//! Lexicographic ratio test.
//!
//! On a degenerate vertex several rows can attain the maximum ratio. The
//! tie is resolved by looking at the perturbed problem where each constraint
//! `i` is relaxed by `ε^i`. Because the slack block started as the identity
//! matrix, the slack columns of the current tableau record how those
//! perturbations have been combined by earlier pivots, so comparing
//! `slack / pivot_column` row vectors lexicographically reproduces the
//! perturbed ratio test without choosing a value for `ε`.

use std::cmp::Ordering;

use ndarray::ArrayView2;

/// Map NaN to negative infinity so every ratio is ordered.
///
/// `0 / 0` ratios come from rows that do not constrain the entering
/// variable at all and must never win the ratio test.
#[inline]
pub fn nan_to_neg_inf(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else {
        value
    }
}

/// Compare two rows entry by entry, first differing entry decides.
///
/// Entries are expected to be NaN-free; `-0.0` and `0.0` compare equal.
pub fn compare_rows(a: &[f64], b: &[f64]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.partial_cmp(y).unwrap_or(Ordering::Equal) {
            Ordering::Equal => continue,
            order => return order,
        }
    }
    a.len().cmp(&b.len())
}

/// Row indices sorted in ascending lexicographic order.
///
/// The sort is stable, so identical rows keep their original relative order.
pub fn row_sort_asc(rows: &[Vec<f64>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| compare_rows(&rows[a], &rows[b]));
    order
}

/// Pick the pivot row among the tied rows.
///
/// # Arguments
/// * `tableau` - The tableau matrix
/// * `column` - The entering column
/// * `slack_columns` - Slack column indices, ascending
/// * `ties` - `true` for every row attaining the maximum ratio
///
/// # Returns
/// The tied row whose perturbed ratio vector is lexicographically largest,
/// the highest such row index when vectors coincide.
pub fn tie_break(
    tableau: ArrayView2<f64>,
    column: usize,
    slack_columns: &[usize],
    ties: &[bool],
) -> Option<usize> {
    let perturbed: Vec<Vec<f64>> = tableau
        .outer_iter()
        .zip(ties.iter())
        .map(|(row, &tied)| {
            if !tied {
                return vec![f64::NEG_INFINITY; slack_columns.len()];
            }
            let pivot = row[column];
            slack_columns
                .iter()
                .map(|&j| nan_to_neg_inf(row[j] / pivot))
                .collect()
        })
        .collect();

    row_sort_asc(&perturbed).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_row_sort_asc() {
        let rows = vec![
            vec![f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY],
            vec![f64::INFINITY, 3.0, 1.0],
            vec![f64::INFINITY, 2.0, 2.0],
        ];
        assert_eq!(row_sort_asc(&rows), vec![0, 2, 1]);
    }

    #[test]
    fn test_compare_rows_treats_signed_zero_as_equal() {
        assert_eq!(compare_rows(&[-0.0, 1.0], &[0.0, 1.0]), Ordering::Equal);
        assert_eq!(compare_rows(&[0.0, 2.0], &[0.0, 1.0]), Ordering::Greater);
        assert_eq!(compare_rows(&[f64::NEG_INFINITY], &[-1e300]), Ordering::Less);
    }

    #[test]
    fn test_nan_to_neg_inf() {
        assert_eq!(nan_to_neg_inf(f64::NAN), f64::NEG_INFINITY);
        assert_eq!(nan_to_neg_inf(2.5), 2.5);
        assert_eq!(nan_to_neg_inf(f64::INFINITY), f64::INFINITY);
    }

    #[test]
    fn test_tie_break_prefers_last_identical_row() {
        // Rows 0 and 2 tie on the ratio and are identical on the slack block.
        let tableau = array![
            [2.0, 1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0, 1.0],
            [2.0, 1.0, 0.0, 1.0],
        ];
        let ties = [true, false, true];
        assert_eq!(tie_break(tableau.view(), 0, &[1, 2], &ties), Some(2));
    }

    #[test]
    fn test_tie_break_uses_slack_ratios() {
        let tableau = array![
            [10.0, 11.0, 10.0, 1.0, 0.0, 0.0, 1.0],
            [10.0, 11.0, 10.0, 0.0, 1.0, 0.0, 1.0],
            [10.0, 11.0, 1.0, 0.0, 0.0, 1.0, 1.0],
        ];
        let ties = [true, true, true];
        // Row 0 has the largest first slack ratio (1/10 against 0).
        assert_eq!(tie_break(tableau.view(), 0, &[3, 4, 5], &ties), Some(0));
    }
}
