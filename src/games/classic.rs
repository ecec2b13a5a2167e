//! Named games with known equilibria.
//!
//! These double as fixtures: the non-degenerate ones exercise the ordinary
//! pivot path, the degenerate ones exercise tie-breaking and the flagged
//! outcomes of the driver.

use ndarray::array;

use crate::games::bimatrix::BimatrixGame;

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &[
    "prisoners_dilemma",
    "matching_pennies",
    "battle_of_the_sexes",
    "rock_paper_scissors",
    "three_by_two",
    "degenerate_three_by_three",
    "degenerate_dominated",
    "looping_nine_by_nine",
];

/// Prisoner's dilemma. Unique equilibrium: both defect.
pub fn prisoners_dilemma() -> BimatrixGame {
    BimatrixGame::named_unchecked(
        "prisoners_dilemma",
        array![[3.0, 0.0], [5.0, 1.0]],
        array![[3.0, 5.0], [0.0, 1.0]],
    )
}

/// Matching pennies. Unique equilibrium: both players mix evenly.
pub fn matching_pennies() -> BimatrixGame {
    BimatrixGame::named_unchecked(
        "matching_pennies",
        array![[1.0, -1.0], [-1.0, 1.0]],
        array![[-1.0, 1.0], [1.0, -1.0]],
    )
}

/// Battle of the sexes. Two pure equilibria and one mixed one; Lemke-Howson
/// only reaches the pure ones.
pub fn battle_of_the_sexes() -> BimatrixGame {
    BimatrixGame::named_unchecked(
        "battle_of_the_sexes",
        array![[3.0, 0.0], [0.0, 2.0]],
        array![[2.0, 0.0], [0.0, 3.0]],
    )
}

/// Rock-paper-scissors. Unique equilibrium: uniform play.
pub fn rock_paper_scissors() -> BimatrixGame {
    let a = array![[0.0, -1.0, 1.0], [1.0, 0.0, -1.0], [-1.0, 1.0, 0.0]];
    let b = a.mapv(|x| -x);
    BimatrixGame::named_unchecked("rock_paper_scissors", a, b)
}

/// 3×2 game with a pure equilibrium `([1, 0, 0], [1, 0])` and a mixed one
/// `([0, 1/3, 2/3], [1/3, 2/3])`.
pub fn three_by_two() -> BimatrixGame {
    BimatrixGame::named_unchecked(
        "three_by_two",
        array![[3.0, 3.0], [2.0, 5.0], [0.0, 6.0]],
        array![[3.0, 2.0], [2.0, 6.0], [3.0, 1.0]],
    )
}

/// Degenerate 3×3 game. The lexicographic rule reaches
/// `([1/2, 1/2, 0], [0, 0, 1])` from every label; the basic rule produces
/// malformed vertices from most labels.
pub fn degenerate_three_by_three() -> BimatrixGame {
    BimatrixGame::named_unchecked(
        "degenerate_three_by_three",
        array![[1.0, 3.0, 3.0], [3.0, 1.0, 3.0], [1.0, 3.0, 3.0]],
        array![[3.0, 3.0, 1.0], [1.0, 1.0, 3.0], [3.0, 1.0, 3.0]],
    )
}

/// Symmetric game with weakly dominated strategies and a large negative
/// payoff. Every label reaches `([0, 1, 0], [1, 0, 0])`.
pub fn degenerate_dominated() -> BimatrixGame {
    let a = array![[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [-1.0, -1.0, -10000.0]];
    BimatrixGame::named_unchecked("degenerate_dominated", a.clone(), a)
}

/// Constant-sum 9×9 game (`B = 1 - A`) whose walks used to loop. Every valid
/// result has row payoff `0.75872890672`.
pub fn looping_nine_by_nine() -> BimatrixGame {
    let a = array![
        [0.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        [0.711, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0, 1.0],
        [1.0, 0.672, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0, 1.0],
        [1.0, 1.0, 0.667, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0, 0.579, 0.0, 0.0, 0.5, 1.0, 1.0],
        [1.0, 1.0, 1.0, 1.0, 0.5, 0.0, 0.0, 0.5, 1.0],
        [1.0, 1.0, 1.0, 1.0, 1.0, 0.5, 0.0, 0.0, 1.0],
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.333, 0.0, 0.5],
        [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0],
    ];
    let b = a.mapv(|x| 1.0 - x);
    BimatrixGame::named_unchecked("looping_nine_by_nine", a, b)
}

/// Look up a game by name.
pub fn by_name(name: &str) -> Option<BimatrixGame> {
    match name {
        "prisoners_dilemma" => Some(prisoners_dilemma()),
        "matching_pennies" => Some(matching_pennies()),
        "battle_of_the_sexes" => Some(battle_of_the_sexes()),
        "rock_paper_scissors" => Some(rock_paper_scissors()),
        "three_by_two" => Some(three_by_two()),
        "degenerate_three_by_three" => Some(degenerate_three_by_three()),
        "degenerate_dominated" => Some(degenerate_dominated()),
        "looping_nine_by_nine" => Some(looping_nine_by_nine()),
        _ => None,
    }
}

/// Every named game, in [`NAMES`] order.
pub fn all() -> Vec<BimatrixGame> {
    NAMES.iter().filter_map(|name| by_name(name)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot::{validate_payoffs, PivotConfig};

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (x, y) in actual.iter().zip(expected) {
            assert!((x - y).abs() < 1e-12, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn test_all_games_are_valid_and_named() {
        let games = all();
        assert_eq!(games.len(), NAMES.len());
        for (game, name) in games.iter().zip(NAMES) {
            assert_eq!(game.name(), Some(*name));
            assert!(validate_payoffs(game.row_payoffs().view(), game.col_payoffs().view()).is_ok());
        }
        assert!(by_name("chess").is_none());
    }

    #[test]
    fn test_prisoners_dilemma() {
        for eq in prisoners_dilemma().lemke_howson_enumeration().unwrap() {
            assert!(eq.is_valid());
            assert_close(&eq.row_strategy, &[0.0, 1.0]);
            assert_close(&eq.col_strategy, &[0.0, 1.0]);
        }
    }

    #[test]
    fn test_battle_of_the_sexes_reaches_pure_equilibria() {
        let game = battle_of_the_sexes();
        for label in [0, 2] {
            let eq = game.lemke_howson(label).unwrap();
            assert_close(&eq.row_strategy, &[1.0, 0.0]);
            assert_close(&eq.col_strategy, &[1.0, 0.0]);
        }
        for label in [1, 3] {
            let eq = game.lemke_howson(label).unwrap();
            assert_close(&eq.row_strategy, &[0.0, 1.0]);
            assert_close(&eq.col_strategy, &[0.0, 1.0]);
        }
    }

    #[test]
    fn test_rock_paper_scissors() {
        let third = 1.0 / 3.0;
        for eq in rock_paper_scissors().lemke_howson_enumeration().unwrap() {
            assert!(eq.is_valid());
            assert_close(&eq.row_strategy, &[third, third, third]);
            assert_close(&eq.col_strategy, &[third, third, third]);
        }
    }

    #[test]
    fn test_degenerate_game_rules_differ() {
        let game = degenerate_three_by_three();
        let lex = game.lemke_howson_enumeration().unwrap();
        assert!(lex.iter().all(|eq| eq.is_valid()));

        let basic = game
            .lemke_howson_enumeration_with(PivotConfig::basic())
            .unwrap();
        let valid_labels: Vec<usize> = basic
            .iter()
            .filter(|eq| eq.is_valid())
            .map(|eq| eq.initial_dropped_label)
            .collect();
        assert_eq!(valid_labels, vec![2, 3]);
    }

    #[test]
    fn test_every_valid_result_is_a_best_response() {
        for game in all() {
            for eq in game.lemke_howson_enumeration().unwrap() {
                if eq.is_valid() {
                    assert_eq!(
                        game.is_best_response(&eq.row_strategy, &eq.col_strategy),
                        (true, true),
                        "{:?} label {}",
                        game.name(),
                        eq.initial_dropped_label
                    );
                }
            }
        }
    }
}
