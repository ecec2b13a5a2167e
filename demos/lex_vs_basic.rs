//! Compare the basic and lexicographic pivot rules on the named games.
//!
//! The rules agree on non-degenerate games. On degenerate ones the basic
//! rule walks into vertices that do not give valid strategies.

use lemke_howson::games::classic;
use lemke_howson::pivot::{Equilibrium, PivotConfig};

fn describe(eq: &Equilibrium) -> String {
    if eq.is_valid() {
        let row: Vec<String> = eq.row_strategy.iter().map(|p| format!("{:.3}", p)).collect();
        let col: Vec<String> = eq.col_strategy.iter().map(|p| format!("{:.3}", p)).collect();
        format!("[{}] [{}]", row.join(" "), col.join(" "))
    } else {
        format!("{:?}", eq.outcome)
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Error)
        .init();

    for game in classic::all() {
        let name = game.name().unwrap_or("unnamed");
        println!("=== {} ({}x{}) ===", name, game.shape().0, game.shape().1);

        let lex = game.lemke_howson_enumeration_with(PivotConfig::lexicographic());
        let basic = game.lemke_howson_enumeration_with(PivotConfig::basic());
        let (lex, basic) = match (lex, basic) {
            (Ok(lex), Ok(basic)) => (lex, basic),
            (Err(e), _) | (_, Err(e)) => {
                eprintln!("Error solving {}: {}", name, e);
                continue;
            }
        };

        for (l, b) in lex.iter().zip(basic.iter()) {
            let marker = if l.is_valid() != b.is_valid() { "*" } else { " " };
            println!(
                "{} label {:>2}  lex: {:<40} basic: {}",
                marker,
                l.initial_dropped_label,
                describe(l),
                describe(b)
            );
        }

        let lex_valid = lex.iter().filter(|eq| eq.is_valid()).count();
        let basic_valid = basic.iter().filter(|eq| eq.is_valid()).count();
        println!(
            "valid runs: lexicographic {}/{}, basic {}/{}",
            lex_valid,
            lex.len(),
            basic_valid,
            basic.len()
        );
        println!();
    }
}
