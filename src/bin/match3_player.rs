use match3_engine::board::Board;
use match3_engine::config::BoardConfig;
use match3_engine::piece::Coord;
use match3_engine::presenter::NullPresenter;
use match3_engine::swap::SwapOutcome;
use std::io::{self, Write};
use std::path::Path;

const CONFIG_FILE: &str = "match3.toml";

fn parse_swap(input: &str) -> Option<(Coord, Coord)> {
    let numbers: Vec<i32> = input
        .split_whitespace()
        .map(|s| s.parse::<i32>())
        .collect::<Result<_, _>>()
        .ok()?;
    match numbers.as_slice() {
        [x1, y1, x2, y2] => Some((Coord::new(*x1, *y1), Coord::new(*x2, *y2))),
        _ => None,
    }
}

fn main() {
    let config = match BoardConfig::load_or_default(Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: {}, using defaults", e);
            BoardConfig::default()
        }
    };
    let mut board = match Board::new(config) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if board.fill_report().budget_exhausted {
        eprintln!("Warning: retry budget exhausted, the board may start with a match");
    }
    let mut presenter = NullPresenter;
    let mut swaps = 0;
    let mut total_cleared = 0;

    println!("Welcome to Match-3!");
    println!("Swap two neighbouring pieces to line up three or more of a kind.");

    loop {
        println!("---------------------");
        println!("Swaps: {}, Cleared: {}", swaps, total_cleared);
        println!("{}", board.grid());

        print!("Enter a swap (x1 y1 x2 y2), or 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        let trimmed_input = input.trim();
        if trimmed_input == "q" {
            println!("Thanks for playing!");
            break;
        }

        let (first, second) = match parse_swap(trimmed_input) {
            Some(pair) => pair,
            None => {
                println!("Invalid input format. Use 'x1 y1 x2 y2' or 'q'.");
                continue;
            }
        };

        let gesture = board
            .on_select(first)
            .and_then(|_| board.on_drag_to(second));
        if let Err(e) = gesture {
            println!("Invalid coordinates: {}.", e);
            // drop the half-made selection
            board.on_release(&mut presenter);
            continue;
        }
        if !board.on_release(&mut presenter) {
            println!(
                "Cannot swap {} and {}: they must be neighbours and both hold a piece.",
                first, second
            );
            continue;
        }
        board.settle(&mut presenter);
        swaps += 1;

        match board.last_swap() {
            Some(SwapOutcome::Committed(matches)) => {
                let report = board.cascade_report();
                total_cleared += report.cleared;
                println!(
                    "Matched {} pieces! Tiers: {}, cleared: {}, moved: {}",
                    matches.len(),
                    report.tiers,
                    report.cleared,
                    report.moved
                );
                if board.fill_report().budget_exhausted {
                    eprintln!("Warning: retry budget exhausted during refill");
                }
            }
            Some(SwapOutcome::RolledBack) => println!("No match, the swap was undone."),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_swap() {
        assert_eq!(
            parse_swap("1 2 1 3"),
            Some((Coord::new(1, 2), Coord::new(1, 3)))
        );
        assert_eq!(parse_swap("1 2 3"), None);
        assert_eq!(parse_swap("a b c d"), None);
    }
}
