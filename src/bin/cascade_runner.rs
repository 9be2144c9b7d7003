use clap::Parser;
use match3_engine::board::Board;
use match3_engine::config::BoardConfig;
use match3_engine::piece::Coord;
use match3_engine::presenter::RecordingPresenter;
use match3_engine::swap::SwapOutcome;
use match3_engine::utils::grid_from_str;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a board file (one row per line, top row first, '.' for empty)
    board_file: Option<PathBuf>,

    /// TOML file with board settings
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Seed for generated boards and refills (overrides the config file)
    #[clap(short, long)]
    seed: Option<u64>,

    /// Swap to apply: x1 y1 x2 y2
    #[clap(long, num_args = 4, value_names = ["X1", "Y1", "X2", "Y2"], allow_negative_numbers = true)]
    swap: Option<Vec<i32>>,

    /// Generate this many boards and report fill statistics instead
    #[clap(long)]
    stats: Option<u64>,
}

fn read_board_file(path: &Path, config: BoardConfig) -> Result<Board, String> {
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read file: {}", e))?;
    let grid = grid_from_str(&content).map_err(|e| format!("Invalid board format: {}", e))?;
    Board::from_grid(grid, config).map_err(|e| format!("Invalid configuration: {}", e))
}

fn load_config(args: &Args) -> Result<BoardConfig, String> {
    let mut config = match &args.config {
        Some(path) => BoardConfig::load(path).map_err(|e| e.to_string())?,
        None => BoardConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn run_stats(config: &BoardConfig, boards: u64) -> Result<(), String> {
    let start_seed = config.rng_seed();
    let mut total_retries = 0;
    let mut exhausted = 0;
    let mut with_matches = 0;

    println!(
        "Generating {} boards of {}x{} with {} kinds...",
        boards, config.width, config.height, config.kinds
    );

    for i in 0..boards {
        let seed = start_seed.wrapping_add(i);
        let board = Board::new(BoardConfig {
            seed: Some(seed),
            ..config.clone()
        })
        .map_err(|e| e.to_string())?;

        let report = board.fill_report();
        total_retries += report.retries;
        if report.budget_exhausted {
            exhausted += 1;
            eprintln!("Warning: retry budget exhausted for seed {}", seed);
        }
        if !board.finder().find_all_matches(board.grid()).is_empty() {
            with_matches += 1;
        }
    }

    println!("\n--- Fill Statistics ---");
    println!("Boards generated: {}", boards);
    if boards > 0 {
        println!(
            "Average retries: {:.2}",
            total_retries as f64 / boards as f64
        );
    }
    println!("Budget exhausted: {}", exhausted);
    println!("Boards starting with a match: {}", with_matches);
    Ok(())
}

fn run(args: Args) -> Result<(), String> {
    let config = load_config(&args)?;

    if let Some(boards) = args.stats {
        return run_stats(&config, boards);
    }

    let mut board = match &args.board_file {
        Some(path) => {
            let board = read_board_file(path, config)?;
            println!("Loaded board from {}\n", path.display());
            board
        }
        None => {
            let board = Board::new(config).map_err(|e| e.to_string())?;
            println!("Generated board with seed {}\n", board.config().rng_seed());
            if board.fill_report().budget_exhausted {
                eprintln!("Warning: retry budget exhausted, the board may contain a match");
            }
            board
        }
    };
    println!("Initial board state:\n{}\n", board.grid());

    let (first, second) = match args.swap.as_deref() {
        Some([x1, y1, x2, y2]) => (Coord::new(*x1, *y1), Coord::new(*x2, *y2)),
        _ => return Ok(()),
    };

    let mut presenter = RecordingPresenter::new();
    board.on_select(first).map_err(|e| e.to_string())?;
    board.on_drag_to(second).map_err(|e| e.to_string())?;
    if !board.on_release(&mut presenter) {
        println!("Swap {} <-> {} declined.", first, second);
        return Ok(());
    }
    board.settle(&mut presenter);

    match board.last_swap() {
        Some(SwapOutcome::Committed(matches)) => {
            let report = board.cascade_report();
            let cells: Vec<String> = matches.coords().iter().map(|c| c.to_string()).collect();
            println!("Swap {} <-> {} matched {}", first, second, cells.join(" "));
            println!("Tiers: {}", report.tiers);
            println!("Match checks: {}", report.match_checks);
            println!("Cleared: {}", report.cleared);
            println!("Moved: {}", report.moved);
            println!("Relocations: {}", presenter.relocations());
            if board.fill_report().budget_exhausted {
                eprintln!("Warning: retry budget exhausted during refill");
            }
        }
        _ => println!("Swap {} <-> {} rolled back: no match.", first, second),
    }
    println!("\nFinal board state:\n{}\n", board.grid());
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
