use match3_engine::board::Board;
use match3_engine::config::BoardConfig;
use match3_engine::generator::BoardGenerator;
use match3_engine::grid::Grid;
use match3_engine::matcher::{common_kind, MatchFinder};
use match3_engine::piece::{Coord, Kind};
use match3_engine::presenter::{NullPresenter, Presenter, RecordingPresenter};
use match3_engine::swap::{SwapOutcome, SwapResolver};
use match3_engine::utils::grid_from_rows;
use proptest::prelude::*;

fn config(width: i32, height: i32, kinds: usize, seed: u64, refill: bool) -> BoardConfig {
    BoardConfig {
        width,
        height,
        kinds,
        seed: Some(seed),
        refill,
        ..BoardConfig::default()
    }
}

fn generated_grid(width: i32, height: i32, kinds: usize, seed: u64) -> Grid {
    let mut grid = Grid::new(width, height);
    BoardGenerator::new(&Kind::ALL[..kinds], seed, 100, MatchFinder::default()).fill(&mut grid);
    grid
}

proptest! {
    #[test]
    fn generated_boards_start_without_matches(
        width in 3i32..10,
        height in 3i32..10,
        kinds in 3usize..=6,
        seed in any::<u64>(),
    ) {
        let board = Board::new(config(width, height, kinds, seed, true)).expect("valid config");
        prop_assume!(!board.fill_report().budget_exhausted);

        prop_assert_eq!(board.grid().occupied_count(), (width * height) as usize);
        prop_assert!(board.grid().is_consistent());
        prop_assert!(board.finder().find_all_matches(board.grid()).is_empty());
    }

    #[test]
    fn swaps_leave_the_board_consistent_and_settled(
        width in 3i32..9,
        height in 3i32..9,
        kinds in 3usize..=5,
        seed in any::<u64>(),
        x in 0i32..8,
        y in 0i32..8,
        horizontal in any::<bool>(),
        refill in any::<bool>(),
    ) {
        let mut board = Board::new(config(width, height, kinds, seed, refill)).expect("valid config");
        prop_assume!(!board.fill_report().budget_exhausted);
        let before = board.grid().clone();

        let first = if horizontal {
            Coord::new(x % (width - 1), y % height)
        } else {
            Coord::new(x % width, y % (height - 1))
        };
        let second = if horizontal {
            first.offset(1, 0)
        } else {
            first.offset(0, 1)
        };

        let mut presenter = RecordingPresenter::new();
        board.on_select(first).expect("in bounds");
        board.on_drag_to(second).expect("in bounds");
        prop_assert!(board.on_release(&mut presenter));
        board.settle(&mut presenter);

        prop_assert!(board.is_idle());
        prop_assert!(board.in_flight().is_empty());
        prop_assert!(board.grid().is_consistent());
        prop_assert!(board.grid().pieces().all(|p| !p.is_moving()));
        prop_assert!(board.finder().find_all_matches(board.grid()).is_empty());

        match board.last_swap() {
            Some(SwapOutcome::Committed(matches)) => {
                let report = board.cascade_report();
                prop_assert!(matches.len() >= 3);
                prop_assert!(report.tiers >= 1);
                prop_assert!(report.cleared >= matches.len());
                if refill {
                    prop_assert_eq!(board.grid().occupied_count(), (width * height) as usize);
                } else {
                    prop_assert_eq!(
                        board.grid().occupied_count() + report.cleared,
                        (width * height) as usize
                    );
                }
            }
            Some(SwapOutcome::RolledBack) => {
                prop_assert_eq!(board.grid(), &before);
                prop_assert_eq!(presenter.relocations(), 4);
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn non_adjacent_swaps_change_nothing(
        seed in any::<u64>(),
        ax in 0i32..6,
        ay in 0i32..6,
        bx in 0i32..6,
        by in 0i32..6,
    ) {
        let a = Coord::new(ax, ay);
        let b = Coord::new(bx, by);
        prop_assume!(!a.is_adjacent(b));

        let mut grid = generated_grid(6, 6, 5, seed);
        let before = grid.clone();
        let outcome = SwapResolver::default().try_swap(&mut grid, a, b);
        prop_assert_eq!(outcome, SwapOutcome::Declined);
        prop_assert_eq!(grid, before);
    }

    #[test]
    fn rejected_swaps_restore_the_grid(
        seed in any::<u64>(),
        x in 0i32..5,
        y in 0i32..6,
    ) {
        let mut grid = generated_grid(6, 6, 5, seed);
        let before = grid.clone();
        let outcome = SwapResolver::default().try_swap(&mut grid, Coord::new(x, y), Coord::new(x + 1, y));
        if !outcome.is_committed() {
            prop_assert_eq!(grid, before);
        } else {
            prop_assert!(grid.is_consistent());
            prop_assert_eq!(grid.occupied_count(), 36);
        }
    }

    #[test]
    fn matches_share_one_kind(
        seed in any::<u64>(),
        x in 0i32..6,
        y in 0i32..6,
    ) {
        let grid = generated_grid(6, 6, 3, seed);
        let matches = MatchFinder::default().find_matches_at(&grid, x, y);
        if !matches.is_empty() {
            prop_assert!(matches.len() >= 3);
            prop_assert!(common_kind(&matches).is_some());
            prop_assert!(matches.coords().contains(&Coord::new(x, y)));
        }
    }
}

fn play_chain(presenter: &mut dyn Presenter) -> Board {
    let grid = grid_from_rows(&["..B", "GRG", "YGR", "BBR"]).expect("valid board");
    let mut board = Board::from_grid(grid, config(3, 4, 5, 1, false)).expect("valid config");
    board.on_select(Coord::new(1, 2)).expect("in bounds");
    board.on_drag_to(Coord::new(2, 2)).expect("in bounds");
    assert!(board.on_release(presenter));
    board.settle(presenter);
    board
}

#[test]
fn settle_does_not_depend_on_the_presenter() {
    let quiet = play_chain(&mut NullPresenter);
    let mut recording = RecordingPresenter::new();
    let recorded = play_chain(&mut recording);

    assert_eq!(quiet.grid().to_rows(), recorded.grid().to_rows());
    assert_eq!(quiet.cascade_report(), recorded.cascade_report());
    assert_eq!(recording.highlights().len(), 2);
}
