//! Random board filling that avoids ready-made matches.
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::grid::Grid;
use crate::matcher::MatchFinder;
use crate::piece::{Kind, PieceId};

/// Seed used when none is configured, so default boards are reproducible.
pub const DEFAULT_SEED: u64 = 514514;

/// Retries allowed across a whole fill before matches are accepted.
pub const DEFAULT_RETRY_BUDGET: usize = 100;

/// What a call to [`BoardGenerator::fill`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FillReport {
    /// Pieces that ended up on the board, in placement order.
    pub placed: Vec<PieceId>,
    /// Re-rolls spent on placements that formed a match.
    pub retries: usize,
    /// True if the retry budget ran out, in which case the board may contain
    /// a match.
    pub budget_exhausted: bool,
}

/// Fills empty cells with random kinds.
#[derive(Clone, Debug)]
pub struct BoardGenerator {
    rng: SmallRng,
    palette: Vec<Kind>,
    retry_budget: usize,
    finder: MatchFinder,
}

impl BoardGenerator {
    /// Creates a generator drawing from `palette` with a seeded RNG.
    pub fn new(palette: &[Kind], seed: u64, retry_budget: usize, finder: MatchFinder) -> Self {
        BoardGenerator {
            rng: SmallRng::seed_from_u64(seed),
            palette: palette.to_vec(),
            retry_budget,
            finder,
        }
    }

    pub fn palette(&self) -> &[Kind] {
        &self.palette
    }

    fn place_random(&mut self, grid: &mut Grid, x: i32, y: i32) -> Option<PieceId> {
        let kind = Kind::random(&mut self.rng, &self.palette)?;
        grid.spawn(kind, x, y).ok()
    }

    /// Fills every empty cell, column by column from the bottom left.
    ///
    /// After each placement the left-ward and down-ward runs through the new
    /// piece are checked; a match causes the cell to be cleared and re-rolled.
    /// The retry count is shared by the whole fill. Once it reaches the budget
    /// the current placement is kept even if it matches, and the report says
    /// so.
    ///
    /// # Arguments
    /// * `grid`: the board to fill. Occupied cells are left alone.
    ///
    /// # Returns
    /// A [`FillReport`] with the placed pieces, the retries spent and whether
    /// the budget ran out.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::generator::BoardGenerator;
    /// use match3_engine::grid::Grid;
    /// use match3_engine::matcher::MatchFinder;
    /// use match3_engine::piece::Kind;
    ///
    /// let mut grid = Grid::new(6, 6);
    /// let mut generator = BoardGenerator::new(&Kind::ALL[..4], 1, 100, MatchFinder::default());
    /// let report = generator.fill(&mut grid);
    /// assert_eq!(report.placed.len(), 36);
    /// assert_eq!(grid.occupied_count(), 36);
    /// ```
    pub fn fill(&mut self, grid: &mut Grid) -> FillReport {
        let mut report = FillReport::default();

        for x in 0..grid.width() {
            for y in 0..grid.height() {
                if grid.occupant(x, y).is_some() {
                    continue;
                }
                let mut placed = match self.place_random(grid, x, y) {
                    Some(id) => id,
                    None => return report,
                };

                while self.finder.has_match_on_fill(grid, x, y) {
                    grid.clear(x, y);
                    placed = match self.place_random(grid, x, y) {
                        Some(id) => id,
                        None => return report,
                    };
                    report.retries += 1;

                    if report.retries >= self.retry_budget {
                        report.budget_exhausted = true;
                        break;
                    }
                }
                report.placed.push(placed);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::Direction;
    use crate::utils::grid_from_rows;

    fn left_or_down_match(grid: &Grid, finder: &MatchFinder) -> Option<(i32, i32)> {
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                for direction in [Direction::Left, Direction::Down] {
                    if !finder.find_run(grid, x, y, direction, 3).is_empty() {
                        return Some((x, y));
                    }
                }
            }
        }
        None
    }

    #[test]
    fn test_fill_has_no_left_or_down_match() {
        let finder = MatchFinder::default();
        for seed in 0..20 {
            let mut grid = Grid::new(8, 8);
            let mut generator = BoardGenerator::new(&Kind::ALL[..5], seed, 100, finder);
            let report = generator.fill(&mut grid);
            if report.budget_exhausted {
                continue;
            }
            assert_eq!(
                left_or_down_match(&grid, &finder),
                None,
                "seed {} produced a match:\n{}",
                seed,
                grid
            );
            assert!(finder.find_all_matches(&grid).is_empty());
        }
    }

    #[test]
    fn test_fill_is_deterministic_per_seed() {
        let finder = MatchFinder::default();
        let mut first = Grid::new(7, 9);
        let mut second = Grid::new(7, 9);
        BoardGenerator::new(&Kind::ALL[..5], 99, 100, finder).fill(&mut first);
        BoardGenerator::new(&Kind::ALL[..5], 99, 100, finder).fill(&mut second);
        assert_eq!(first.to_rows(), second.to_rows());

        let mut third = Grid::new(7, 9);
        BoardGenerator::new(&Kind::ALL[..5], 100, 100, finder).fill(&mut third);
        assert_ne!(first.to_rows(), third.to_rows());
    }

    #[test]
    fn test_fill_only_touches_empty_cells() {
        let mut grid = grid_from_rows(&["...", "R.B", "GGY"]).unwrap();
        let mut generator =
            BoardGenerator::new(&Kind::ALL[..5], 3, 100, MatchFinder::default());
        let report = generator.fill(&mut grid);
        assert_eq!(report.placed.len(), 4);
        assert_eq!(grid.kind_at(0, 1), Some(Kind::Red));
        assert_eq!(grid.kind_at(2, 1), Some(Kind::Blue));
        assert_eq!(grid.kind_at(0, 0), Some(Kind::Green));
        assert_eq!(grid.occupied_count(), 9);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_single_kind_exhausts_budget_and_keeps_going() {
        let mut grid = Grid::new(5, 5);
        let mut generator = BoardGenerator::new(&[Kind::Red], 0, 10, MatchFinder::default());
        let report = generator.fill(&mut grid);
        assert!(report.budget_exhausted);
        assert!(report.retries >= 10);
        assert_eq!(grid.occupied_count(), 25);
    }

    #[test]
    fn test_empty_palette_places_nothing() {
        let mut grid = Grid::new(3, 3);
        let mut generator = BoardGenerator::new(&[], 0, 100, MatchFinder::default());
        let report = generator.fill(&mut grid);
        assert!(report.placed.is_empty());
        assert_eq!(grid.occupied_count(), 0);
    }
}
