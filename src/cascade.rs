//! Clear → collapse → re-match resolution.
//!
//! The individual steps are exposed so the animated [`Board`](crate::board::Board)
//! can pause between them; [`CascadeEngine::resolve`] chains them without
//! pausing.
use std::collections::VecDeque;

use crate::grid::Grid;
use crate::matcher::{MatchFinder, MatchSet};
use crate::piece::{Coord, Piece, PieceId};

/// A piece pulled down by a collapse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fall {
    pub piece: PieceId,
    pub from: Coord,
    pub to: Coord,
}

/// Summary of a resolved cascade.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeReport {
    /// Match sets cleared, the triggering one included.
    pub tiers: usize,
    /// Re-match queries run after collapses.
    pub match_checks: usize,
    /// Pieces removed from the board.
    pub cleared: usize,
    /// Piece moves performed by collapses.
    pub moved: usize,
}

/// What one clear-and-collapse tier did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tier {
    /// Pieces removed from the board.
    pub cleared: Vec<Piece>,
    /// Pieces pulled down into the gaps.
    pub falls: Vec<Fall>,
}

impl Tier {
    /// Ids of the pieces that fell, which are the ones to re-match.
    pub fn moved(&self) -> Vec<PieceId> {
        self.falls.iter().map(|f| f.piece).collect()
    }
}

impl CascadeReport {
    /// Folds another report into this one.
    pub fn absorb(&mut self, other: CascadeReport) {
        self.tiers += other.tiers;
        self.match_checks += other.match_checks;
        self.cleared += other.cleared;
        self.moved += other.moved;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CascadeEngine {
    finder: MatchFinder,
}

impl CascadeEngine {
    pub fn new(finder: MatchFinder) -> Self {
        CascadeEngine { finder }
    }

    /// Removes every piece of `matches` from the cell it currently occupies.
    /// Pieces already gone are skipped. Returns the removed pieces.
    pub fn clear(&self, grid: &mut Grid, matches: &MatchSet) -> Vec<Piece> {
        let mut cleared = Vec::with_capacity(matches.len());
        for matched in matches.iter() {
            let at = match grid.piece(matched.id()) {
                Some(piece) => piece.coord(),
                None => continue,
            };
            if grid.occupant(at.x, at.y).map(Piece::id) != Some(matched.id()) {
                continue;
            }
            if let Some(piece) = grid.clear(at.x, at.y) {
                cleared.push(piece);
            }
        }
        cleared
    }

    /// Single bottom-up compaction pass over one column.
    ///
    /// Every empty cell pulls down the nearest piece above it. The grid is
    /// updated immediately; the returned falls describe what moved.
    pub fn collapse_column(&self, grid: &mut Grid, column: i32) -> Vec<Fall> {
        let mut falls = Vec::new();
        let height = grid.height();

        for y in 0..height - 1 {
            if grid.occupant(column, y).is_some() {
                continue;
            }
            for above in y + 1..height {
                let id = match grid.occupant(column, above) {
                    Some(piece) => piece.id(),
                    None => continue,
                };
                if grid.place(id, column, y).is_ok() {
                    falls.push(Fall {
                        piece: id,
                        from: Coord::new(column, above),
                        to: Coord::new(column, y),
                    });
                }
                break;
            }
        }
        falls
    }

    /// Collapses each of `columns`.
    pub fn collapse(&self, grid: &mut Grid, columns: &[i32]) -> Vec<Fall> {
        let mut falls = Vec::new();
        for &column in columns {
            falls.extend(self.collapse_column(grid, column));
        }
        falls
    }

    /// Clears `matches` and collapses the columns they touched.
    ///
    /// Both [`resolve`](Self::resolve) and the animated board run each tier
    /// through here, so the two always clear and collapse in the same order.
    ///
    /// # Arguments
    /// * `grid`: the board, updated in place.
    /// * `matches`: the pieces to clear. Pieces already gone are skipped.
    ///
    /// # Returns
    /// The cleared pieces and the resulting falls.
    pub fn step(&self, grid: &mut Grid, matches: &MatchSet) -> Tier {
        let columns = matches.columns();
        let cleared = self.clear(grid, matches);
        let falls = self.collapse(grid, &columns);
        Tier { cleared, falls }
    }

    /// Matches formed by pieces that have just moved.
    pub fn rematch(&self, grid: &Grid, moved: &[PieceId]) -> MatchSet {
        self.finder.find_matches_among(grid, moved)
    }

    /// Resolves a cascade to quiescence, starting from `matches`, without
    /// pausing between tiers. This is the synchronous counterpart of the
    /// animated [`Board`](crate::board::Board) sequence.
    ///
    /// Pending match sets are kept on a queue rather than handled by
    /// recursion, so arbitrarily long chains do not grow the stack.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::cascade::CascadeEngine;
    /// use match3_engine::matcher::MatchFinder;
    /// use match3_engine::utils::grid_from_rows;
    ///
    /// let mut grid = grid_from_rows(&[
    ///     "B..",
    ///     "RRR",
    /// ]).unwrap();
    /// let finder = MatchFinder::default();
    /// let matches = finder.find_matches_at(&grid, 0, 0);
    /// let report = CascadeEngine::new(finder).resolve(&mut grid, matches);
    /// assert_eq!(report.cleared, 3);
    /// assert_eq!(grid.to_rows(), vec!["...", "B.."]);
    /// ```
    pub fn resolve(&self, grid: &mut Grid, matches: MatchSet) -> CascadeReport {
        let mut report = CascadeReport::default();
        let mut pending = VecDeque::from([matches]);

        while let Some(matches) = pending.pop_front() {
            if matches.is_empty() {
                continue;
            }
            report.tiers += 1;

            let tier = self.step(grid, &matches);
            report.cleared += tier.cleared.len();
            report.moved += tier.falls.len();

            report.match_checks += 1;
            let next = self.rematch(grid, &tier.moved());
            if !next.is_empty() {
                pending.push_back(next);
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_rows;

    #[test]
    fn test_clear_removes_matched_pieces() {
        let mut grid = grid_from_rows(&["GRRRB"]).unwrap();
        let finder = MatchFinder::default();
        let matches = finder.find_matches_at(&grid, 2, 0);
        let cleared = CascadeEngine::new(finder).clear(&mut grid, &matches);
        assert_eq!(cleared.len(), 3);
        assert_eq!(grid.to_rows(), vec!["G...B"]);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_clear_skips_pieces_already_gone() {
        let mut grid = grid_from_rows(&["RRR"]).unwrap();
        let finder = MatchFinder::default();
        let engine = CascadeEngine::new(finder);
        let matches = finder.find_matches_at(&grid, 0, 0);
        assert_eq!(engine.clear(&mut grid, &matches).len(), 3);
        assert!(engine.clear(&mut grid, &matches).is_empty());
    }

    #[test]
    fn test_collapse_column_preserves_order() {
        let mut grid = grid_from_rows(&[
            "R", //
            ".", //
            "B", //
            ".", //
            "G", //
            ".", //
        ])
        .unwrap();
        let falls = CascadeEngine::default().collapse_column(&mut grid, 0);
        assert_eq!(grid.to_rows(), vec![".", ".", ".", "R", "B", "G"]);
        assert_eq!(falls.len(), 3);
        assert_eq!(falls[0].from, Coord::new(0, 1));
        assert_eq!(falls[0].to, Coord::new(0, 0));
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_collapse_settled_column_is_noop() {
        let mut grid = grid_from_rows(&[".", "R", "G"]).unwrap();
        let before = grid.clone();
        assert!(CascadeEngine::default()
            .collapse_column(&mut grid, 0)
            .is_empty());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_collapse_only_touches_given_columns() {
        let mut grid = grid_from_rows(&["RG", ".."]).unwrap();
        let falls = CascadeEngine::default().collapse(&mut grid, &[1]);
        assert_eq!(falls.len(), 1);
        assert_eq!(grid.to_rows(), vec!["R.", ".G"]);
    }

    #[test]
    fn test_three_at_bottom_with_two_above() {
        let mut grid = grid_from_rows(&[
            "G", // y = 4
            "B", // y = 3
            "R", //
            "R", //
            "R", // y = 0
        ])
        .unwrap();
        let green = grid.occupant(0, 4).unwrap().id();
        let blue = grid.occupant(0, 3).unwrap().id();

        let finder = MatchFinder::default();
        let matches = finder.find_matches_at(&grid, 0, 0);
        assert_eq!(matches.len(), 3);
        let report = CascadeEngine::new(finder).resolve(&mut grid, matches);

        assert_eq!(grid.occupied_count(), 2);
        assert_eq!(grid.occupant(0, 0).map(Piece::id), Some(blue));
        assert_eq!(grid.occupant(0, 1).map(Piece::id), Some(green));
        assert_eq!(grid.to_rows(), vec![".", ".", ".", "G", "B"]);
        assert_eq!(report.tiers, 1);
        assert_eq!(report.cleared, 3);
        assert_eq!(report.moved, 2);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_one_level_chain_checks_twice() {
        // clearing the R column drops the B next to the two Bs on the bottom row
        let mut grid = grid_from_rows(&[
            "B..", //
            "R..", //
            "R..", //
            "RBB", //
        ])
        .unwrap();
        let finder = MatchFinder::default();
        let matches = finder.find_matches_at(&grid, 0, 0);
        assert_eq!(matches.len(), 3);
        let report = CascadeEngine::new(finder).resolve(&mut grid, matches);

        assert_eq!(report.tiers, 2);
        assert_eq!(report.match_checks, 2);
        assert_eq!(report.cleared, 6);
        assert_eq!(grid.occupied_count(), 0);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_step_clears_then_collapses() {
        let mut grid = grid_from_rows(&[
            "G..", //
            "B..", //
            "RRR", //
        ])
        .unwrap();
        let engine = CascadeEngine::default();
        let matches = engine.finder.find_matches_at(&grid, 1, 0);
        let tier = engine.step(&mut grid, &matches);

        assert_eq!(tier.cleared.len(), 3);
        assert_eq!(
            tier.falls
                .iter()
                .map(|f| (f.from, f.to))
                .collect::<Vec<_>>(),
            vec![
                (Coord::new(0, 1), Coord::new(0, 0)),
                (Coord::new(0, 2), Coord::new(0, 1)),
            ]
        );
        assert_eq!(tier.moved().len(), 2);
        assert_eq!(grid.to_rows(), vec!["...", "G..", "B.."]);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_resolve_empty_set_does_nothing() {
        let mut grid = grid_from_rows(&["RGB"]).unwrap();
        let before = grid.clone();
        let report = CascadeEngine::default().resolve(&mut grid, MatchSet::new());
        assert_eq!(report, CascadeReport::default());
        assert_eq!(grid, before);
    }
}
