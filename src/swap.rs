//! Player gestures and the swap protocol.
//!
//! A gesture is select → drag → release. [`GestureState`] records the cells
//! involved; [`SwapResolver`] decides whether the resulting swap sticks.
use crate::error::BoardError;
use crate::grid::Grid;
use crate::matcher::{MatchFinder, MatchSet};
use crate::piece::{Coord, PieceId};

/// The selection held during one gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    #[default]
    Idle,
    /// The first cell has been pressed.
    FirstSelected(Coord),
    /// The pointer has been dragged onto a neighbour of `first`.
    Swapping { first: Coord, target: Coord },
}

impl GestureState {
    /// Records the first cell. Ignored unless idle.
    pub fn select(&mut self, at: Coord) {
        if *self == GestureState::Idle {
            *self = GestureState::FirstSelected(at);
        }
    }

    /// Records the drag target if it is adjacent to the first cell; otherwise
    /// the event is ignored. Dragging onto another neighbour retargets.
    pub fn drag_to(&mut self, at: Coord) {
        let first = match *self {
            GestureState::Idle => return,
            GestureState::FirstSelected(first) => first,
            GestureState::Swapping { first, .. } => first,
        };
        if first.is_adjacent(at) {
            *self = GestureState::Swapping { first, target: at };
        }
    }

    /// Ends the gesture, returning the pair to swap if both cells were set.
    /// The state is back to `Idle` afterwards in every case.
    pub fn release(&mut self) -> Option<(Coord, Coord)> {
        let pair = match *self {
            GestureState::Swapping { first, target } => Some((first, target)),
            _ => None,
        };
        *self = GestureState::Idle;
        pair
    }
}

/// What became of a requested swap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The cells are not neighbours, or one of them is empty or outside the
    /// board. Nothing moved.
    Declined,
    /// The swap produced no match and was reversed.
    RolledBack,
    /// The swap stands; these pieces are matched at the two cells.
    Committed(MatchSet),
}

impl SwapOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SwapOutcome::Committed(_))
    }
}

/// Checks and applies two-cell swaps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SwapResolver {
    finder: MatchFinder,
}

impl SwapResolver {
    pub fn new(finder: MatchFinder) -> Self {
        SwapResolver { finder }
    }

    /// The two pieces a swap of `a` and `b` would exchange, or `None` if the
    /// swap must be declined.
    pub fn swap_pair(&self, grid: &Grid, a: Coord, b: Coord) -> Option<(PieceId, PieceId)> {
        if !grid.in_bounds(a.x, a.y) || !grid.in_bounds(b.x, b.y) || !a.is_adjacent(b) {
            return None;
        }
        let first = grid.occupant(a.x, a.y)?;
        let second = grid.occupant(b.x, b.y)?;
        Some((first.id(), second.id()))
    }

    /// Writes `first` into `b` and `second` into `a`.
    pub fn exchange(
        &self,
        grid: &mut Grid,
        (first, second): (PieceId, PieceId),
        a: Coord,
        b: Coord,
    ) -> Result<(), BoardError> {
        grid.place(first, b.x, b.y)?;
        grid.place(second, a.x, a.y)
    }

    /// Matches at both ends of a swap that has already been applied.
    pub fn matches_after_swap(&self, grid: &Grid, a: Coord, b: Coord) -> MatchSet {
        let mut matches = self.finder.find_matches_at(grid, a.x, a.y);
        matches.union(self.finder.find_matches_at(grid, b.x, b.y));
        matches
    }

    /// Runs the whole swap protocol without animation: exchange, look for
    /// matches at both cells, and roll back if there are none.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::piece::Coord;
    /// use match3_engine::swap::{SwapOutcome, SwapResolver};
    /// use match3_engine::utils::grid_from_rows;
    ///
    /// let mut grid = grid_from_rows(&["RRGR"]).unwrap();
    /// let resolver = SwapResolver::default();
    /// let outcome = resolver.try_swap(&mut grid, Coord::new(2, 0), Coord::new(3, 0));
    /// assert!(outcome.is_committed());
    /// assert_eq!(grid.to_rows(), vec!["RRRG"]);
    /// ```
    pub fn try_swap(&self, grid: &mut Grid, a: Coord, b: Coord) -> SwapOutcome {
        let pair = match self.swap_pair(grid, a, b) {
            Some(pair) => pair,
            None => return SwapOutcome::Declined,
        };
        if self.exchange(grid, pair, a, b).is_err() {
            return SwapOutcome::Declined;
        }

        let matches = self.matches_after_swap(grid, a, b);
        if matches.is_empty() {
            // the same exchange again puts both pieces back
            let restored = self.exchange(grid, (pair.1, pair.0), a, b);
            debug_assert!(restored.is_ok(), "rollback failed: {:?}", restored);
            SwapOutcome::RolledBack
        } else {
            SwapOutcome::Committed(matches)
        }
    }
}
