//! Run and match detection.
//!
//! Matches are always evaluated from a pivot cell outwards, one direction at a
//! time. Board generation relies on this to look only at the directions that
//! are already populated, and swaps and collapses rely on it to check only the
//! cells that moved.
use crate::grid::Grid;
use crate::piece::{Coord, Kind, Piece, PieceId};

/// Default minimum number of same-kind pieces in a line that counts as a match.
pub const DEFAULT_MIN_MATCH: usize = 3;

/// One of the four axis-aligned unit directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// The `(dx, dy)` step for this direction. Up is towards larger `y`.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
        }
    }
}

/// A line through a pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The two opposite directions that make up this axis.
    pub fn directions(self) -> [Direction; 2] {
        match self {
            Axis::Horizontal => [Direction::Right, Direction::Left],
            Axis::Vertical => [Direction::Up, Direction::Down],
        }
    }
}

/// An insertion-ordered, de-duplicated set of matched pieces.
///
/// Entries are snapshots taken when the match was found; their coordinates
/// are those the pieces had at that moment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    pieces: Vec<Piece>,
}

impl MatchSet {
    pub fn new() -> Self {
        MatchSet { pieces: Vec::new() }
    }

    /// Adds `piece` unless a piece with the same id is already present.
    /// Returns whether it was added.
    pub fn insert(&mut self, piece: Piece) -> bool {
        if self.contains(piece.id()) {
            return false;
        }
        self.pieces.push(piece);
        true
    }

    /// Adds every piece of `other` not already present.
    pub fn union(&mut self, other: MatchSet) {
        for piece in other.pieces {
            self.insert(piece);
        }
    }

    pub fn contains(&self, id: PieceId) -> bool {
        self.pieces.iter().any(|p| p.id() == id)
    }

    /// Number of distinct pieces in the set.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter()
    }

    pub fn ids(&self) -> Vec<PieceId> {
        self.pieces.iter().map(Piece::id).collect()
    }

    pub fn coords(&self) -> Vec<Coord> {
        self.pieces.iter().map(Piece::coord).collect()
    }

    /// Distinct columns touched by the set, in first-seen order.
    pub fn columns(&self) -> Vec<i32> {
        let mut columns = Vec::new();
        for piece in &self.pieces {
            let x = piece.coord().x;
            if !columns.contains(&x) {
                columns.push(x);
            }
        }
        columns
    }
}

impl IntoIterator for MatchSet {
    type Item = Piece;
    type IntoIter = std::vec::IntoIter<Piece>;

    fn into_iter(self) -> Self::IntoIter {
        self.pieces.into_iter()
    }
}

impl FromIterator<Piece> for MatchSet {
    fn from_iter<I: IntoIterator<Item = Piece>>(iter: I) -> Self {
        let mut set = MatchSet::new();
        for piece in iter {
            set.insert(piece);
        }
        set
    }
}

/// Finds runs and matches on a [`Grid`] for a given minimum match length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchFinder {
    min_match: usize,
}

impl Default for MatchFinder {
    fn default() -> Self {
        MatchFinder::new(DEFAULT_MIN_MATCH)
    }
}

impl MatchFinder {
    pub fn new(min_match: usize) -> Self {
        MatchFinder { min_match }
    }

    /// Shortest line that counts as a match.
    pub fn min_match(&self) -> usize {
        self.min_match
    }

    /// Walks from `(x, y)` in `direction`, collecting same-kind pieces.
    ///
    /// The walk takes at most `max(width, height) - 1` steps and stops at the
    /// first out-of-bounds cell, empty cell or piece of another kind. The
    /// result starts with the pivot and is returned only if it has at least
    /// `min_length` pieces; otherwise, and for an empty or out-of-bounds pivot,
    /// the result is empty.
    ///
    /// # Arguments
    /// * `grid`: the board to read.
    /// * `x`, `y`: the pivot cell.
    /// * `direction`: the direction to walk in.
    /// * `min_length`: the shortest run, pivot included, worth returning.
    ///
    /// # Returns
    /// The run in walking order, or an empty set.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::matcher::{Direction, MatchFinder};
    /// use match3_engine::utils::grid_from_rows;
    ///
    /// let grid = grid_from_rows(&["RRRG"]).unwrap();
    /// let finder = MatchFinder::default();
    /// assert_eq!(finder.find_run(&grid, 0, 0, Direction::Right, 3).len(), 3);
    /// assert!(finder.find_run(&grid, 1, 0, Direction::Right, 3).is_empty());
    /// ```
    pub fn find_run(
        &self,
        grid: &Grid,
        x: i32,
        y: i32,
        direction: Direction,
        min_length: usize,
    ) -> MatchSet {
        let mut run = MatchSet::new();
        let start = match grid.occupant(x, y) {
            Some(piece) => *piece,
            None => return run,
        };
        run.insert(start);

        let (dx, dy) = direction.delta();
        let max_steps = grid.width().max(grid.height()) - 1;
        for i in 1..=max_steps {
            let next = match grid.occupant(x + dx * i, y + dy * i) {
                Some(piece) => piece,
                None => break,
            };
            if next.kind() != start.kind() || !run.insert(*next) {
                break;
            }
        }

        if run.len() >= min_length {
            run
        } else {
            MatchSet::new()
        }
    }

    /// Matches along one axis through `(x, y)`.
    ///
    /// Both half-runs are computed with a minimum of 2: a pair on one side plus
    /// the pivot's pair on the other side already makes a line of three.
    pub fn find_axis_matches(&self, grid: &Grid, x: i32, y: i32, axis: Axis) -> MatchSet {
        let mut combined = MatchSet::new();
        for direction in axis.directions() {
            combined.union(self.find_run(grid, x, y, direction, 2));
        }

        if combined.len() >= self.min_match {
            combined
        } else {
            MatchSet::new()
        }
    }

    /// Every piece that forms a match with the piece at `(x, y)`, across both
    /// axes. Empty when the cell is empty or out of bounds.
    pub fn find_matches_at(&self, grid: &Grid, x: i32, y: i32) -> MatchSet {
        let mut combined = self.find_axis_matches(grid, x, y, Axis::Horizontal);
        combined.union(self.find_axis_matches(grid, x, y, Axis::Vertical));
        combined
    }

    /// Union of [`find_matches_at`](Self::find_matches_at) over the current
    /// coordinates of `ids`. Ids no longer on the board are skipped.
    pub fn find_matches_among(&self, grid: &Grid, ids: &[PieceId]) -> MatchSet {
        let mut combined = MatchSet::new();
        for &id in ids {
            if let Some(piece) = grid.piece(id) {
                let at = piece.coord();
                combined.union(self.find_matches_at(grid, at.x, at.y));
            }
        }
        combined
    }

    /// True if a left-ward or down-ward run of at least `min_match` ends at
    /// `(x, y)`. Those are the only directions already populated while a board
    /// is filled column by column from the bottom left.
    pub fn has_match_on_fill(&self, grid: &Grid, x: i32, y: i32) -> bool {
        [Direction::Left, Direction::Down]
            .into_iter()
            .any(|direction| !self.find_run(grid, x, y, direction, self.min_match).is_empty())
    }

    /// Scans every cell and returns all pieces that are currently part of a
    /// match.
    pub fn find_all_matches(&self, grid: &Grid) -> MatchSet {
        let mut combined = MatchSet::new();
        for x in 0..grid.width() {
            for y in 0..grid.height() {
                combined.union(self.find_matches_at(grid, x, y));
            }
        }
        combined
    }
}

/// Kind shared by every piece in `set`, if the set is non-empty and uniform.
pub fn common_kind(set: &MatchSet) -> Option<Kind> {
    let mut kinds = set.iter().map(Piece::kind);
    let first = kinds.next()?;
    kinds.all(|k| k == first).then_some(first)
}
