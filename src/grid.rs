//! The authoritative coordinate → piece mapping.
//!
//! Cells hold piece ids; the pieces themselves live in an id-keyed store so a
//! piece can be briefly detached from any cell while a relocation is in flight
//! (for example when two pieces trade places and one lands before the other).
use std::collections::HashMap;
use std::fmt;

use crate::config::MAX_DIMENSION;
use crate::error::BoardError;
use crate::piece::{Coord, Kind, Piece, PieceId};

/// A `width` x `height` board of optional pieces. `y = 0` is the bottom row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Option<PieceId>>,
    pieces: HashMap<PieceId, Piece>,
    next_id: u32,
}

impl Grid {
    /// Creates an empty grid. Each side is clamped to `0..=MAX_DIMENSION`.
    ///
    /// # Examples
    /// ```
    /// use match3_engine::grid::Grid;
    /// let grid = Grid::new(7, 9);
    /// assert_eq!(grid.occupant(0, 0), None);
    /// assert!(grid.in_bounds(6, 8));
    /// assert!(!grid.in_bounds(7, 0));
    /// ```
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.clamp(0, MAX_DIMENSION);
        let height = height.clamp(0, MAX_DIMENSION);
        Grid {
            width,
            height,
            cells: vec![None; (width * height) as usize],
            pieces: HashMap::new(),
            next_id: 0,
        }
    }

    /// Number of columns.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Checks whether the given coordinates are inside the board.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> BoardError {
        BoardError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Returns the occupant of `(x, y)`, or an error for coordinates outside the
    /// board. Meant for callers holding untrusted coordinates.
    pub fn get(&self, x: i32, y: i32) -> Result<Option<&Piece>, BoardError> {
        match self.index(x, y) {
            Some(i) => Ok(self.cells[i].and_then(|id| self.pieces.get(&id))),
            None => Err(self.out_of_bounds(x, y)),
        }
    }

    /// Returns the occupant of `(x, y)`; out-of-bounds reads as empty.
    pub fn occupant(&self, x: i32, y: i32) -> Option<&Piece> {
        self.get(x, y).ok().flatten()
    }

    /// Kind of the occupant at `(x, y)`, if any.
    pub fn kind_at(&self, x: i32, y: i32) -> Option<Kind> {
        self.occupant(x, y).map(Piece::kind)
    }

    /// Looks a live piece up by id, whether or not it currently sits in a cell.
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    /// Creates a new piece of `kind` at `(x, y)`, destroying any previous
    /// occupant of that cell.
    pub fn spawn(&mut self, kind: Kind, x: i32, y: i32) -> Result<PieceId, BoardError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        self.clear(x, y);
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.insert(id, Piece::new(id, kind, Coord::new(x, y)));
        self.place(id, x, y)?;
        Ok(id)
    }

    /// Writes piece `id` into `(x, y)`.
    ///
    /// The cell is written only when in bounds; the piece's cached coordinate is
    /// stamped either way. If the piece's previous cell still maps to it, that
    /// cell is vacated so a piece never occupies two cells. Placing a piece
    /// where it already is changes nothing.
    ///
    /// # Arguments
    /// * `id`: a live piece of this grid.
    /// * `x`, `y`: the destination cell.
    ///
    /// # Returns
    /// `Ok(())`, or `BoardError::UnknownPiece` if `id` is not on the board.
    /// An out-of-bounds destination is not an error.
    pub fn place(&mut self, id: PieceId, x: i32, y: i32) -> Result<(), BoardError> {
        let previous = match self.pieces.get(&id) {
            Some(piece) => piece.coord(),
            None => return Err(BoardError::UnknownPiece(id)),
        };
        let target = Coord::new(x, y);

        if let Some(i) = self.index(x, y) {
            if previous != target {
                if let Some(prev) = self.index(previous.x, previous.y) {
                    if self.cells[prev] == Some(id) {
                        self.cells[prev] = None;
                    }
                }
            }
            self.cells[i] = Some(id);
        }

        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.set_coord(target);
        }
        Ok(())
    }

    /// Empties `(x, y)` and returns the piece that was there, which is no longer
    /// part of the board.
    pub fn clear(&mut self, x: i32, y: i32) -> Option<Piece> {
        let i = self.index(x, y)?;
        let id = self.cells[i].take()?;
        self.pieces.remove(&id)
    }

    pub(crate) fn set_moving(&mut self, id: PieceId, moving: bool) {
        if let Some(piece) = self.pieces.get_mut(&id) {
            piece.set_moving(moving);
        }
    }

    /// Pieces currently sitting in a cell, in column-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| (x, y)))
            .filter_map(move |(x, y)| self.occupant(x, y))
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// True when every live piece sits in exactly one cell and every occupied
    /// cell agrees with its piece's cached coordinate.
    pub fn is_consistent(&self) -> bool {
        let mut seen = 0;
        for x in 0..self.width {
            for y in 0..self.height {
                if let Some(id) = self.index(x, y).and_then(|i| self.cells[i]) {
                    match self.pieces.get(&id) {
                        Some(piece) if piece.coord() == Coord::new(x, y) => seen += 1,
                        _ => return false,
                    }
                }
            }
        }
        seen == self.pieces.len()
    }

    /// The board as text rows, top row first, one character per cell
    /// (`.` for an empty cell).
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.height)
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| self.kind_at(x, y).map_or('.', Kind::to_char))
                    .collect()
            })
            .collect()
    }

    /// Formats the board with `x`/`y` labels. Cells listed in `highlight` are
    /// shown in lower case.
    pub fn to_string_with_highlight(&self, highlight: &[Coord]) -> String {
        let mut output = String::from("   ");
        for x in 0..self.width {
            output.push_str(&format!("{:<2}", x));
        }
        for y in (0..self.height).rev() {
            output.push('\n');
            output.push_str(&format!("{:<3}", y));
            for x in 0..self.width {
                let ch = self.kind_at(x, y).map_or('.', Kind::to_char);
                let ch = if highlight.contains(&Coord::new(x, y)) {
                    ch.to_ascii_lowercase()
                } else {
                    ch
                };
                output.push(ch);
                output.push(' ');
            }
        }
        output
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with_highlight(&[]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::grid_from_rows;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.occupied_count(), 0);
        for x in 0..4 {
            for y in 0..3 {
                assert_eq!(grid.get(x, y), Ok(None));
            }
        }
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_new_grid_clamps_dimensions() {
        let grid = Grid::new(70_000, 70_000);
        assert_eq!(grid.width(), MAX_DIMENSION);
        assert_eq!(grid.height(), MAX_DIMENSION);
        assert!(!grid.in_bounds(MAX_DIMENSION, 0));

        let grid = Grid::new(i32::MIN, -3);
        assert_eq!((grid.width(), grid.height()), (0, 0));
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_get_out_of_bounds_is_an_error() {
        let grid = Grid::new(4, 3);
        assert_eq!(
            grid.get(4, 0),
            Err(BoardError::OutOfBounds {
                x: 4,
                y: 0,
                width: 4,
                height: 3
            })
        );
        assert!(grid.get(0, -1).is_err());
        assert_eq!(grid.occupant(-1, 0), None);
    }

    #[test]
    fn test_spawn_and_clear() {
        let mut grid = Grid::new(3, 3);
        let id = grid.spawn(Kind::Blue, 1, 2).unwrap();
        let piece = grid.occupant(1, 2).copied().unwrap();
        assert_eq!(piece.id(), id);
        assert_eq!(piece.kind(), Kind::Blue);
        assert_eq!(piece.coord(), Coord::new(1, 2));

        let cleared = grid.clear(1, 2).unwrap();
        assert_eq!(cleared.id(), id);
        assert_eq!(grid.occupant(1, 2), None);
        assert_eq!(grid.piece(id), None);
        assert_eq!(grid.clear(1, 2), None);
        assert_eq!(grid.clear(9, 9), None);
    }

    #[test]
    fn test_spawn_out_of_bounds_fails() {
        let mut grid = Grid::new(3, 3);
        assert!(grid.spawn(Kind::Red, 3, 0).is_err());
        assert_eq!(grid.occupied_count(), 0);
    }

    #[test]
    fn test_place_moves_piece_and_vacates_old_cell() {
        let mut grid = Grid::new(3, 3);
        let id = grid.spawn(Kind::Red, 0, 2).unwrap();
        grid.place(id, 0, 0).unwrap();
        assert_eq!(grid.occupant(0, 2), None);
        assert_eq!(grid.occupant(0, 0).map(Piece::id), Some(id));
        assert_eq!(grid.piece(id).unwrap().coord(), Coord::new(0, 0));
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut grid = Grid::new(3, 3);
        let id = grid.spawn(Kind::Red, 1, 1).unwrap();
        let before = grid.clone();
        grid.place(id, 1, 1).unwrap();
        grid.place(id, 1, 1).unwrap();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_place_out_of_bounds_only_stamps_coordinate() {
        let mut grid = Grid::new(3, 3);
        let id = grid.spawn(Kind::Red, 1, 1).unwrap();
        grid.place(id, 5, 1).unwrap();
        assert_eq!(grid.occupant(1, 1).map(Piece::id), Some(id));
        assert_eq!(grid.piece(id).unwrap().coord(), Coord::new(5, 1));
    }

    #[test]
    fn test_place_unknown_piece() {
        let mut grid = Grid::new(3, 3);
        assert_eq!(
            grid.place(PieceId(42), 0, 0),
            Err(BoardError::UnknownPiece(PieceId(42)))
        );
    }

    #[test]
    fn test_crossing_placements_keep_both_pieces() {
        let mut grid = grid_from_rows(&["RG"]).unwrap();
        let red = grid.occupant(0, 0).unwrap().id();
        let green = grid.occupant(1, 0).unwrap().id();

        grid.place(red, 1, 0).unwrap();
        // green is detached until its own placement lands
        assert!(!grid.is_consistent());
        grid.place(green, 0, 0).unwrap();

        assert_eq!(grid.to_rows(), vec!["GR"]);
        assert!(grid.is_consistent());
    }

    #[test]
    fn test_rows_are_top_first() {
        let grid = grid_from_rows(&["R..", "G.B"]).unwrap();
        assert_eq!(grid.kind_at(0, 1), Some(Kind::Red));
        assert_eq!(grid.kind_at(0, 0), Some(Kind::Green));
        assert_eq!(grid.kind_at(2, 0), Some(Kind::Blue));
        assert_eq!(grid.to_rows(), vec!["R..", "G.B"]);
    }

    #[test]
    fn test_display_board_formatting() {
        let grid = grid_from_rows(&["R.", ".G"]).unwrap();
        let display = format!("{}", grid);
        assert_eq!(display.lines().count(), 3);
        assert!(display.starts_with("   0 1"));
        assert!(display.contains("1  R . "));
        assert!(display.contains("0  . G "));

        let highlighted = grid.to_string_with_highlight(&[Coord::new(1, 0)]);
        assert!(highlighted.contains("0  . g "));
    }
}
