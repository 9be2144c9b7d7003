//! Board occupants and the coordinates that address them.
//!
//! - `Kind`: the identity used when comparing pieces for a match.
//! - `Coord`: an `(x, y)` cell address, `y = 0` being the bottom row.
//! - `Piece`: a single occupant with a stable id, a kind, a cached coordinate
//!   and a `moving` flag raised while a relocation is in flight.
use rand::Rng;
use std::fmt;

/// The kind of a piece. Two pieces match when their kinds are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
}

impl Kind {
    /// Every kind, in palette order. A board configured with `n` kinds draws
    /// from the first `n` entries.
    pub const ALL: [Kind; 6] = [
        Kind::Red,
        Kind::Green,
        Kind::Blue,
        Kind::Yellow,
        Kind::Purple,
        Kind::Orange,
    ];

    /// Converts the kind to its character representation.
    ///
    /// # Examples
    ///
    /// ```
    /// use match3_engine::piece::Kind;
    /// assert_eq!(Kind::Red.to_char(), 'R');
    /// assert_eq!(Kind::Orange.to_char(), 'O');
    /// ```
    pub fn to_char(self) -> char {
        match self {
            Kind::Red => 'R',
            Kind::Green => 'G',
            Kind::Blue => 'B',
            Kind::Yellow => 'Y',
            Kind::Purple => 'P',
            Kind::Orange => 'O',
        }
    }

    /// Parses the character form produced by [`Kind::to_char`].
    pub fn from_char(ch: char) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| k.to_char() == ch)
    }

    /// Picks a kind uniformly from `palette`.
    ///
    /// Returns `None` for an empty palette.
    pub fn random(rng: &mut impl Rng, palette: &[Kind]) -> Option<Kind> {
        if palette.is_empty() {
            return None;
        }
        Some(palette[rng.gen_range(0..palette.len())])
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A cell address. Signed so that neighbours of edge cells can be expressed
/// and rejected by a bounds check instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Creates a coordinate. No bounds are implied; see [`Grid::in_bounds`](crate::grid::Grid::in_bounds).
    pub const fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// True when `other` is exactly one axis-aligned step away.
    ///
    /// ```
    /// use match3_engine::piece::Coord;
    /// assert!(Coord::new(2, 2).is_adjacent(Coord::new(2, 3)));
    /// assert!(!Coord::new(2, 2).is_adjacent(Coord::new(3, 3)));
    /// assert!(!Coord::new(2, 2).is_adjacent(Coord::new(2, 2)));
    /// ```
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        (dx == 1u32 && dy == 0u32) || (dx == 0u32 && dy == 1u32)
    }

    /// The coordinate `(dx, dy)` away, saturating at the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Coord {
        Coord::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Coord::new(x, y)
    }
}

/// Stable identity of a piece for as long as it lives on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single board occupant.
///
/// `coord` mirrors the cell the grid has this piece in. It is only written by
/// [`Grid::place`](crate::grid::Grid::place), after the grid mapping itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    id: PieceId,
    kind: Kind,
    coord: Coord,
    moving: bool,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: Kind, coord: Coord) -> Self {
        Piece {
            id,
            kind,
            coord,
            moving: false,
        }
    }

    /// Identity of this piece.
    pub fn id(&self) -> PieceId {
        self.id
    }

    /// What the piece matches with.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The cell the piece was last placed in.
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// True while a relocation for this piece is in flight. The board refuses
    /// to hand out another relocation for a moving piece.
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub(crate) fn set_coord(&mut self, coord: Coord) {
        self.coord = coord;
    }

    pub(crate) fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
    }
}
