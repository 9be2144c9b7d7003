use crate::config::MAX_DIMENSION;
use crate::error::ParseError;
use crate::grid::Grid;
use crate::piece::Kind;

/// Parses an array of string slices into a `Grid`.
///
/// Each string slice is one row, **top row first**, so the last slice becomes
/// row `y = 0`. The grid width is the length of the rows, which must all be
/// equal.
///
/// Valid characters are the kind letters `R`, `G`, `B`, `Y`, `P`, `O` and `.`
/// for an empty cell. Any other character results in an error.
///
/// # Examples
/// ```
/// use match3_engine::utils::grid_from_rows;
/// use match3_engine::piece::Kind;
///
/// let grid = grid_from_rows(&[
///     "RG.", // y = 1
///     "BYP", // y = 0
/// ]).unwrap();
/// assert_eq!(grid.width(), 3);
/// assert_eq!(grid.height(), 2);
/// assert_eq!(grid.kind_at(0, 1), Some(Kind::Red));
/// assert_eq!(grid.kind_at(2, 1), None);
/// assert_eq!(grid.kind_at(2, 0), Some(Kind::Purple));
///
/// assert!(grid_from_rows(&["RXB"]).is_err());
/// assert!(grid_from_rows(&["RGB", "RG"]).is_err());
/// ```
pub fn grid_from_rows(rows: &[&str]) -> Result<Grid, ParseError> {
    let width = match rows.first() {
        Some(first) => first.chars().count(),
        None => return Err(ParseError::Empty),
    };
    let height = rows.len();
    if width > MAX_DIMENSION as usize || height > MAX_DIMENSION as usize {
        return Err(ParseError::TooLarge {
            width,
            height,
            max: MAX_DIMENSION,
        });
    }
    let mut grid = Grid::new(width as i32, height as i32);

    for (r, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(ParseError::RaggedRow {
                row: r,
                expected: width,
                found,
            });
        }

        let y = (height - 1 - r) as i32;
        for (c, ch) in row.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            let kind = Kind::from_char(ch).ok_or(ParseError::UnknownCell { ch, row: r, col: c })?;
            // in bounds by construction
            let spawned = grid.spawn(kind, c as i32, y);
            debug_assert!(spawned.is_ok(), "spawn failed: {:?}", spawned);
        }
    }

    Ok(grid)
}

/// Parses a multi-line board text, ignoring blank lines and surrounding
/// whitespace on each line.
pub fn grid_from_str(text: &str) -> Result<Grid, ParseError> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    grid_from_rows(&rows)
}
