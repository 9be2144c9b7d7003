use std::path::PathBuf;

use crate::piece::PieceId;

/// Errors surfaced by the board's public entry points.
///
/// Internal queries never produce these; they treat an out-of-bounds or empty
/// cell as "no occupant".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("no live piece with id {0}")]
    UnknownPiece(PieceId),
}

/// Errors that can occur when parsing a text board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("board text has no rows")]
    Empty,

    #[error("row {row} has {found} cells (expected {expected})")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unrecognized character '{ch}' in row {row} col {col}")]
    UnknownCell { ch: char, row: usize, col: usize },

    #[error("board is {width}x{height}, sides are limited to {max}")]
    TooLarge { width: usize, height: usize, max: i32 },
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
