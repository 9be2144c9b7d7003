//! # Match-3 Board Engine
//!
//! This library provides the board-state engine of a tile-matching puzzle:
//! it detects lines of same-kind pieces, validates player swaps, resolves
//! chain reactions (clear, collapse, re-match) and fills the board without
//! producing ready-made matches.
//!
//! It does not draw anything and does not keep time. Animation is delegated
//! to a [`presenter::Presenter`]; the board waits for it to confirm every
//! relocation before reading the grid again.
//!
//! It is used by two binaries:
//! - `match3_player`: interactive play on the command line.
//! - `cascade_runner`: loads or generates a board, applies one swap and
//!   reports the cascade; can also gather board generation statistics.
//!
//! ## Modules
//! - `piece`: piece kinds, coordinates and the `Piece` occupant.
//! - `grid`: the authoritative coordinate → piece mapping.
//! - `matcher`: directional runs and per-cell match queries (`MatchFinder`).
//! - `swap`: gesture state and the swap/rollback protocol (`SwapResolver`).
//! - `cascade`: clear → collapse → re-match loop (`CascadeEngine`).
//! - `generator`: random filling without matches (`BoardGenerator`).
//! - `board`: the phase state machine tying the above to a presenter.
//! - `presenter`: the presentation trait and two simple implementations.
//! - `config`: `BoardConfig`, loadable from TOML.
//! - `error`: error types.
//! - `utils`: text board parsing.

pub mod board;
pub mod cascade;
pub mod config;
pub mod error;
pub mod generator;
pub mod grid;
pub mod matcher;
pub mod piece;
pub mod presenter;
pub mod swap;
pub mod utils;
