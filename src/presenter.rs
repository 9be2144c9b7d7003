//! The seam between the board engine and whatever draws it.
//!
//! The engine tells a [`Presenter`] what to show; it never waits on wall-clock
//! time itself. Every `relocate` must eventually be answered by a call to
//! [`Board::place`](crate::board::Board::place) once the animation has ended.
use std::time::Duration;

use crate::matcher::MatchSet;
use crate::piece::{Coord, Piece};

pub trait Presenter {
    /// Start animating `piece` towards `to` over `duration`.
    fn relocate(&mut self, piece: &Piece, to: Coord, duration: Duration);

    /// Draw attention to a set of matched pieces.
    fn highlight(&mut self, _pieces: &MatchSet) {}

    /// Restore the plain look of the cell at `at`.
    fn unhighlight(&mut self, _at: Coord) {}

    /// A new piece has been created at its cell.
    fn spawned(&mut self, _piece: &Piece) {}
}

/// Ignores everything. Pair it with [`Board::settle`](crate::board::Board::settle)
/// to run the engine synchronously.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn relocate(&mut self, _piece: &Piece, _to: Coord, _duration: Duration) {}
}

/// One call received by a [`RecordingPresenter`].
#[derive(Clone, Debug, PartialEq)]
pub enum PresenterEvent {
    Relocate {
        piece: Piece,
        to: Coord,
        duration: Duration,
    },
    Highlight(Vec<Coord>),
    Unhighlight(Coord),
    Spawned(Piece),
}

/// Keeps every call it receives, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of relocations requested so far.
    pub fn relocations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, PresenterEvent::Relocate { .. }))
            .count()
    }

    /// Highlighted coordinate sets, in order.
    pub fn highlights(&self) -> Vec<&[Coord]> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Highlight(coords) => Some(coords.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn relocate(&mut self, piece: &Piece, to: Coord, duration: Duration) {
        self.events.push(PresenterEvent::Relocate {
            piece: *piece,
            to,
            duration,
        });
    }

    fn highlight(&mut self, pieces: &MatchSet) {
        self.events.push(PresenterEvent::Highlight(pieces.coords()));
    }

    fn unhighlight(&mut self, at: Coord) {
        self.events.push(PresenterEvent::Unhighlight(at));
    }

    fn spawned(&mut self, piece: &Piece) {
        self.events.push(PresenterEvent::Spawned(*piece));
    }
}
