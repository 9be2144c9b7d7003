//! The board engine driven by player gestures and animation completions.
//!
//! Work proceeds in phases: swap → settle → match check → clear → collapse →
//! settle → match check → … Each settle waits until every relocation handed to
//! the [`Presenter`] has been confirmed through [`Board::place`]. Gestures are
//! ignored until the board is idle again.
use std::collections::VecDeque;
use std::time::Duration;

use crate::cascade::{CascadeEngine, CascadeReport};
use crate::config::BoardConfig;
use crate::error::{BoardError, ConfigError};
use crate::generator::{BoardGenerator, FillReport};
use crate::grid::Grid;
use crate::matcher::{MatchFinder, MatchSet};
use crate::piece::{Coord, PieceId};
use crate::presenter::Presenter;
use crate::swap::{GestureState, SwapOutcome, SwapResolver};

/// A relocation handed to the presenter and not yet confirmed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Relocation {
    pub piece: PieceId,
    pub to: Coord,
    pub duration: Duration,
}

/// Where the board is in its phase sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    /// Two pieces are trading places; matches are checked once both land.
    Swapping {
        first: Coord,
        target: Coord,
        pair: (PieceId, PieceId),
    },
    /// A swap without matches is being reversed.
    RollingBack,
    /// Match sets are waiting to be cleared.
    Cascading,
    /// Pieces are falling; `moved` are checked for matches once they land.
    Collapsing { moved: Vec<PieceId> },
}

/// A match-3 board: grid, rules and the gesture/animation state machine.
///
/// # Examples
/// ```
/// use match3_engine::board::Board;
/// use match3_engine::config::BoardConfig;
/// use match3_engine::piece::Coord;
/// use match3_engine::presenter::NullPresenter;
/// use match3_engine::utils::grid_from_rows;
///
/// let grid = grid_from_rows(&[
///     "GBR",
///     "RRG",
/// ]).unwrap();
/// let config = BoardConfig { refill: false, ..BoardConfig::default() };
/// let mut board = Board::from_grid(grid, config).unwrap();
/// let mut presenter = NullPresenter;
///
/// board.on_select(Coord::new(2, 0)).unwrap();
/// board.on_drag_to(Coord::new(2, 1)).unwrap();
/// assert!(board.on_release(&mut presenter));
/// board.settle(&mut presenter);
///
/// assert!(board.is_idle());
/// assert_eq!(board.grid().to_rows(), vec!["...", "GBG"]);
/// ```
#[derive(Clone, Debug)]
pub struct Board {
    config: BoardConfig,
    grid: Grid,
    finder: MatchFinder,
    swapper: SwapResolver,
    cascade: CascadeEngine,
    generator: BoardGenerator,
    gesture: GestureState,
    phase: Phase,
    in_flight: Vec<Relocation>,
    pending: VecDeque<MatchSet>,
    last_swap: Option<SwapOutcome>,
    report: CascadeReport,
    fill_report: FillReport,
}

impl Board {
    /// Creates a board from `config` and fills it with random pieces.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        let grid = Grid::new(config.width, config.height);
        let mut board = Board::from_grid(grid, config)?;
        board.fill_report = board.generator.fill(&mut board.grid);
        Ok(board)
    }

    /// Wraps an existing grid. The grid's own dimensions win over
    /// `config.width`/`config.height`.
    pub fn from_grid(grid: Grid, mut config: BoardConfig) -> Result<Self, ConfigError> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;

        let finder = MatchFinder::new(config.min_match);
        let generator = BoardGenerator::new(
            config.palette(),
            config.rng_seed(),
            config.retry_budget,
            finder,
        );
        Ok(Board {
            finder,
            swapper: SwapResolver::new(finder),
            cascade: CascadeEngine::new(finder),
            generator,
            config,
            grid,
            gesture: GestureState::default(),
            phase: Phase::Idle,
            in_flight: Vec::new(),
            pending: VecDeque::new(),
            last_swap: None,
            report: CascadeReport::default(),
            fill_report: FillReport::default(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn finder(&self) -> &MatchFinder {
        &self.finder
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// True when no phase sequence is running and nothing is in flight.
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle && self.in_flight.is_empty()
    }

    /// Relocations handed to the presenter and not yet confirmed.
    pub fn in_flight(&self) -> &[Relocation] {
        &self.in_flight
    }

    /// Outcome of the most recent swap attempt.
    pub fn last_swap(&self) -> Option<&SwapOutcome> {
        self.last_swap.as_ref()
    }

    /// Cascade statistics since the last committed swap.
    pub fn cascade_report(&self) -> CascadeReport {
        self.report
    }

    /// Result of the initial fill, or of the latest refill.
    pub fn fill_report(&self) -> &FillReport {
        &self.fill_report
    }

    fn check_bounds(&self, at: Coord) -> Result<(), BoardError> {
        self.grid.get(at.x, at.y).map(|_| ())
    }

    /// The player pressed a cell.
    pub fn on_select(&mut self, at: Coord) -> Result<(), BoardError> {
        self.check_bounds(at)?;
        if self.is_idle() {
            self.gesture.select(at);
        }
        Ok(())
    }

    /// The player dragged onto a cell.
    pub fn on_drag_to(&mut self, at: Coord) -> Result<(), BoardError> {
        self.check_bounds(at)?;
        if self.is_idle() {
            self.gesture.drag_to(at);
        }
        Ok(())
    }

    /// The player let go. Starts a swap if the gesture selected two adjacent
    /// occupied cells. The selection is cleared either way.
    ///
    /// # Arguments
    /// * `presenter`: receives the two swap relocations.
    ///
    /// # Returns
    /// `true` if a swap started. `false` if the board was busy, the gesture
    /// was incomplete, or the swap was declined (see [`Board::last_swap`]).
    pub fn on_release(&mut self, presenter: &mut dyn Presenter) -> bool {
        let pair = self.gesture.release();
        if !self.is_idle() {
            return false;
        }
        let (first, target) = match pair {
            Some(pair) => pair,
            None => return false,
        };
        let ids = match self.swapper.swap_pair(&self.grid, first, target) {
            Some(ids) => ids,
            None => {
                self.last_swap = Some(SwapOutcome::Declined);
                return false;
            }
        };

        self.report = CascadeReport::default();
        let duration = self.config.swap_duration();
        self.relocate(ids.0, target, duration, presenter);
        self.relocate(ids.1, first, duration, presenter);
        self.phase = Phase::Swapping {
            first,
            target,
            pair: ids,
        };
        true
    }

    /// Completion callback for a relocation: writes piece `id` into `(x, y)`.
    ///
    /// When the last in-flight relocation lands the board moves on to its next
    /// phase, which may hand out new relocations.
    pub fn place(
        &mut self,
        id: PieceId,
        x: i32,
        y: i32,
        presenter: &mut dyn Presenter,
    ) -> Result<(), BoardError> {
        self.grid.place(id, x, y)?;
        let to = Coord::new(x, y);
        if let Some(i) = self
            .in_flight
            .iter()
            .position(|r| r.piece == id && r.to == to)
        {
            self.in_flight.remove(i);
        }
        if !self.in_flight.iter().any(|r| r.piece == id) {
            self.grid.set_moving(id, false);
        }

        if self.in_flight.is_empty() {
            self.advance(presenter);
        }
        Ok(())
    }

    /// Confirms every relocation immediately, running the phase sequence to
    /// completion. For synchronous callers and tests.
    pub fn settle(&mut self, presenter: &mut dyn Presenter) {
        while let Some(next) = self.in_flight.first().copied() {
            if self.place(next.piece, next.to.x, next.to.y, presenter).is_err() {
                // the piece is gone; nothing will confirm it
                self.in_flight.remove(0);
                if self.in_flight.is_empty() {
                    self.advance(presenter);
                }
            }
        }
    }

    /// Presentation helper: un-highlights `(x, y)` and highlights every piece
    /// matching there. Returns the match.
    pub fn highlight_matches_at(&self, x: i32, y: i32, presenter: &mut dyn Presenter) -> MatchSet {
        let matches = self.finder.find_matches_at(&self.grid, x, y);
        if self.grid.in_bounds(x, y) {
            presenter.unhighlight(Coord::new(x, y));
        }
        if !matches.is_empty() {
            presenter.highlight(&matches);
        }
        matches
    }

    fn relocate(
        &mut self,
        id: PieceId,
        to: Coord,
        duration: Duration,
        presenter: &mut dyn Presenter,
    ) {
        let piece = match self.grid.piece(id) {
            Some(piece) if !piece.is_moving() => *piece,
            _ => return,
        };
        self.grid.set_moving(id, true);
        self.in_flight.push(Relocation {
            piece: id,
            to,
            duration,
        });
        presenter.relocate(&piece, to, duration);
    }

    /// Runs phases until one has to wait for relocations, or the board is idle.
    fn advance(&mut self, presenter: &mut dyn Presenter) {
        while self.in_flight.is_empty() {
            match std::mem::take(&mut self.phase) {
                Phase::Idle => return,

                Phase::Swapping {
                    first,
                    target,
                    pair,
                } => {
                    let matches = self.swapper.matches_after_swap(&self.grid, first, target);
                    if matches.is_empty() {
                        let duration = self.config.swap_duration();
                        self.relocate(pair.0, first, duration, presenter);
                        self.relocate(pair.1, target, duration, presenter);
                        self.last_swap = Some(SwapOutcome::RolledBack);
                        self.phase = Phase::RollingBack;
                    } else {
                        self.last_swap = Some(SwapOutcome::Committed(matches.clone()));
                        self.pending.push_back(matches);
                        self.phase = Phase::Cascading;
                    }
                }

                Phase::RollingBack => {
                    debug_assert!(self.grid.is_consistent());
                    return;
                }

                Phase::Cascading => match self.pending.pop_front() {
                    Some(matches) => self.clear_and_collapse(matches, presenter),
                    None => {
                        if self.refill(presenter) {
                            self.phase = Phase::Cascading;
                        } else {
                            debug_assert!(self.grid.is_consistent());
                            return;
                        }
                    }
                },

                Phase::Collapsing { moved } => {
                    self.report.match_checks += 1;
                    let matches = self.cascade.rematch(&self.grid, &moved);
                    if !matches.is_empty() {
                        self.pending.push_back(matches);
                    }
                    self.phase = Phase::Cascading;
                }
            }
        }
    }

    fn clear_and_collapse(&mut self, matches: MatchSet, presenter: &mut dyn Presenter) {
        if matches.is_empty() {
            self.phase = Phase::Cascading;
            return;
        }
        self.report.tiers += 1;
        presenter.highlight(&matches);

        let tier = self.cascade.step(&mut self.grid, &matches);
        for piece in &tier.cleared {
            presenter.unhighlight(piece.coord());
        }
        self.report.cleared += tier.cleared.len();
        self.report.moved += tier.falls.len();

        let duration = self.config.collapse_duration();
        for fall in &tier.falls {
            self.relocate(fall.piece, fall.to, duration, presenter);
        }
        self.phase = Phase::Collapsing {
            moved: tier.moved(),
        };
    }

    /// Refills empty cells if configured. Returns true if the new pieces
    /// formed matches that were queued.
    fn refill(&mut self, presenter: &mut dyn Presenter) -> bool {
        if !self.config.refill {
            return false;
        }
        let report = self.generator.fill(&mut self.grid);
        for id in &report.placed {
            if let Some(piece) = self.grid.piece(*id) {
                presenter.spawned(piece);
            }
        }

        self.report.match_checks += 1;
        let matches = self.finder.find_matches_among(&self.grid, &report.placed);
        self.fill_report = report;
        if matches.is_empty() {
            false
        } else {
            self.pending.push_back(matches);
            true
        }
    }
}
