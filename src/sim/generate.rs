//! Board generation
//!
//! Each attempt seeds an entry on the border, then walks a simulated ball
//! through the grid one cell at a time. While fewer than `min_objects`
//! obstacles exist, a new obstacle is dropped somewhere straight ahead of the
//! ball every time it is launched or redirected, so every obstacle ends up on
//! the ball's real trajectory. The attempt ends when the ball reaches the
//! border, which becomes the exit.
//!
//! Local failures abandon the attempt and the board is rebuilt from scratch,
//! up to `max_attempts` times.

use log::{debug, info, trace, warn};
use rand::Rng;
use rand_pcg::Pcg32;

use super::rules;
use super::state::{Board, Cell, CellKind, Direction, Position, RngState, TeleporterPool};
use super::walker::PathWalker;
use crate::consts::WALK_STEPS_PER_CELL;
use crate::error::{AttemptFailure, GridError};
use crate::settings::BoardConfig;

/// Generates boards for one configuration from an injectable random source
#[derive(Debug, Clone)]
pub struct Generator<R: Rng = Pcg32> {
    config: BoardConfig,
    rng: R,
    seed: Option<u64>,
}

impl Generator<Pcg32> {
    /// Validate `config` and seed a PCG generator from `config.seed`, or from
    /// entropy when no seed is set (the drawn seed is logged and kept on the board)
    pub fn new(config: BoardConfig) -> Result<Self, GridError> {
        let state = config
            .seed
            .map(RngState::new)
            .unwrap_or_else(RngState::from_entropy);
        Self::from_seed(config, state.seed)
    }

    pub fn from_seed(config: BoardConfig, seed: u64) -> Result<Self, GridError> {
        config.validate()?;
        debug!("Generator seeded with {seed}");
        Ok(Self {
            config,
            rng: RngState::new(seed).to_rng(),
            seed: Some(seed),
        })
    }
}

impl<R: Rng> Generator<R> {
    /// Use a caller-supplied random source
    pub fn with_rng(config: BoardConfig, rng: R) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            seed: None,
        })
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Produce a valid board, retrying failed attempts up to the configured ceiling
    pub fn generate(&mut self) -> Result<Board, GridError> {
        let mut board = Board::new(self.config.size);
        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.attempt(&mut board) {
                Ok(()) => {
                    board.set_provenance(attempts, self.seed);
                    info!(
                        "Generated {0}x{0} board: {1} objects in {2} attempt(s), seed {3:?}",
                        self.config.size,
                        board.objects_placed(),
                        attempts,
                        self.seed
                    );
                    return Ok(board);
                }
                Err(failure) if attempts >= self.config.max_attempts => {
                    warn!("Giving up after {attempts} attempts: {failure}");
                    return Err(GridError::GenerationExhausted {
                        attempts,
                        last_failure: failure,
                    });
                }
                Err(failure) => {
                    debug!("Attempt {attempts} failed ({failure}), regenerating");
                }
            }
        }
    }

    /// One full run from a freshly reset board
    fn attempt(&mut self, board: &mut Board) -> Result<(), AttemptFailure> {
        board.reset();
        let walker = PathWalker::for_board(board);
        let mut pool = TeleporterPool::new();

        let entry = match self.config.entry {
            Some(entry) => entry,
            None => self.random_entry(&walker, board.dim()),
        };
        board.mark_entry(entry);
        trace!("Entry at ({}, {})", entry.row, entry.col);

        let mut current = entry;
        let mut direction = walker.starting_direction(entry);
        if board.objects_placed() < self.config.min_objects {
            self.place_ahead(board, &walker, &mut pool, current, direction)?;
        }

        let budget = board.size() * board.size() * WALK_STEPS_PER_CELL;
        for _ in 0..budget {
            let mut next = walker.next_position(current, direction);

            if !walker.is_interior(next) {
                let placed = board.objects_placed();
                if placed < self.config.min_objects {
                    return Err(AttemptFailure::ExitedTooEarly {
                        placed,
                        required: self.config.min_objects,
                    });
                }
                if next == entry {
                    return Err(AttemptFailure::ExitOnEntry);
                }
                board.mark_exit(next);
                return Ok(());
            }

            let kind = board.kind_at(next);
            if kind == CellKind::Empty {
                board.mark_trail(next);
            }
            board.record_visit(next);

            if kind.is_obstacle() {
                let incoming = direction;
                if let Some(cell) = board.cell_mut(next) {
                    direction = rules::visit(cell, incoming);
                }
                if kind == CellKind::Teleporter {
                    next = board
                        .teleporter_partner(next)
                        .ok_or(AttemptFailure::NoTeleporterPartner)?;
                    board.record_visit(next);
                }
                trace!(
                    "Ball hit {} at ({}, {}): {} -> {}",
                    kind.as_str(),
                    next.row,
                    next.col,
                    incoming.as_str(),
                    direction.as_str()
                );

                if board.objects_placed() < self.config.min_objects {
                    self.place_ahead(board, &walker, &mut pool, next, direction)?;
                }
            }

            current = next;
        }

        Err(AttemptFailure::LoopBudgetExceeded { steps: budget })
    }

    /// Uniform side, then uniform non-corner offset along it
    fn random_entry(&mut self, walker: &PathWalker, size: i32) -> Position {
        let offset = self.rng.random_range(1..size - 1);
        let entry = match self.rng.random_range(0..4) {
            0 => Position::new(0, offset),
            1 => Position::new(size - 1, offset),
            2 => Position::new(offset, 0),
            _ => Position::new(offset, size - 1),
        };
        debug_assert!(walker.is_edge_non_corner(entry));
        entry
    }

    /// Drop a new obstacle somewhere straight ahead of `from`
    ///
    /// Skips quietly when the chosen cell is shadowed by an obstacle already
    /// between it and the ball; the ball moves on regardless.
    fn place_ahead(
        &mut self,
        board: &mut Board,
        walker: &PathWalker,
        pool: &mut TeleporterPool,
        from: Position,
        direction: Direction,
    ) -> Result<(), AttemptFailure> {
        if board.open_count() == 0 {
            return Err(AttemptFailure::PathExhausted);
        }

        let candidates = walker.open_positions_along(from, direction, board);
        if candidates.is_empty() {
            trace!("No open cells ahead of ({}, {})", from.row, from.col);
            return Ok(());
        }
        let target = candidates[self.rng.random_range(0..candidates.len())];

        let lane = walker.between(from, target);
        if lane.iter().any(|p| !board.kind_at(*p).is_passable()) {
            trace!("({}, {}) is shadowed, skipping placement", target.row, target.col);
            return Ok(());
        }

        // A teleporter needs room for both halves under max_objects
        let room = self.config.max_objects - board.objects_placed();
        let kinds: Vec<CellKind> = self
            .config
            .allowed_kinds
            .iter()
            .copied()
            .filter(|k| *k != CellKind::Teleporter || room >= 2)
            .collect();
        if kinds.is_empty() {
            return Err(AttemptFailure::NoRoomForTeleporterPair);
        }
        let kind = kinds[self.rng.random_range(0..kinds.len())];

        if kind == CellKind::Teleporter {
            let index = pool
                .draw(&mut self.rng)
                .ok_or(AttemptFailure::TeleporterPoolExhausted)?;
            board.place(target, Cell::teleporter(index));

            // The partner must not block the lane the ball is about to cross
            let partners: Vec<Position> = board
                .open_positions()
                .filter(|p| !lane.contains(p))
                .collect();
            if partners.is_empty() {
                return Err(AttemptFailure::NoTeleporterPartner);
            }
            let partner = partners[self.rng.random_range(0..partners.len())];
            board.place(partner, Cell::teleporter(index));
            trace!(
                "Placed teleporter pair {index} at ({}, {}) and ({}, {})",
                target.row, target.col, partner.row, partner.col
            );
        } else {
            let orientations = rules::viable_orientations(kind);
            let orientation = orientations[self.rng.random_range(0..orientations.len())];
            board.place(target, Cell::obstacle(kind, orientation));
            trace!(
                "Placed {} {} at ({}, {})",
                kind.as_str(),
                orientation.as_str(),
                target.row,
                target.col
            );
        }
        Ok(())
    }
}

/// Validate `config` and generate one board
pub fn generate(config: &BoardConfig) -> Result<Board, GridError> {
    Generator::new(config.clone())?.generate()
}
