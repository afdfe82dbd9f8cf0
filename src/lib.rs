//! Pinball Panic - procedural pinball grid generator
//!
//! Core modules:
//! - `sim`: Deterministic generation (board state, ball walk, direction rules)
//! - `settings`: Board configuration and level presets
//! - `renderer`: Text rendering of generated boards
//! - `platform`: C ABI for embedding in host applications

pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{AttemptFailure, GridError};
pub use settings::{BoardConfig, Level};
pub use sim::{Board, Cell, CellKind, Direction, Generator, Orientation, Position, generate};

/// Generation constants
pub mod consts {
    /// Border ring plus one interior cell
    pub const MIN_GRID_SIZE: usize = 3;
    pub const MAX_GRID_SIZE: usize = 64;

    /// Attempts before generation reports exhaustion
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 500;

    /// Walk step ceiling per grid cell (four headings, two bumper states)
    pub const WALK_STEPS_PER_CELL: usize = 8;

    /// Teleporter index pool size ('a'..='z')
    pub const TELEPORTER_SYMBOLS: u8 = 26;
}
