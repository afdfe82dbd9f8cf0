//! Deterministic board generation
//!
//! All generation logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Ordered iteration over positions
//! - No rendering or platform dependencies

pub mod generate;
pub mod rules;
pub mod state;
pub mod walker;

pub use generate::{Generator, generate};
pub use rules::{redirect, viable_orientations, visit};
pub use state::{
    Board, Cell, CellKind, Direction, Orientation, Position, RngState, TeleporterPool,
    teleporter_symbol,
};
pub use walker::PathWalker;
