//! Error types
//!
//! Only configuration mistakes, bad queries and exhausted generation reach the
//! caller. Attempt-level failures are retried internally.

use thiserror::Error;

/// Errors surfaced by board configuration, queries and generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Rejected at construction, never retried
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// A query referenced a cell outside the grid
    #[error("cell ({row}, {col}) is outside a {size}x{size} grid")]
    OutOfBounds { row: i32, col: i32, size: usize },

    /// Every attempt failed
    #[error("no valid board after {attempts} attempts (last failure: {last_failure})")]
    GenerationExhausted {
        attempts: u32,
        last_failure: AttemptFailure,
    },
}

impl GridError {
    pub fn config(reason: impl Into<String>) -> Self {
        GridError::Configuration {
            reason: reason.into(),
        }
    }
}

/// Why a single generation attempt was abandoned
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    /// No open positions left while placements are still required
    #[error("open positions exhausted")]
    PathExhausted,

    /// No open cell left for a teleporter's second half
    #[error("no teleporter partner available")]
    NoTeleporterPartner,

    /// Only teleporters are allowed and max objects leaves room for one cell
    #[error("no room under max objects for a teleporter pair")]
    NoRoomForTeleporterPair,

    #[error("teleporter symbol pool exhausted")]
    TeleporterPoolExhausted,

    /// The walk ran longer than its step ceiling (the ball is looping)
    #[error("walk exceeded {steps} steps")]
    LoopBudgetExceeded { steps: usize },

    #[error("ball exited after {placed} of {required} objects")]
    ExitedTooEarly { placed: usize, required: usize },

    /// The ball walked back out through the entry cell
    #[error("exit landed on the entry cell")]
    ExitOnEntry,
}
