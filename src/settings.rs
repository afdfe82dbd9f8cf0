//! Board configuration and level presets
//!
//! A `BoardConfig` is validated once, up front. Generation never sees an
//! invalid configuration.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::GridError;
use crate::sim::{CellKind, PathWalker, Position};

/// One step of the level progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub size: usize,
    pub min_objects: usize,
    pub max_objects: usize,
    pub kinds: &'static [CellKind],
}

const BUMPER: &[CellKind] = &[CellKind::Bumper];
const WITH_TUNNEL: &[CellKind] = &[CellKind::Bumper, CellKind::Tunnel];
const WITH_TELEPORTER: &[CellKind] = &[CellKind::Bumper, CellKind::Tunnel, CellKind::Teleporter];
const WITH_ACTIVATED: &[CellKind] = &[
    CellKind::Bumper,
    CellKind::Tunnel,
    CellKind::Teleporter,
    CellKind::ActivatedBumper,
];
const WITH_DIRECTIONAL: &[CellKind] = &[
    CellKind::Bumper,
    CellKind::Tunnel,
    CellKind::Teleporter,
    CellKind::ActivatedBumper,
    CellKind::DirectionalBumper,
];

/// Level table: one new obstacle kind is introduced every couple of levels
pub const LEVELS: [Level; 11] = [
    Level { size: 5, min_objects: 1, max_objects: 1, kinds: BUMPER },
    Level { size: 5, min_objects: 2, max_objects: 2, kinds: BUMPER },
    Level { size: 6, min_objects: 3, max_objects: 4, kinds: BUMPER },
    // tunnel
    Level { size: 6, min_objects: 3, max_objects: 4, kinds: WITH_TUNNEL },
    Level { size: 7, min_objects: 4, max_objects: 6, kinds: WITH_TUNNEL },
    // teleporter
    Level { size: 10, min_objects: 6, max_objects: 7, kinds: WITH_TELEPORTER },
    Level { size: 10, min_objects: 7, max_objects: 8, kinds: WITH_TELEPORTER },
    // activated bumper
    Level { size: 10, min_objects: 7, max_objects: 9, kinds: WITH_ACTIVATED },
    Level { size: 10, min_objects: 8, max_objects: 10, kinds: WITH_ACTIVATED },
    // directional bumper
    Level { size: 10, min_objects: 10, max_objects: 12, kinds: WITH_DIRECTIONAL },
    Level { size: 10, min_objects: 11, max_objects: 13, kinds: WITH_DIRECTIONAL },
];

impl Level {
    /// 1-indexed lookup
    pub fn get(number: usize) -> Option<&'static Level> {
        number.checked_sub(1).and_then(|i| LEVELS.get(i))
    }

    pub fn count() -> usize {
        LEVELS.len()
    }

    pub fn config(&self) -> BoardConfig {
        BoardConfig {
            size: self.size,
            min_objects: self.min_objects,
            max_objects: self.max_objects,
            allowed_kinds: self.kinds.to_vec(),
            ..BoardConfig::default()
        }
    }
}

/// Generation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Grid side length, border ring included
    pub size: usize,
    /// Obstacles that must be placed before the ball may exit
    pub min_objects: usize,
    /// Upper bound on placed obstacles (teleporter pairs count twice)
    pub max_objects: usize,
    /// Obstacle kinds the engine picks from
    pub allowed_kinds: Vec<CellKind>,
    /// Attempts before generation gives up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed RNG seed (drawn from entropy when absent)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Force the entry cell; must be a non-corner edge cell
    #[serde(default)]
    pub entry: Option<Position>,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: 5,
            min_objects: 1,
            max_objects: 1,
            allowed_kinds: vec![CellKind::Bumper],
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
            entry: None,
        }
    }
}

impl BoardConfig {
    /// Build and validate a configuration
    pub fn new(
        size: usize,
        min_objects: usize,
        max_objects: usize,
        allowed_kinds: &[CellKind],
    ) -> Result<Self, GridError> {
        let config = Self {
            size,
            min_objects,
            max_objects,
            allowed_kinds: allowed_kinds.to_vec(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Preset for a 1-indexed level
    pub fn for_level(number: usize) -> Result<Self, GridError> {
        Level::get(number).map(Level::config).ok_or_else(|| {
            GridError::config(format!("level must be 1..={}, got {number}", Level::count()))
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_entry(mut self, entry: Position) -> Self {
        self.entry = Some(entry);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Check every constraint; call again after mutating fields directly
    pub fn validate(&self) -> Result<(), GridError> {
        if self.size < MIN_GRID_SIZE {
            return Err(GridError::config(format!(
                "size must be at least {MIN_GRID_SIZE}, got {}",
                self.size
            )));
        }
        if self.size > MAX_GRID_SIZE {
            return Err(GridError::config(format!(
                "size must be at most {MAX_GRID_SIZE}, got {}",
                self.size
            )));
        }
        if self.min_objects > self.max_objects {
            return Err(GridError::config(format!(
                "min_objects ({}) exceeds max_objects ({})",
                self.min_objects, self.max_objects
            )));
        }
        if self.allowed_kinds.is_empty() {
            return Err(GridError::config("allowed_kinds is empty"));
        }
        if let Some(kind) = self.allowed_kinds.iter().find(|k| !k.is_obstacle()) {
            return Err(GridError::config(format!(
                "{} is not a placeable obstacle",
                kind.as_str()
            )));
        }
        if self.max_attempts == 0 {
            return Err(GridError::config("max_attempts must be at least 1"));
        }
        if let Some(entry) = self.entry {
            let walker = PathWalker::new(self.size as i32);
            if !walker.is_edge_non_corner(entry) {
                return Err(GridError::config(format!(
                    "entry ({}, {}) is not a non-corner edge cell",
                    entry.row, entry.col
                )));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, GridError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GridError::config(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
