//! Board state and core grid types
//!
//! The board is the only mutable structure touched during generation. It owns
//! the cell array plus the `open`/`occupied` bookkeeping that decides where new
//! obstacles may go.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GRID_SIZE, MIN_GRID_SIZE, TELEPORTER_SYMBOLS};
use crate::error::GridError;

/// A grid coordinate (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Neighbouring coordinate in `direction`, without any bounds check
    pub fn step(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Self::new(self.row + dr, self.col + dc)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

/// Ball travel heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    /// No further movement possible
    #[default]
    None,
}

impl Direction {
    /// The four real headings
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// (row, col) delta for one step
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::None => (0, 0),
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::None => "None",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "none" => Some(Direction::None),
            _ => None,
        }
    }
}

/// Rotation of the obstacle occupying a cell; meaning depends on the cell kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    DownRight,
    UpRight,
    Vertical,
    Horizontal,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
    #[default]
    None,
}

impl Orientation {
    pub const ALL: [Orientation; 9] = [
        Orientation::DownRight,
        Orientation::UpRight,
        Orientation::Vertical,
        Orientation::Horizontal,
        Orientation::TopRight,
        Orientation::TopLeft,
        Orientation::BottomRight,
        Orientation::BottomLeft,
        Orientation::None,
    ];

    /// Stable integer code used across the host boundary
    pub fn code(&self) -> i32 {
        match self {
            Orientation::DownRight => 0,
            Orientation::UpRight => 1,
            Orientation::Vertical => 2,
            Orientation::Horizontal => 3,
            Orientation::TopRight => 4,
            Orientation::TopLeft => 5,
            Orientation::BottomRight => 6,
            Orientation::BottomLeft => 7,
            Orientation::None => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|o| o.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::DownRight => "DownRight",
            Orientation::UpRight => "UpRight",
            Orientation::Vertical => "Vertical",
            Orientation::Horizontal => "Horizontal",
            Orientation::TopRight => "TopRight",
            Orientation::TopLeft => "TopLeft",
            Orientation::BottomRight => "BottomRight",
            Orientation::BottomLeft => "BottomLeft",
            Orientation::None => "None",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.as_str().to_lowercase() == s)
    }
}

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Entry,
    Exit,
    /// Crossed by the ball without stopping
    InBallPath,
    Bumper,
    Tunnel,
    Teleporter,
    ActivatedBumper,
    DirectionalBumper,
}

impl CellKind {
    pub const ALL: [CellKind; 9] = [
        CellKind::Empty,
        CellKind::Entry,
        CellKind::Exit,
        CellKind::InBallPath,
        CellKind::Bumper,
        CellKind::Tunnel,
        CellKind::Teleporter,
        CellKind::ActivatedBumper,
        CellKind::DirectionalBumper,
    ];

    /// Kinds the placement engine may put on the board
    pub const OBSTACLES: [CellKind; 5] = [
        CellKind::Bumper,
        CellKind::Tunnel,
        CellKind::Teleporter,
        CellKind::ActivatedBumper,
        CellKind::DirectionalBumper,
    ];

    pub fn is_obstacle(&self) -> bool {
        Self::OBSTACLES.contains(self)
    }

    /// Whether the ball crosses this cell without interaction
    pub fn is_passable(&self) -> bool {
        matches!(self, CellKind::Empty | CellKind::InBallPath)
    }

    /// Stable integer code used across the host boundary
    pub fn code(&self) -> i32 {
        match self {
            CellKind::Empty => 0,
            CellKind::Entry => 1,
            CellKind::Exit => 2,
            CellKind::InBallPath => 3,
            CellKind::Bumper => 4,
            CellKind::Tunnel => 5,
            CellKind::Teleporter => 6,
            CellKind::ActivatedBumper => 7,
            CellKind::DirectionalBumper => 8,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.code() == code)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Empty => "Empty",
            CellKind::Entry => "Entry",
            CellKind::Exit => "Exit",
            CellKind::InBallPath => "InBallPath",
            CellKind::Bumper => "Bumper",
            CellKind::Tunnel => "Tunnel",
            CellKind::Teleporter => "Teleporter",
            CellKind::ActivatedBumper => "ActivatedBumper",
            CellKind::DirectionalBumper => "DirectionalBumper",
        }
    }

    /// Case-insensitive; also accepts snake_case and kebab-case names
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str().to_lowercase() == key)
    }
}

/// A single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub orientation: Orientation,
    /// Shared by both cells of a teleporter pair
    pub teleporter_index: Option<u8>,
    /// Only meaningful for ActivatedBumper: false until the ball first lands on it
    #[serde(default)]
    pub activated: bool,
}

impl Cell {
    pub fn obstacle(kind: CellKind, orientation: Orientation) -> Self {
        Self {
            kind,
            orientation,
            teleporter_index: None,
            activated: false,
        }
    }

    pub fn teleporter(index: u8) -> Self {
        Self {
            kind: CellKind::Teleporter,
            orientation: Orientation::None,
            teleporter_index: Some(index),
            activated: false,
        }
    }
}

/// Teleporter index pool, owned by a single generation attempt
///
/// Indices are drawn uniformly from the unused part of a fixed symbol pool.
/// An index is never handed out twice within one attempt.
#[derive(Debug, Clone, Default)]
pub struct TeleporterPool {
    used: BTreeSet<u8>,
}

impl TeleporterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh index, or None once every symbol is in use
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<u8> {
        let free: Vec<u8> = (0..TELEPORTER_SYMBOLS)
            .filter(|i| !self.used.contains(i))
            .collect();
        if free.is_empty() {
            return None;
        }
        let index = free[rng.random_range(0..free.len())];
        self.used.insert(index);
        Some(index)
    }

    pub fn in_use(&self) -> usize {
        self.used.len()
    }

    pub fn reset(&mut self) {
        self.used.clear();
    }
}

/// Display symbol for a teleporter index ('a'..='z')
///
/// Lowercase so a pair never reads as the `E`/`X` of the entry and exit.
pub fn teleporter_symbol(index: u8) -> char {
    char::from(b'a' + (index % TELEPORTER_SYMBOLS))
}

/// RNG seed wrapper so every board can be reproduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed drawn from the thread RNG
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// N×N grid of cells plus placement bookkeeping
///
/// `open`/`occupied` are not serialized; loading a board rebuilds them from
/// the cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot")]
pub struct Board {
    size: i32,
    /// Row-major
    cells: Vec<Cell>,
    /// Interior positions still eligible for placement
    #[serde(skip)]
    open: BTreeSet<Position>,
    /// Positions withdrawn from placement (entry, trail, obstacles, exit)
    #[serde(skip)]
    occupied: BTreeSet<Position>,
    entry: Option<Position>,
    exit: Option<Position>,
    objects_placed: usize,
    /// Positions the ball visited, in order (teleport jumps included)
    trajectory: Vec<Position>,
    /// Attempts used to produce this board
    attempts: u32,
    seed: Option<u64>,
}

/// Serialized form of a `Board`, without the derived placement sets
#[derive(Deserialize)]
struct BoardSnapshot {
    size: i32,
    cells: Vec<Cell>,
    entry: Option<Position>,
    exit: Option<Position>,
    objects_placed: usize,
    trajectory: Vec<Position>,
    attempts: u32,
    seed: Option<u64>,
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = GridError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        let BoardSnapshot {
            size,
            cells,
            entry,
            exit,
            objects_placed,
            trajectory,
            attempts,
            seed,
        } = snapshot;

        let side = usize::try_from(size)
            .map_err(|_| GridError::config(format!("board size {size} is negative")))?;
        if side < MIN_GRID_SIZE || side > MAX_GRID_SIZE {
            return Err(GridError::config(format!(
                "board size {size} is outside {MIN_GRID_SIZE}..={MAX_GRID_SIZE}"
            )));
        }
        if cells.len() != side * side {
            return Err(GridError::config(format!(
                "expected {} cells for a {size}x{size} board, got {}",
                side * side,
                cells.len()
            )));
        }

        let mut board = Self {
            size,
            cells,
            open: BTreeSet::new(),
            occupied: BTreeSet::new(),
            entry,
            exit,
            objects_placed,
            trajectory,
            attempts,
            seed,
        };
        board.rebuild_placement_sets();
        Ok(board)
    }
}

impl Board {
    /// Create an empty board; `size` must already be validated (>= 3)
    pub fn new(size: usize) -> Self {
        let size = i32::try_from(size).unwrap_or(i32::MAX);
        let mut board = Self {
            size,
            cells: Vec::new(),
            open: BTreeSet::new(),
            occupied: BTreeSet::new(),
            entry: None,
            exit: None,
            objects_placed: 0,
            trajectory: Vec::new(),
            attempts: 0,
            seed: None,
        };
        board.reset();
        board
    }

    /// Return every cell to Empty and rebuild `open`/`occupied`
    pub fn reset(&mut self) {
        let n = (self.size * self.size) as usize;
        self.cells.clear();
        self.cells.resize(n, Cell::default());
        self.open.clear();
        self.occupied.clear();
        for row in 1..self.size - 1 {
            for col in 1..self.size - 1 {
                self.open.insert(Position::new(row, col));
            }
        }
        self.entry = None;
        self.exit = None;
        self.objects_placed = 0;
        self.trajectory.clear();
    }

    /// Recompute `open`/`occupied` from the cells: empty interior cells are
    /// open, every non-empty cell is occupied
    fn rebuild_placement_sets(&mut self) {
        let last = self.size - 1;
        let mut open = BTreeSet::new();
        let mut occupied = BTreeSet::new();
        for (pos, cell) in self.iter() {
            if cell.kind != CellKind::Empty {
                occupied.insert(pos);
            } else if pos.row > 0 && pos.row < last && pos.col > 0 && pos.col < last {
                open.insert(pos);
            }
        }
        self.open = open;
        self.occupied = occupied;
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub(crate) fn dim(&self) -> i32 {
        self.size
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.size && pos.col >= 0 && pos.col < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.row * self.size + pos.col) as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let i = self.index(pos)?;
        Some(&mut self.cells[i])
    }

    /// Kind, orientation and teleporter index of the cell at (row, col)
    pub fn cell_at(
        &self,
        row: i32,
        col: i32,
    ) -> Result<(CellKind, Orientation, Option<u8>), GridError> {
        self.cell(Position::new(row, col))
            .map(|c| (c.kind, c.orientation, c.teleporter_index))
            .ok_or(GridError::OutOfBounds {
                row,
                col,
                size: self.size(),
            })
    }

    pub fn kind_at(&self, pos: Position) -> CellKind {
        self.cell(pos).map(|c| c.kind).unwrap_or_default()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size as usize)
    }

    /// Every (position, cell) pair in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (Position::new(i as i32 / size, i as i32 % size), c))
    }

    pub fn count_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    pub fn is_open(&self, pos: Position) -> bool {
        self.open.contains(&pos)
    }

    /// Open positions in ascending (row, col) order
    pub fn open_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.open.iter().copied()
    }

    pub fn open_count(&self) -> usize {
        self.open.len()
    }

    pub fn occupied_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.occupied.iter().copied()
    }

    pub fn entry(&self) -> Option<Position> {
        self.entry
    }

    pub fn exit(&self) -> Option<Position> {
        self.exit
    }

    /// Obstacle cells placed during generation (teleporter pairs count twice)
    pub fn objects_placed(&self) -> usize {
        self.objects_placed
    }

    pub fn trajectory(&self) -> &[Position] {
        &self.trajectory
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub(crate) fn set_provenance(&mut self, attempts: u32, seed: Option<u64>) {
        self.attempts = attempts;
        self.seed = seed;
    }

    /// Position of the other cell sharing `pos`'s teleporter index
    pub fn teleporter_partner(&self, pos: Position) -> Option<Position> {
        let index = self.cell(pos)?.teleporter_index?;
        self.iter()
            .find(|(p, c)| {
                *p != pos && c.kind == CellKind::Teleporter && c.teleporter_index == Some(index)
            })
            .map(|(p, _)| p)
    }

    fn withdraw(&mut self, pos: Position) {
        self.open.remove(&pos);
        self.occupied.insert(pos);
    }

    fn set_kind(&mut self, pos: Position, cell: Cell) {
        if let Some(slot) = self.cell_mut(pos) {
            *slot = cell;
        }
        self.withdraw(pos);
    }

    pub(crate) fn mark_entry(&mut self, pos: Position) {
        self.set_kind(pos, Cell::obstacle(CellKind::Entry, Orientation::None));
        self.entry = Some(pos);
        self.trajectory.push(pos);
    }

    pub(crate) fn mark_exit(&mut self, pos: Position) {
        self.set_kind(pos, Cell::obstacle(CellKind::Exit, Orientation::None));
        self.exit = Some(pos);
        self.trajectory.push(pos);
    }

    /// Ball crossed an empty cell
    pub(crate) fn mark_trail(&mut self, pos: Position) {
        self.set_kind(pos, Cell::obstacle(CellKind::InBallPath, Orientation::None));
    }

    pub(crate) fn record_visit(&mut self, pos: Position) {
        self.trajectory.push(pos);
    }

    /// Commit an obstacle and count it
    pub(crate) fn place(&mut self, pos: Position, cell: Cell) {
        self.set_kind(pos, cell);
        self.objects_placed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_opens_interior_only() {
        let board = Board::new(5);
        assert_eq!(board.open_count(), 9);
        assert!(board.is_open(Position::new(1, 1)));
        assert!(board.is_open(Position::new(3, 3)));
        assert!(!board.is_open(Position::new(0, 2)));
        assert!(!board.is_open(Position::new(4, 4)));
        assert_eq!(board.occupied_positions().count(), 0);
    }

    #[test]
    fn test_placement_withdraws_position() {
        let mut board = Board::new(5);
        let pos = Position::new(2, 2);
        board.place(pos, Cell::obstacle(CellKind::Bumper, Orientation::UpRight));
        assert!(!board.is_open(pos));
        assert!(board.occupied_positions().any(|p| p == pos));
        assert_eq!(board.objects_placed(), 1);

        board.reset();
        assert!(board.is_open(pos));
        assert_eq!(board.kind_at(pos), CellKind::Empty);
        assert_eq!(board.objects_placed(), 0);
    }

    #[test]
    fn test_cell_at_out_of_bounds() {
        let board = Board::new(4);
        assert!(board.cell_at(0, 0).is_ok());
        assert!(matches!(
            board.cell_at(4, 0),
            Err(GridError::OutOfBounds { row: 4, col: 0, size: 4 })
        ));
        assert!(board.cell_at(-1, 2).is_err());
    }

    #[test]
    fn test_teleporter_partner_lookup() {
        let mut board = Board::new(6);
        let a = Position::new(1, 2);
        let b = Position::new(4, 3);
        board.place(a, Cell::teleporter(7));
        board.place(b, Cell::teleporter(7));
        board.place(Position::new(2, 2), Cell::teleporter(3));
        assert_eq!(board.teleporter_partner(a), Some(b));
        assert_eq!(board.teleporter_partner(b), Some(a));
        assert_eq!(board.teleporter_partner(Position::new(2, 2)), None);
        assert_eq!(board.teleporter_partner(Position::new(3, 3)), None);
    }

    #[test]
    fn test_teleporter_pool_never_repeats() {
        let mut rng = RngState::new(42).to_rng();
        let mut pool = TeleporterPool::new();
        let mut seen = BTreeSet::new();
        for _ in 0..TELEPORTER_SYMBOLS {
            let index = pool.draw(&mut rng).unwrap();
            assert!(seen.insert(index), "index {index} handed out twice");
        }
        assert_eq!(pool.draw(&mut rng), None);

        pool.reset();
        assert_eq!(pool.in_use(), 0);
        assert!(pool.draw(&mut rng).is_some());
    }

    #[test]
    fn test_enum_codes_round_trip() {
        for kind in CellKind::ALL {
            assert_eq!(CellKind::from_code(kind.code()), Some(kind));
            assert_eq!(CellKind::from_str(kind.as_str()), Some(kind));
        }
        for orientation in Orientation::ALL {
            assert_eq!(Orientation::from_code(orientation.code()), Some(orientation));
        }
        assert_eq!(CellKind::from_str("directional_bumper"), Some(CellKind::DirectionalBumper));
        assert_eq!(CellKind::from_code(42), None);
        assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
    }

    #[test]
    fn test_teleporter_symbols() {
        assert_eq!(teleporter_symbol(0), 'a');
        assert_eq!(teleporter_symbol(4), 'e');
        assert_eq!(teleporter_symbol(23), 'x');
        assert_eq!(teleporter_symbol(25), 'z');
    }

    #[test]
    fn test_loaded_board_rebuilds_placement_sets() {
        let mut board = Board::new(5);
        board.mark_entry(Position::new(0, 2));
        board.mark_trail(Position::new(1, 2));
        board.place(
            Position::new(2, 2),
            Cell::obstacle(CellKind::Bumper, Orientation::UpRight),
        );
        board.mark_trail(Position::new(2, 3));
        board.mark_exit(Position::new(2, 4));

        let json = serde_json::to_string(&board).unwrap();
        let loaded: Board = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded.open_count(), 6);
        assert!(
            loaded
                .open_positions()
                .eq(board.open_positions()),
            "open set differs after load"
        );
        assert!(loaded.occupied_positions().eq(board.occupied_positions()));
        assert_eq!(loaded.trajectory(), board.trajectory());
        assert_eq!(loaded.objects_placed(), 1);
        assert_eq!(loaded.kind_at(Position::new(2, 2)), CellKind::Bumper);
    }

    #[test]
    fn test_load_rejects_mismatched_cells() {
        let mut value = serde_json::to_value(Board::new(4)).unwrap();
        value["size"] = serde_json::json!(5);
        assert!(serde_json::from_value::<Board>(value).is_err());

        let mut value = serde_json::to_value(Board::new(4)).unwrap();
        value["size"] = serde_json::json!(-4);
        assert!(serde_json::from_value::<Board>(value).is_err());
    }
}
