//! Discrete ball-path walking
//!
//! The ball is never simulated continuously: it moves one cell per step in one
//! of four headings. The walker answers "where next" and "is this still the
//! placement region" questions without touching board state.

use super::state::{Board, Direction, Position};

/// Stateless path queries for an N×N grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathWalker {
    size: i32,
}

impl PathWalker {
    pub fn new(size: i32) -> Self {
        Self { size }
    }

    pub fn for_board(board: &Board) -> Self {
        Self::new(board.dim())
    }

    /// Inside the full grid
    #[inline]
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.size && pos.col >= 0 && pos.col < self.size
    }

    /// Strictly inside the outer border ring
    #[inline]
    pub fn is_interior(&self, pos: Position) -> bool {
        pos.row > 0 && pos.row < self.size - 1 && pos.col > 0 && pos.col < self.size - 1
    }

    /// On the border ring but not a corner
    pub fn is_edge_non_corner(&self, pos: Position) -> bool {
        if !self.is_in_bounds(pos) || self.is_interior(pos) {
            return false;
        }
        let last = self.size - 1;
        let row_edge = pos.row == 0 || pos.row == last;
        let col_edge = pos.col == 0 || pos.col == last;
        !(row_edge && col_edge)
    }

    /// Adjacent cell in `direction`; the input itself if that would leave the grid
    pub fn next_position(&self, pos: Position, direction: Direction) -> Position {
        let next = pos.step(direction);
        if self.is_in_bounds(next) { next } else { pos }
    }

    /// Heading that carries the ball from an edge cell into the grid
    pub fn starting_direction(&self, entry: Position) -> Direction {
        if entry.row == 0 {
            Direction::Down
        } else if entry.row == self.size - 1 {
            Direction::Up
        } else if entry.col == 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    /// Open interior positions straight ahead of `pos` (exclusive), nearest first
    pub fn open_positions_along(
        &self,
        pos: Position,
        direction: Direction,
        board: &Board,
    ) -> Vec<Position> {
        let mut found = Vec::new();
        let mut current = pos;
        loop {
            let next = self.next_position(current, direction);
            if next == current || !self.is_interior(next) {
                break;
            }
            if board.is_open(next) {
                found.push(next);
            }
            current = next;
        }
        found
    }

    /// Cells strictly between two positions on the same row or column
    ///
    /// Empty when the positions are adjacent, equal, or not axis-aligned.
    pub fn between(&self, from: Position, to: Position) -> Vec<Position> {
        let direction = match (to.row - from.row, to.col - from.col) {
            (0, dc) if dc > 0 => Direction::Right,
            (0, dc) if dc < 0 => Direction::Left,
            (dr, 0) if dr > 0 => Direction::Down,
            (dr, 0) if dr < 0 => Direction::Up,
            _ => return Vec::new(),
        };
        let mut cells = Vec::new();
        let mut current = from.step(direction);
        while current != to {
            cells.push(current);
            current = current.step(direction);
        }
        cells
    }
}
