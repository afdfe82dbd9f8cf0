//! Text rendering of generated boards
//!
//! Read-only consumer of the cell grid. Every cell renders as a glyph plus a
//! space so rows line up in a terminal.

use std::fmt;

use crate::sim::{Board, Cell, CellKind, Orientation, teleporter_symbol};

/// Glyph for a (kind, orientation) pair
pub fn glyph(kind: CellKind, orientation: Orientation) -> char {
    match (kind, orientation) {
        (CellKind::Entry, _) => 'E',
        (CellKind::Exit, _) => 'X',
        (CellKind::Empty, _) => '.',
        (CellKind::InBallPath, _) => ':',
        (CellKind::Bumper, Orientation::UpRight) => '╱',
        (CellKind::Bumper, _) => '╲',
        (CellKind::ActivatedBumper, Orientation::UpRight) => '⧄',
        (CellKind::ActivatedBumper, _) => '⧅',
        (CellKind::Tunnel, Orientation::Horizontal) => '=',
        (CellKind::Tunnel, _) => '‖',
        (CellKind::DirectionalBumper, Orientation::TopLeft) => '◸',
        (CellKind::DirectionalBumper, Orientation::TopRight) => '◹',
        (CellKind::DirectionalBumper, Orientation::BottomLeft) => '◺',
        (CellKind::DirectionalBumper, _) => '◿',
        (CellKind::Teleporter, _) => '*',
    }
}

/// Glyph for a cell; teleporters show their pair symbol
pub fn cell_glyph(cell: &Cell) -> char {
    match (cell.kind, cell.teleporter_index) {
        (CellKind::Teleporter, Some(index)) => teleporter_symbol(index),
        _ => glyph(cell.kind, cell.orientation),
    }
}

/// Whole board, one line per row
pub fn render_ascii(board: &Board) -> String {
    let mut out = String::with_capacity(board.size() * (board.size() * 2 + 1));
    for row in board.rows() {
        for cell in row {
            out.push(cell_glyph(cell));
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_ascii(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BoardConfig;
    use crate::sim::{Generator, Position, rules};
    use std::collections::HashSet;

    #[test]
    fn test_glyphs_distinct_per_placeable_pair() {
        let mut pairs = vec![
            (CellKind::Entry, Orientation::None),
            (CellKind::Exit, Orientation::None),
            (CellKind::Empty, Orientation::None),
            (CellKind::InBallPath, Orientation::None),
        ];
        for kind in CellKind::OBSTACLES {
            for &o in rules::viable_orientations(kind) {
                pairs.push((kind, o));
            }
        }
        let mut seen = HashSet::new();
        for (kind, o) in pairs {
            assert!(seen.insert(glyph(kind, o)), "duplicate glyph for {kind:?} {o:?}");
        }
    }

    #[test]
    fn test_render_shape() {
        let config = BoardConfig::new(5, 2, 2, &[CellKind::Bumper])
            .unwrap()
            .with_entry(Position::new(0, 2));
        let board = Generator::from_seed(config, 3).unwrap().generate().unwrap();
        let text = render_ascii(&board);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in &lines {
            assert_eq!(line.chars().count(), 10);
        }
        assert_eq!(lines[0].chars().nth(4), Some('E'));
        assert_eq!(text.matches('X').count(), 1);
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn test_teleporter_shows_symbol() {
        assert_eq!(cell_glyph(&Cell::teleporter(2)), 'c');
        assert_eq!(glyph(CellKind::Teleporter, Orientation::None), '*');
    }

    #[test]
    fn test_teleporter_symbols_never_clash_with_glyphs() {
        let glyphs: HashSet<char> = CellKind::ALL
            .iter()
            .flat_map(|&kind| Orientation::ALL.iter().map(move |&o| glyph(kind, o)))
            .collect();
        for index in 0..crate::consts::TELEPORTER_SYMBOLS {
            let symbol = teleporter_symbol(index);
            assert!(!glyphs.contains(&symbol), "teleporter {index} renders as '{symbol}'");
        }
    }

    #[test]
    fn test_teleporter_boards_show_one_entry_and_exit() {
        let config = BoardConfig::new(10, 4, 6, &[CellKind::Teleporter])
            .unwrap()
            .with_max_attempts(500);
        let mut rendered = 0;
        for seed in 0..40 {
            let Ok(board) = Generator::from_seed(config.clone(), seed).unwrap().generate() else {
                continue;
            };
            let text = board.to_string();
            assert_eq!(text.matches('E').count(), 1, "seed {seed}:\n{text}");
            assert_eq!(text.matches('X').count(), 1, "seed {seed}:\n{text}");
            rendered += 1;
        }
        assert!(rendered > 0);
    }
}
