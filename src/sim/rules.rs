//! Direction rule table
//!
//! How each obstacle kind/orientation redirects an incoming heading. Anything
//! not listed passes straight through with its heading unchanged.

use super::state::{Cell, CellKind, Direction, Orientation};

use super::state::Direction::{Down, Left, Right, Up};

/// 45° mirror shared by Bumper and an activated ActivatedBumper
fn mirror(orientation: Orientation, incoming: Direction) -> Direction {
    match (orientation, incoming) {
        // ╱
        (Orientation::UpRight, Up) => Right,
        (Orientation::UpRight, Right) => Up,
        (Orientation::UpRight, Left) => Down,
        (Orientation::UpRight, Down) => Left,
        // ╲
        (Orientation::DownRight, Down) => Right,
        (Orientation::DownRight, Right) => Down,
        (Orientation::DownRight, Left) => Up,
        (Orientation::DownRight, Up) => Left,
        _ => incoming,
    }
}

/// Triangle bumpers: the hypotenuse deflects, the two flat sides pass through
fn deflect(orientation: Orientation, incoming: Direction) -> Direction {
    match (orientation, incoming) {
        // ◸
        (Orientation::TopLeft, Up) => Right,
        (Orientation::TopLeft, Left) => Down,
        (Orientation::TopLeft, Down) => Down,
        (Orientation::TopLeft, Right) => Right,
        // ◹
        (Orientation::TopRight, Up) => Left,
        (Orientation::TopRight, Right) => Down,
        (Orientation::TopRight, Left) => Left,
        (Orientation::TopRight, Down) => Down,
        // ◺
        (Orientation::BottomLeft, Down) => Right,
        (Orientation::BottomLeft, Left) => Up,
        (Orientation::BottomLeft, Up) => Up,
        (Orientation::BottomLeft, Right) => Right,
        // ◿
        (Orientation::BottomRight, Down) => Left,
        (Orientation::BottomRight, Right) => Up,
        (Orientation::BottomRight, Left) => Left,
        (Orientation::BottomRight, Up) => Up,
        _ => incoming,
    }
}

/// Tunnels reverse perpendicular crossings and pass parallel ones
fn tunnel(orientation: Orientation, incoming: Direction) -> Direction {
    match (orientation, incoming) {
        (Orientation::Horizontal, Up) => Down,
        (Orientation::Horizontal, Down) => Up,
        (Orientation::Vertical, Left) => Right,
        (Orientation::Vertical, Right) => Left,
        _ => incoming,
    }
}

/// Outgoing heading for (kind, orientation, incoming)
///
/// Pure: ActivatedBumper is looked up with its activated geometry here; the
/// inert first touch is handled by [`visit`].
pub fn redirect(kind: CellKind, orientation: Orientation, incoming: Direction) -> Direction {
    match kind {
        CellKind::Bumper | CellKind::ActivatedBumper => mirror(orientation, incoming),
        CellKind::DirectionalBumper => deflect(orientation, incoming),
        CellKind::Tunnel => tunnel(orientation, incoming),
        // Teleporters move the ball, never turn it
        _ => incoming,
    }
}

/// Ball lands on `cell`: apply the rule and advance any per-cell state
///
/// An ActivatedBumper is inert on its first visit (heading unchanged) and
/// flips to activated; every later visit mirrors like a Bumper.
pub fn visit(cell: &mut Cell, incoming: Direction) -> Direction {
    if cell.kind == CellKind::ActivatedBumper && !cell.activated {
        cell.activated = true;
        return incoming;
    }
    redirect(cell.kind, cell.orientation, incoming)
}

/// Orientations the placement engine may assign to `kind`
pub fn viable_orientations(kind: CellKind) -> &'static [Orientation] {
    match kind {
        CellKind::Bumper | CellKind::ActivatedBumper => {
            &[Orientation::UpRight, Orientation::DownRight]
        }
        CellKind::Tunnel => &[Orientation::Horizontal, Orientation::Vertical],
        CellKind::DirectionalBumper => &[
            Orientation::TopLeft,
            Orientation::TopRight,
            Orientation::BottomLeft,
            Orientation::BottomRight,
        ],
        _ => &[Orientation::None],
    }
}
