//! Host embedding layer
//!
//! Opaque-handle C ABI so native hosts (Swift, C, C++) can create, generate and
//! query boards with plain integers. Kinds and orientations cross the boundary
//! as their stable `code()` values; a handle is released exactly once by
//! `pinball_grid_destroy`.

use std::ptr;

use log::{error, info};

use crate::error::GridError;
use crate::settings::BoardConfig;
use crate::sim::{Board, CellKind, Generator, Position};

/// Generator plus the most recently generated board
pub struct GridHandle {
    generator: Generator,
    board: Option<Board>,
}

/// `generate` succeeded
pub const GRID_OK: i32 = 0;
/// Null handle passed in
pub const GRID_ERR_NULL: i32 = -1;
/// Attempt ceiling reached without a valid board
pub const GRID_ERR_EXHAUSTED: i32 = -2;
/// Query could not be answered (no board yet, out of bounds, no index)
pub const GRID_NONE: i32 = -1;

/// Decode a bitmask of `CellKind` codes
pub fn kinds_from_mask(mask: u32) -> Vec<CellKind> {
    CellKind::ALL
        .iter()
        .copied()
        .filter(|k| mask & (1 << k.code()) != 0)
        .collect()
}

pub fn kinds_to_mask(kinds: &[CellKind]) -> u32 {
    kinds.iter().fold(0, |mask, k| mask | (1 << k.code()))
}

fn build_config(
    size: i32,
    min_objects: i32,
    max_objects: i32,
    kinds_mask: u32,
) -> Result<BoardConfig, GridError> {
    let to_usize = |value: i32, name: &str| {
        usize::try_from(value).map_err(|_| GridError::config(format!("{name} is negative")))
    };
    BoardConfig::new(
        to_usize(size, "size")?,
        to_usize(min_objects, "min_objects")?,
        to_usize(max_objects, "max_objects")?,
        &kinds_from_mask(kinds_mask),
    )
}

fn into_handle(generator: Result<Generator, GridError>) -> *mut GridHandle {
    match generator {
        Ok(generator) => Box::into_raw(Box::new(GridHandle {
            generator,
            board: None,
        })),
        Err(err) => {
            error!("create failed: {err}");
            ptr::null_mut()
        }
    }
}

/// Create a handle seeded from entropy; null on invalid configuration
#[unsafe(no_mangle)]
pub extern "C" fn pinball_grid_create(
    size: i32,
    min_objects: i32,
    max_objects: i32,
    kinds_mask: u32,
) -> *mut GridHandle {
    into_handle(build_config(size, min_objects, max_objects, kinds_mask).and_then(Generator::new))
}

/// Create a handle with a fixed seed; null on invalid configuration
#[unsafe(no_mangle)]
pub extern "C" fn pinball_grid_create_seeded(
    size: i32,
    min_objects: i32,
    max_objects: i32,
    kinds_mask: u32,
    seed: u64,
) -> *mut GridHandle {
    into_handle(
        build_config(size, min_objects, max_objects, kinds_mask)
            .and_then(|config| Generator::from_seed(config, seed)),
    )
}

/// Release a handle
///
/// # Safety
/// `handle` must be null or a pointer returned by a `pinball_grid_create*`
/// function that has not been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pinball_grid_destroy(handle: *mut GridHandle) {
    if handle.is_null() {
        return;
    }
    // SAFETY: caller guarantees the pointer came from Box::into_raw and is live
    drop(unsafe { Box::from_raw(handle) });
}

/// Generate a new board, replacing the previous one
///
/// # Safety
/// `handle` must be null or a live handle not used concurrently elsewhere.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pinball_grid_generate(handle: *mut GridHandle) -> i32 {
    // SAFETY: caller guarantees exclusive access to a live handle
    let Some(handle) = (unsafe { handle.as_mut() }) else {
        return GRID_ERR_NULL;
    };
    match handle.generator.generate() {
        Ok(board) => {
            info!("host board ready ({} objects)", board.objects_placed());
            handle.board = Some(board);
            GRID_OK
        }
        Err(err) => {
            error!("generate failed: {err}");
            handle.board = None;
            GRID_ERR_EXHAUSTED
        }
    }
}

/// Side length of the handle's grid, or -1 for a null handle
///
/// # Safety
/// `handle` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pinball_grid_size(handle: *const GridHandle) -> i32 {
    // SAFETY: caller guarantees the handle is live
    match unsafe { handle.as_ref() } {
        Some(handle) => handle.generator.config().size as i32,
        None => GRID_NONE,
    }
}

/// # Safety
/// `handle` must be null or a live handle.
unsafe fn query<F>(handle: *const GridHandle, row: i32, col: i32, read: F) -> i32
where
    F: FnOnce(&Board, Position) -> Option<i32>,
{
    // SAFETY: caller guarantees the handle is live
    let Some(handle) = (unsafe { handle.as_ref() }) else {
        return GRID_NONE;
    };
    handle
        .board
        .as_ref()
        .and_then(|board| read(board, Position::new(row, col)))
        .unwrap_or(GRID_NONE)
}

/// Cell kind code, or -1
///
/// # Safety
/// `handle` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pinball_grid_cell_kind(
    handle: *const GridHandle,
    row: i32,
    col: i32,
) -> i32 {
    // SAFETY: forwarded caller contract
    unsafe {
        query(handle, row, col, |board, pos| {
            board.cell(pos).map(|c| c.kind.code())
        })
    }
}

/// Orientation code, or -1
///
/// # Safety
/// `handle` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pinball_grid_cell_orientation(
    handle: *const GridHandle,
    row: i32,
    col: i32,
) -> i32 {
    // SAFETY: forwarded caller contract
    unsafe {
        query(handle, row, col, |board, pos| {
            board.cell(pos).map(|c| c.orientation.code())
        })
    }
}

/// Teleporter pair index, or -1 when the cell has none
///
/// # Safety
/// `handle` must be null or a live handle.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pinball_grid_teleporter_index(
    handle: *const GridHandle,
    row: i32,
    col: i32,
) -> i32 {
    // SAFETY: forwarded caller contract
    unsafe {
        query(handle, row, col, |board, pos| {
            board
                .cell(pos)
                .and_then(|c| c.teleporter_index)
                .map(i32::from)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Orientation;

    #[test]
    fn test_mask_round_trip() {
        let kinds = vec![CellKind::Bumper, CellKind::Teleporter];
        let mask = kinds_to_mask(&kinds);
        assert_eq!(mask, (1 << 4) | (1 << 6));
        assert_eq!(kinds_from_mask(mask), kinds);
        assert!(kinds_from_mask(0).is_empty());
    }

    #[test]
    fn test_invalid_config_returns_null() {
        let mask = kinds_to_mask(&[CellKind::Bumper]);
        assert!(pinball_grid_create(2, 0, 0, mask).is_null());
        assert!(pinball_grid_create(5, -1, 0, mask).is_null());
        assert!(pinball_grid_create(5, 3, 1, mask).is_null());
        assert!(pinball_grid_create(5, 1, 1, 0).is_null());
        // Entry is not a placeable kind
        assert!(pinball_grid_create(5, 1, 1, 1 << CellKind::Entry.code()).is_null());
    }

    #[test]
    fn test_handle_lifecycle() {
        let mask = kinds_to_mask(&[CellKind::Bumper]);
        let handle = pinball_grid_create_seeded(5, 2, 2, mask, 11);
        assert!(!handle.is_null());

        unsafe {
            assert_eq!(pinball_grid_size(handle), 5);
            // Nothing generated yet
            assert_eq!(pinball_grid_cell_kind(handle, 0, 0), GRID_NONE);

            assert_eq!(pinball_grid_generate(handle), GRID_OK);

            let mut entries = 0;
            let mut exits = 0;
            let mut bumpers = 0;
            for row in 0..5 {
                for col in 0..5 {
                    let kind = CellKind::from_code(pinball_grid_cell_kind(handle, row, col))
                        .expect("valid kind code");
                    let orientation =
                        Orientation::from_code(pinball_grid_cell_orientation(handle, row, col))
                            .expect("valid orientation code");
                    match kind {
                        CellKind::Entry => entries += 1,
                        CellKind::Exit => exits += 1,
                        CellKind::Bumper => {
                            bumpers += 1;
                            assert!(matches!(
                                orientation,
                                Orientation::UpRight | Orientation::DownRight
                            ));
                        }
                        _ => {}
                    }
                    assert_eq!(pinball_grid_teleporter_index(handle, row, col), GRID_NONE);
                }
            }
            assert_eq!((entries, exits, bumpers), (1, 1, 2));

            assert_eq!(pinball_grid_cell_kind(handle, 5, 0), GRID_NONE);
            assert_eq!(pinball_grid_cell_orientation(handle, 0, -1), GRID_NONE);

            pinball_grid_destroy(handle);
        }
    }

    #[test]
    fn test_null_handle_is_tolerated() {
        unsafe {
            pinball_grid_destroy(ptr::null_mut());
            assert_eq!(pinball_grid_generate(ptr::null_mut()), GRID_ERR_NULL);
            assert_eq!(pinball_grid_cell_kind(ptr::null(), 0, 0), GRID_NONE);
            assert_eq!(pinball_grid_size(ptr::null()), GRID_NONE);
        }
    }

    #[test]
    fn test_exhausted_generation_clears_board() {
        // One interior cell cannot hold two obstacles
        let mask = kinds_to_mask(&[CellKind::Bumper]);
        let handle = pinball_grid_create_seeded(3, 2, 2, mask, 4);
        assert!(!handle.is_null());
        unsafe {
            assert_eq!(pinball_grid_generate(handle), GRID_ERR_EXHAUSTED);
            assert_eq!(pinball_grid_cell_kind(handle, 1, 1), GRID_NONE);
            pinball_grid_destroy(handle);
        }
    }
}
