//! Move legality: occupancy, simple ko, and suicide.
//!
//! Superko is not checked; only the one-move ko ban applies.

use tracing::debug;

use crate::board::{Color, Grid, Point};
use crate::capture::simulate;
use crate::error::MoveError;
use crate::group::liberties;

/// Check whether `color` may play at `pt`.
///
/// Rules are applied in order: on board, empty, not the ko point, and not
/// suicide. A move that captures is never suicide, since liberties are
/// counted after the captured stones are removed.
pub fn check_move(
    grid: &Grid,
    pt: Point,
    color: Color,
    ko_point: Option<Point>,
) -> Result<(), MoveError> {
    if !grid.contains(pt) {
        return Err(MoveError::OutOfBounds);
    }
    if !grid.is_empty_at(pt) {
        return Err(MoveError::Occupied);
    }
    if ko_point == Some(pt) {
        debug!(%pt, %color, "ko violation");
        return Err(MoveError::Ko);
    }
    let (after, placement) = simulate(grid, pt, color);
    if placement.captured.is_empty() && liberties(&after, pt, color) == 0 {
        debug!(%pt, %color, "suicide rejected");
        return Err(MoveError::Suicide);
    }
    Ok(())
}

pub fn is_legal(grid: &Grid, pt: Point, color: Color, ko_point: Option<Point>) -> bool {
    check_move(grid, pt, color, ko_point).is_ok()
}

/// Whether every on-board orthogonal neighbor of `pt` is a `color` stone.
///
/// This is the cheap "eyeish" test: false eyes also pass.
pub fn is_eye(grid: &Grid, pt: Point, color: Color) -> bool {
    grid.neighbors(pt).all(|n| grid.get(n) == Some(color))
}
