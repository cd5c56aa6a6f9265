//! Stone placement and capture resolution.
//!
//! [`apply`] mutates the grid it is given. Callers that only want to know
//! what a move would do use [`simulate`], which works on a scratch copy.

use std::collections::HashSet;

use crate::board::{Color, Grid, Point};
use crate::group::{group, liberties};

/// Outcome of placing one stone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// One entry per opponent group removed by the move
    pub captured: Vec<Vec<Point>>,
    /// Point the opponent may not retake on the next move
    pub ko_point: Option<Point>,
}

impl Placement {
    pub fn stones_captured(&self) -> usize {
        self.captured.iter().map(Vec::len).sum()
    }

    pub fn captured_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.captured.iter().flatten().copied()
    }
}

/// Place a `color` stone at `pt` and remove every opponent group left without
/// liberties. Does not check legality; see [`crate::rules::check_move`].
pub fn apply(grid: &mut Grid, pt: Point, color: Color) -> Placement {
    grid.set(pt, Some(color));

    let opp = color.opponent();
    let mut seen: HashSet<Point> = HashSet::new();
    let mut captured = Vec::new();
    for n in grid.neighbors(pt) {
        if grid.get(n) != Some(opp) || seen.contains(&n) {
            continue;
        }
        let stones = group(grid, n, opp);
        seen.extend(stones.iter().copied());
        if liberties(grid, n, opp) == 0 {
            let mut stones: Vec<Point> = stones.into_iter().collect();
            stones.sort();
            captured.push(stones);
        }
    }
    for &stone in captured.iter().flatten() {
        grid.set(stone, None);
    }

    let ko_point = match captured.as_slice() {
        [single] if single.len() == 1 => {
            let own = group(grid, pt, color);
            (own.len() == 1 && liberties(grid, pt, color) == 1).then(|| single[0])
        }
        _ => None,
    };

    Placement { captured, ko_point }
}

/// Apply the move to a copy of `grid`, leaving the original untouched.
pub fn simulate(grid: &Grid, pt: Point, color: Color) -> (Grid, Placement) {
    let mut scratch = grid.clone();
    let placement = apply(&mut scratch, pt, color);
    (scratch, placement)
}

/// Whether any opponent group next to `pt` has exactly one liberty.
pub fn puts_in_atari(grid: &Grid, pt: Point, color: Color) -> bool {
    let opp = color.opponent();
    grid.neighbors(pt)
        .any(|n| grid.get(n) == Some(opp) && liberties(grid, n, opp) == 1)
}
