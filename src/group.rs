//! Connected components and liberties.
//!
//! Everything here is a stateless flood fill over a `&Grid`. Nothing is
//! cached; each call costs O(region size * 4).

use std::collections::HashSet;

use crate::board::{Color, Grid, Point};

/// Collect the maximal 4-connected region around `start` whose cells satisfy
/// `member`. Returns an empty set if `start` itself does not qualify.
pub fn flood_region<F>(grid: &Grid, start: Point, member: F) -> HashSet<Point>
where
    F: Fn(Option<Color>) -> bool,
{
    let mut region = HashSet::new();
    if !member(grid.get(start)) {
        return region;
    }
    let mut stack = vec![start];
    region.insert(start);
    while let Some(pt) = stack.pop() {
        for n in grid.neighbors(pt) {
            if !region.contains(&n) && member(grid.get(n)) {
                region.insert(n);
                stack.push(n);
            }
        }
    }
    region
}

/// Stones of `color` connected to `start`. Empty if `start` does not hold `color`.
pub fn group(grid: &Grid, start: Point, color: Color) -> HashSet<Point> {
    flood_region(grid, start, |c| c == Some(color))
}

/// Empty points adjacent to any stone of `stones`.
pub fn adjacent_empty(grid: &Grid, stones: &HashSet<Point>) -> HashSet<Point> {
    stones
        .iter()
        .flat_map(|&pt| grid.neighbors(pt))
        .filter(|&n| grid.is_empty_at(n))
        .collect()
}

/// The distinct liberties of the `color` group at `start`.
pub fn liberty_points(grid: &Grid, start: Point, color: Color) -> HashSet<Point> {
    adjacent_empty(grid, &group(grid, start, color))
}

/// Number of distinct liberties of the `color` group at `start`.
pub fn liberties(grid: &Grid, start: Point, color: Color) -> usize {
    liberty_points(grid, start, color).len()
}
