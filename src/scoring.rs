//! End-of-game territory attribution and final score.
//!
//! Territory scoring: each maximal empty region belongs to the color whose
//! stones alone border it. Stones on the board are not counted, prisoners
//! are, and White receives komi.

use std::collections::HashSet;
use std::fmt;

use crate::board::{Color, Grid, Point};
use crate::group::flood_region;

/// Stones captured by each color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Prisoners {
    pub black: u32,
    pub white: u32,
}

impl Prisoners {
    pub fn get(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }

    pub fn add(&mut self, color: Color, stones: u32) {
        match color {
            Color::Black => self.black += stones,
            Color::White => self.white += stones,
        }
    }
}

/// Owner of each point. `None` is neutral (or occupied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerritoryMap {
    size: usize,
    owners: Vec<Option<Color>>,
}

impl TerritoryMap {
    pub fn owner(&self, p: Point) -> Option<Color> {
        self.owners[p.y * self.size + p.x]
    }

    pub fn area(&self, color: Color) -> usize {
        self.owners.iter().filter(|o| **o == Some(color)).count()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Color),
    Draw,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub black_area: usize,
    pub white_area: usize,
    pub black_total: f32,
    pub white_total: f32,
    pub winner: Outcome,
}

impl fmt::Display for Score {
    /// GTP-style result string, e.g. `W+3.5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let margin = (self.black_total - self.white_total).abs();
        match self.winner {
            Outcome::Winner(Color::Black) => write!(f, "B+{margin}"),
            Outcome::Winner(Color::White) => write!(f, "W+{margin}"),
            Outcome::Draw => write!(f, "0"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub territory: TerritoryMap,
    pub score: Score,
}

/// Attribute every empty region of `grid` to Black, White, or neither.
pub fn territory(grid: &Grid) -> TerritoryMap {
    let size = grid.size();
    let mut owners = vec![None; size * size];
    let mut visited: HashSet<Point> = HashSet::new();

    for pt in grid.points() {
        if !grid.is_empty_at(pt) || visited.contains(&pt) {
            continue;
        }
        let region = flood_region(grid, pt, |c| c.is_none());
        let mut touches_black = false;
        let mut touches_white = false;
        for &cell in &region {
            for n in grid.neighbors(cell) {
                match grid.get(n) {
                    Some(Color::Black) => touches_black = true,
                    Some(Color::White) => touches_white = true,
                    None => {}
                }
            }
        }
        let owner = match (touches_black, touches_white) {
            (true, false) => Some(Color::Black),
            (false, true) => Some(Color::White),
            _ => None,
        };
        for &cell in &region {
            owners[cell.y * size + cell.x] = owner;
        }
        visited.extend(region);
    }

    TerritoryMap { size, owners }
}

/// Score a finished game.
pub fn score(grid: &Grid, prisoners: Prisoners, komi: f32) -> GameResult {
    let territory = territory(grid);
    let black_area = territory.area(Color::Black);
    let white_area = territory.area(Color::White);
    let black_total = black_area as f32 + prisoners.black as f32;
    let white_total = white_area as f32 + prisoners.white as f32 + komi;
    let winner = if black_total > white_total {
        Outcome::Winner(Color::Black)
    } else if white_total > black_total {
        Outcome::Winner(Color::White)
    } else {
        Outcome::Draw
    };
    GameResult {
        territory,
        score: Score {
            black_area,
            white_area,
            black_total,
            white_total,
            winner,
        },
    }
}
