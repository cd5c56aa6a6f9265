//! Square board of stones.
//!
//! [`Grid`] is plain data: a row-major `Vec<Option<Color>>` with accessors and
//! neighbor iteration. Group, capture and legality logic live in their own
//! modules and operate on a `&Grid`.

use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::White => write!(f, "White"),
        }
    }
}

/// A board coordinate. `x` is the column, `y` the row from the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A stone placement request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub point: Point,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Color>>,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.size && p.y < self.size
    }

    fn idx(&self, p: Point) -> usize {
        assert!(
            self.contains(p),
            "point {p} is off a {}x{} board",
            self.size,
            self.size
        );
        p.y * self.size + p.x
    }

    pub fn get(&self, p: Point) -> Option<Color> {
        self.cells[self.idx(p)]
    }

    pub fn set(&mut self, p: Point, cell: Option<Color>) {
        let i = self.idx(p);
        self.cells[i] = cell;
    }

    pub fn is_empty_at(&self, p: Point) -> bool {
        self.get(p).is_none()
    }

    /// No stones anywhere on the board.
    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    pub fn stone_count(&self, color: Color) -> usize {
        self.cells.iter().filter(|c| **c == Some(color)).count()
    }

    /// All points in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Point::new(x, y)))
    }

    /// The up to four orthogonal on-board neighbors of `p`.
    pub fn neighbors(&self, p: Point) -> impl Iterator<Item = Point> + use<> {
        let s = self.size;
        let mut v = Vec::with_capacity(4);
        if p.x > 0 {
            v.push(Point::new(p.x - 1, p.y));
        }
        if p.x + 1 < s {
            v.push(Point::new(p.x + 1, p.y));
        }
        if p.y > 0 {
            v.push(Point::new(p.x, p.y - 1));
        }
        if p.y + 1 < s {
            v.push(Point::new(p.x, p.y + 1));
        }
        v.into_iter()
    }

    /// Distance from `p` to the nearest edge (0 on the first line).
    pub fn edge_distance(&self, p: Point) -> usize {
        let last = self.size - 1;
        p.x.min(p.y).min(last - p.x).min(last - p.y)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.size {
            for x in 0..self.size {
                let ch = match self.get(Point::new(x, y)) {
                    Some(Color::Black) => 'X',
                    Some(Color::White) => 'O',
                    None => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
