//! Geometry primitives: [`Point`] and [`Direction`].
//!
//! Coordinates are unsigned: the grid origin is the top-left cell, X grows
//! right and Y grows down. Stepping off the top or left edge yields `None`
//! instead of wrapping.

use std::fmt;

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

/// A cell coordinate on the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    /// Origin (0, 0).
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// The adjacent point in direction `dir`, or `None` if it would leave
    /// the non-negative quadrant. Upper bounds are the grid's business.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Point> {
        match dir {
            Direction::East => self.x.checked_add(1).map(|x| Self::new(x, self.y)),
            Direction::South => self.y.checked_add(1).map(|y| Self::new(self.x, y)),
            Direction::West => self.x.checked_sub(1).map(|x| Self::new(x, self.y)),
            Direction::North => self.y.checked_sub(1).map(|y| Self::new(self.x, y)),
        }
    }

    /// Shift by a signed offset, or `None` on underflow/overflow.
    #[inline]
    pub fn offset(self, dx: i64, dy: i64) -> Option<Point> {
        let x = u32::try_from(i64::from(self.x) + dx).ok()?;
        let y = u32::try_from(i64::from(self.y) + dy).ok()?;
        Some(Self::new(x, y))
    }

    /// The four cardinal neighbours in search order (east, south, west,
    /// north). Neighbours that would underflow are `None`.
    #[inline]
    pub fn neighbors_4(self) -> [Option<Point>; 4] {
        CARDINALS.map(|d| self.step(d))
    }

    /// Whether `other` is exactly one cardinal step away.
    #[inline]
    pub fn is_adjacent(self, other: Point) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Point {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// A cardinal direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    East,
    South,
    West,
    North,
}

/// Neighbour expansion order shared by every search. Tie-breaking in tests
/// depends on it, so it must not change.
pub const CARDINALS: [Direction; 4] = [
    Direction::East,
    Direction::South,
    Direction::West,
    Direction::North,
];
