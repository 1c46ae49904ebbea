//! The in-memory cost grid.
//!
//! [`World`] stores one byte per cell: `0` is an impassable wall and
//! `1..=255` is the cost of entering the cell. Cells are laid out row-major so
//! a cell's identity (`y * width + x`) is also its index in the backing
//! buffer.

use rand::{Rng, RngExt};
use thiserror::Error;

use crate::{CostMap, Direction, Point};

/// Cost and identity of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldTile {
    /// Entry cost; `0` means wall.
    pub cost: u8,
    /// Row-major identity, unique within one world.
    pub id: u32,
}

impl WorldTile {
    /// Whether the cell cannot be entered.
    #[inline]
    pub const fn is_wall(self) -> bool {
        self.cost == 0
    }
}

/// Errors raised while building a [`World`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("world must have non-zero width and height (got {width}x{height})")]
    EmptyWorld { width: u32, height: u32 },

    #[error("{width}x{height} has more cells than 32-bit identities can address")]
    TooLarge { width: u64, height: u64 },

    #[error("expected {expected} cells for the given dimensions, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// Parameters for [`World::generate`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerateConfig {
    /// Fraction (0.0–1.0) of the grid to carve open.
    pub carve_fraction: f64,
    /// Smallest cost given to a carved cell (clamped to at least 1).
    pub min_cost: u8,
    /// Largest cost given to a carved cell.
    pub max_cost: u8,
    /// Number of random walks started from the centre.
    pub walks: usize,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            carve_fraction: 0.6,
            min_cost: 1,
            max_cost: 9,
            walks: 16,
        }
    }
}

impl GenerateConfig {
    pub fn with_carve_fraction(mut self, fraction: f64) -> Self {
        self.carve_fraction = fraction;
        self
    }

    pub fn with_costs(mut self, min_cost: u8, max_cost: u8) -> Self {
        self.min_cost = min_cost;
        self.max_cost = max_cost;
        self
    }

    pub fn with_walks(mut self, walks: usize) -> Self {
        self.walks = walks;
        self
    }
}

/// An immutable-once-built grid of entry costs.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    width: u32,
    height: u32,
    costs: Vec<u8>,
}

impl World {
    /// Create a world of the given size with every cell a wall.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        Self::filled(width, height, 0)
    }

    /// Create a world of the given size with every cell set to `cost`.
    pub fn filled(width: u32, height: u32, cost: u8) -> Result<Self, WorldError> {
        let cells = cell_count(width, height)?;
        Ok(Self {
            width,
            height,
            costs: vec![cost; cells],
        })
    }

    /// Build from a row-major cost buffer.
    pub fn from_costs(width: u32, height: u32, costs: Vec<u8>) -> Result<Self, WorldError> {
        let expected = cell_count(width, height)?;
        if costs.len() != expected {
            return Err(WorldError::SizeMismatch {
                expected,
                actual: costs.len(),
            });
        }
        Ok(Self {
            width,
            height,
            costs,
        })
    }

    /// Build from rows of costs (`rows[y][x]`). All rows must share a length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, WorldError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut costs = Vec::with_capacity(width * height);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(WorldError::RaggedRow {
                    row,
                    expected: width,
                    actual: r.len(),
                });
            }
            costs.extend_from_slice(r);
        }
        let too_large = || WorldError::TooLarge {
            width: width as u64,
            height: height as u64,
        };
        let width = u32::try_from(width).map_err(|_| too_large())?;
        let height = u32::try_from(height).map_err(|_| too_large())?;
        Self::from_costs(width, height, costs)
    }

    /// Generate a cave by random walk.
    ///
    /// Starting from the centre, `walks` random walks carve cells until
    /// `carve_fraction` of the grid is open. Each carved cell gets a random
    /// cost in `[min_cost, max_cost]`; uncarved cells stay walls. Walks are
    /// step-limited, so small fractions are always reached but a very high
    /// fraction may fall short.
    pub fn generate<R: Rng>(
        width: u32,
        height: u32,
        config: &GenerateConfig,
        rng: &mut R,
    ) -> Result<Self, WorldError> {
        let mut world = Self::new(width, height)?;
        let total = world.len();
        let target = (total as f64 * config.carve_fraction.clamp(0.0, 1.0)) as usize;
        let lo = config.min_cost.max(1);
        let hi = config.max_cost.max(lo);
        let start = Point::new(width / 2, height / 2);
        let step_limit = total * 4;
        let mut carved = 0usize;

        'walks: for _ in 0..config.walks {
            let mut pos = start;
            for _ in 0..step_limit {
                if carved >= target {
                    break 'walks;
                }
                if world.cost(pos) == Some(0) {
                    world.set_cost(pos, rng.random_range(lo..=hi));
                    carved += 1;
                }
                let dir = match rng.random_range(0..4u32) {
                    0 => Direction::East,
                    1 => Direction::South,
                    2 => Direction::West,
                    _ => Direction::North,
                };
                // Stay put when the walk would leave the grid.
                if let Some(next) = pos.step(dir).filter(|p| world.contains(*p)) {
                    pos = next;
                }
            }
        }
        Ok(world)
    }

    /// Entry cost at `p`, or `None` if out of bounds.
    #[inline]
    pub fn cost(&self, p: Point) -> Option<u8> {
        self.index(p).map(|i| self.costs[i])
    }

    /// Set the entry cost at `p`. Does nothing if out of bounds.
    pub fn set_cost(&mut self, p: Point, cost: u8) {
        if let Some(i) = self.index(p) {
            self.costs[i] = cost;
        }
    }

    /// Number of passable cells.
    pub fn open_tiles(&self) -> usize {
        self.costs.iter().filter(|&&c| c != 0).count()
    }

    /// Row-major view of the cost buffer.
    pub fn costs(&self) -> &[u8] {
        &self.costs
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x < self.width && p.y < self.height {
            Some(p.y as usize * self.width as usize + p.x as usize)
        } else {
            None
        }
    }
}

/// Cells in a `width` x `height` grid. Identities are `u32`, so the count
/// may not exceed `u32::MAX + 1`.
fn cell_count(width: u32, height: u32) -> Result<usize, WorldError> {
    if width == 0 || height == 0 {
        return Err(WorldError::EmptyWorld { width, height });
    }
    let cells = u64::from(width) * u64::from(height);
    let too_large = WorldError::TooLarge {
        width: u64::from(width),
        height: u64::from(height),
    };
    if cells > u64::from(u32::MAX) + 1 {
        return Err(too_large);
    }
    usize::try_from(cells).map_err(|_| too_large)
}

impl CostMap for World {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn at(&self, p: Point) -> Option<WorldTile> {
        self.index(p).map(|i| WorldTile {
            cost: self.costs[i],
            id: i as u32,
        })
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn world_round_trip() {
        let w = World::from_rows(&[[1, 0], [4, 2]]).unwrap();
        let json = serde_json::to_string(&w).unwrap();
        let back: World = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }
}
