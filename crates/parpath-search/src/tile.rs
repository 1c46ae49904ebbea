use parpath_core::{Point, WorldTile};

/// Sentinel best-cost of a cell no search has reached yet.
pub const INF: u32 = u32::MAX;

/// Search state of one cell.
///
/// `best_cost` only ever decreases during a search. While it is [`INF`] the
/// tile has not been reached and `best_predecessor` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTile {
    pub position: Point,
    pub world_tile: WorldTile,
    pub best_cost: u32,
    pub best_predecessor: Option<Point>,
}

impl PathTile {
    /// A tile nobody has reached yet.
    #[inline]
    pub const fn unreached(position: Point, world_tile: WorldTile) -> Self {
        Self {
            position,
            world_tile,
            best_cost: INF,
            best_predecessor: None,
        }
    }

    /// Identity of the underlying cell.
    #[inline]
    pub const fn id(&self) -> u32 {
        self.world_tile.id
    }

    /// Entry cost of the underlying cell.
    #[inline]
    pub const fn cost(&self) -> u8 {
        self.world_tile.cost
    }

    /// Whether a finite cost has been recorded.
    #[inline]
    pub const fn is_reached(&self) -> bool {
        self.best_cost != INF
    }
}
