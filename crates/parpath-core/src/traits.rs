use crate::{Point, WorldTile};

/// Read-only cost lookup consumed by every search.
///
/// Implementors must be immutable for the duration of a search: the parallel
/// searches share one `&CostMap` across worker threads without locking.
pub trait CostMap: Sync {
    /// Number of columns.
    fn width(&self) -> u32;

    /// Number of rows.
    fn height(&self) -> u32;

    /// Cost and identity of the cell at `p`, or `None` if out of bounds.
    fn at(&self, p: Point) -> Option<WorldTile>;

    /// Whether `p` lies inside the grid.
    #[inline]
    fn contains(&self, p: Point) -> bool {
        p.x < self.width() && p.y < self.height()
    }

    /// Stable identity of `p`: `y * width + x`.
    #[inline]
    fn id(&self, p: Point) -> u32 {
        p.y * self.width() + p.x
    }

    /// Whether `p` is inside the grid and not a wall.
    #[inline]
    fn is_passable(&self, p: Point) -> bool {
        self.at(p).is_some_and(|t| !t.is_wall())
    }

    /// Total number of cells.
    #[inline]
    fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Whether the grid has no cells.
    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
