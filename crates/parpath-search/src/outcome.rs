use std::time::Duration;

use parpath_core::{CostMap, Point};

use crate::error::{Result, SearchError};

/// A finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    /// Start to end, inclusive, each step cardinal.
    pub path: Vec<Point>,
    /// Sum of entry costs along `path`, excluding the start cell.
    pub cost: u64,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
    /// Number of tiles expanded across all frontiers.
    pub expanded: usize,
}

impl SearchOutcome {
    /// The trivial outcome for `start == end`.
    pub fn single(p: Point) -> Self {
        Self {
            path: vec![p],
            cost: 0,
            elapsed: Duration::ZERO,
            expanded: 0,
        }
    }

    /// Whether every consecutive pair in the path is one cardinal step apart.
    pub fn is_continuous(&self) -> bool {
        self.path.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }
}

/// Reject impassable endpoints before any search state is built.
pub fn check_endpoints<M: CostMap + ?Sized>(map: &M, start: Point, end: Point) -> Result<()> {
    if !map.is_passable(start) {
        return Err(SearchError::InvalidStart(start));
    }
    if !map.is_passable(end) {
        return Err(SearchError::InvalidEnd(end));
    }
    Ok(())
}
