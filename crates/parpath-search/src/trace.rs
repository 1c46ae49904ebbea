//! Expanded-tile maps and path reconstruction.

use std::collections::HashMap;

use parpath_core::{CostMap, Point};

use crate::error::{Result, SearchError};
use crate::tile::PathTile;

/// Cells whose best cost is final, keyed by identity. Owned by exactly one
/// search (or one worker) and append-only while it runs.
pub type ExpandedMap = HashMap<u32, PathTile>;

/// Walk backpointers from `from` to `origin` through `expanded`.
///
/// Returns `[from, ..., origin]`. `from == origin` yields `[origin]` without
/// touching the map. A missing tile or predecessor, or a chain longer than
/// the map, is reported as [`SearchError::BrokenChain`].
pub fn trace_back<M: CostMap + ?Sized>(
    map: &M,
    expanded: &ExpandedMap,
    from: Point,
    origin: Point,
) -> Result<Vec<Point>> {
    let mut chain = vec![from];
    let mut cur = from;
    while cur != origin {
        if chain.len() > expanded.len() {
            return Err(SearchError::BrokenChain(cur));
        }
        let tile = map
            .at(cur)
            .and_then(|t| expanded.get(&t.id))
            .ok_or(SearchError::BrokenChain(cur))?;
        cur = tile.best_predecessor.ok_or(SearchError::BrokenChain(cur))?;
        chain.push(cur);
    }
    Ok(chain)
}

/// Append `leg` to `path`, skipping any point equal to the current tail.
///
/// Consecutive legs share their boundary point; this keeps it once.
pub fn append_dedup(path: &mut Vec<Point>, leg: impl IntoIterator<Item = Point>) {
    for p in leg {
        if path.last() != Some(&p) {
            path.push(p);
        }
    }
}

/// Sum of entry costs along `path`, excluding the first point (the search
/// origin is never entered).
pub fn path_cost<M: CostMap + ?Sized>(map: &M, path: &[Point]) -> Result<u64> {
    path.iter().skip(1).try_fold(0u64, |acc, &p| {
        let tile = map.at(p).ok_or(SearchError::InvalidPosition(p))?;
        Ok(acc + u64::from(tile.cost))
    })
}
