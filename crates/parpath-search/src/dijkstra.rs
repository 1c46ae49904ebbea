use std::time::Instant;

use parpath_core::{CostMap, Point};

use crate::error::{Result, SearchError};
use crate::heuristic::Heuristic;
use crate::open_set::OpenSet;
use crate::outcome::{SearchOutcome, check_endpoints};
use crate::tile::INF;
use crate::trace::{ExpandedMap, path_cost, trace_back};

/// Shortest path from `start` to `end` with Dijkstra's algorithm.
pub fn dijkstra<M: CostMap + ?Sized>(map: &M, start: Point, end: Point) -> Result<SearchOutcome> {
    search(map, start, end, Heuristic::Zero)
}

/// Shortest path from `start` to `end` with A* guided by the Manhattan
/// distance to `end`.
pub fn astar<M: CostMap + ?Sized>(map: &M, start: Point, end: Point) -> Result<SearchOutcome> {
    search(map, start, end, Heuristic::DistanceTo(end))
}

/// Single-frontier best-first search.
///
/// Pops the cheapest open tile until `end` comes off the queue, relaxing the
/// four cardinal neighbours of every other tile. An empty queue before that
/// point means `end` is unreachable.
pub fn search<M: CostMap + ?Sized>(
    map: &M,
    start: Point,
    end: Point,
    heuristic: Heuristic,
) -> Result<SearchOutcome> {
    check_endpoints(map, start, end)?;
    let began = Instant::now();

    let mut open = OpenSet::new(map, heuristic);
    open.push(start, INF, None);
    open.decrease_cost(start, 0)?;
    let mut expanded = ExpandedMap::new();

    loop {
        if open.is_empty() {
            log::warn!("search exhausted {} tiles without reaching {end}", expanded.len());
            return Err(SearchError::UnreachableGoal { start, end });
        }
        let tile = open.pop()?;
        expanded.insert(tile.id(), tile);
        if tile.position == end {
            break;
        }
        open.expand_from(&tile)?;
    }

    let mut path = trace_back(map, &expanded, end, start)?;
    path.reverse();
    let cost = path_cost(map, &path)?;
    let elapsed = began.elapsed();
    log::debug!(
        "{heuristic:?} search {start} -> {end}: cost {cost}, {} steps, {} expanded in {elapsed:?}",
        path.len(),
        expanded.len()
    );
    Ok(SearchOutcome {
        path,
        cost,
        elapsed,
        expanded: expanded.len(),
    })
}
