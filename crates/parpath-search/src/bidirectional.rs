use std::time::Instant;

use parpath_core::{CostMap, Point};

use crate::error::{Result, SearchError};
use crate::heuristic::Heuristic;
use crate::open_set::OpenSet;
use crate::outcome::{SearchOutcome, check_endpoints};
use crate::tile::{INF, PathTile};
use crate::trace::{ExpandedMap, append_dedup, path_cost, trace_back};

/// When the two frontiers of a bidirectional search stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MeetTermination {
    /// Keep the cheapest overlap seen so far and stop once neither open set
    /// can produce a cheaper one. Always returns a minimum-cost path.
    #[default]
    Optimal,
    /// Stop at the first tile expanded by both sides.
    FirstOverlap,
}

/// Options for [`bidirectional`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BidirectionalConfig {
    pub termination: MeetTermination,
}

impl BidirectionalConfig {
    pub fn with_termination(mut self, termination: MeetTermination) -> Self {
        self.termination = termination;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Meeting {
    point: Point,
    /// Forward-direction cost of the spliced path.
    cost: u64,
}

enum Step {
    Continue,
    Done,
    Exhausted,
}

/// One side of the search.
struct Frontier<'w, M: CostMap + ?Sized> {
    open: OpenSet<'w, M>,
    expanded: ExpandedMap,
    target: Point,
    /// Converts this side's priorities into lower bounds on forward cost.
    /// The reverse side pays for the start cell and not the end cell.
    bound_offset: i64,
}

impl<'w, M: CostMap + ?Sized> Frontier<'w, M> {
    fn new(map: &'w M, origin: Point, target: Point, bound_offset: i64) -> Result<Self> {
        let mut open = OpenSet::new(map, Heuristic::DistanceTo(target));
        open.push(origin, INF, None);
        open.decrease_cost(origin, 0)?;
        Ok(Self {
            open,
            expanded: ExpandedMap::new(),
            target,
            bound_offset,
        })
    }

    fn lower_bound(&self) -> Option<i64> {
        self.open
            .min_priority()
            .map(|p| p as i64 + self.bound_offset)
    }
}

/// Forward-direction cost of the path `start -> v -> end` spliced from the
/// forward tile and the reverse tile of the same cell `v`.
fn splice_cost(forward: &PathTile, reverse: &PathTile, end_cost: u8) -> u64 {
    u64::from(forward.best_cost) + u64::from(reverse.best_cost) + u64::from(end_cost)
        - u64::from(forward.cost())
}

fn step<M: CostMap + ?Sized>(
    side: &mut Frontier<'_, M>,
    other: &Frontier<'_, M>,
    is_forward: bool,
    end_cost: u8,
    termination: MeetTermination,
    best: &mut Option<Meeting>,
) -> Result<Step> {
    if termination == MeetTermination::Optimal {
        if let (Some(m), Some(bound)) = (*best, side.lower_bound()) {
            if bound >= m.cost as i64 {
                return Ok(Step::Done);
            }
        }
    }
    if side.open.is_empty() {
        return Ok(if best.is_some() {
            Step::Done
        } else {
            Step::Exhausted
        });
    }

    let tile = side.open.pop()?;
    side.expanded.insert(tile.id(), tile);

    if let Some(seen) = other.expanded.get(&tile.id()) {
        let (f, r) = if is_forward {
            (&tile, seen)
        } else {
            (seen, &tile)
        };
        let cost = splice_cost(f, r, end_cost);
        if best.is_none_or(|m| cost < m.cost) {
            log::trace!("frontiers meet at {} (cost {cost})", tile.position);
            *best = Some(Meeting {
                point: tile.position,
                cost,
            });
        }
        if termination == MeetTermination::FirstOverlap {
            return Ok(Step::Done);
        }
    }

    // Reaching the opposite endpoint ends the search even without overlap.
    if tile.position == side.target {
        return Ok(Step::Done);
    }

    side.open.expand_from(&tile)?;
    Ok(Step::Continue)
}

/// Bidirectional best-first search.
///
/// A forward frontier from `start` (guided towards `end`) and a reverse
/// frontier from `end` (guided towards `start`) take strictly alternating
/// pop-and-expand steps. A tile popped by one side that the other side has
/// already expanded is a meeting point; the path is the forward backpointer
/// chain to the meeting tile followed by the reverse chain back out to `end`.
pub fn bidirectional<M: CostMap + ?Sized>(
    map: &M,
    start: Point,
    end: Point,
    config: &BidirectionalConfig,
) -> Result<SearchOutcome> {
    check_endpoints(map, start, end)?;
    if start == end {
        return Ok(SearchOutcome::single(start));
    }
    let began = Instant::now();

    let start_cost = map.at(start).map_or(0, |t| t.cost);
    let end_cost = map.at(end).map_or(0, |t| t.cost);
    let mut forward = Frontier::new(map, start, end, 0)?;
    let mut reverse = Frontier::new(
        map,
        end,
        start,
        i64::from(end_cost) - i64::from(start_cost),
    )?;
    let mut best: Option<Meeting> = None;

    'search: loop {
        for is_forward in [true, false] {
            let outcome = if is_forward {
                step(&mut forward, &reverse, true, end_cost, config.termination, &mut best)?
            } else {
                step(&mut reverse, &forward, false, end_cost, config.termination, &mut best)?
            };
            match outcome {
                Step::Continue => {}
                Step::Done => break 'search,
                Step::Exhausted => {
                    log::warn!(
                        "bidirectional search {start} -> {end} exhausted after {} + {} tiles",
                        forward.expanded.len(),
                        reverse.expanded.len()
                    );
                    return Err(SearchError::UnreachableGoal { start, end });
                }
            }
        }
    }

    let meeting = best.ok_or(SearchError::UnreachableGoal { start, end })?;
    let mut path = trace_back(map, &forward.expanded, meeting.point, start)?;
    path.reverse();
    append_dedup(&mut path, trace_back(map, &reverse.expanded, meeting.point, end)?);
    let cost = path_cost(map, &path)?;
    debug_assert_eq!(cost, meeting.cost);

    let expanded = forward.expanded.len() + reverse.expanded.len();
    let elapsed = began.elapsed();
    log::debug!(
        "bidirectional {start} -> {end}: met at {}, cost {cost}, {} steps, {expanded} expanded in {elapsed:?}",
        meeting.point,
        path.len()
    );
    Ok(SearchOutcome {
        path,
        cost,
        elapsed,
        expanded,
    })
}
