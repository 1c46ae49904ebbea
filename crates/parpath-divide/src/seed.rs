//! Seed placement.
//!
//! Seeds are guessed waypoints spread along the straight line from start to
//! end. Each guess starts at an even split of the remaining span and, if that
//! cell is blocked, two walkers move away from it in opposite directions
//! roughly perpendicular to the line until one lands on a passable cell.

use parpath_core::{CostMap, Point};
use parpath_search::{Result, SearchError};

/// Perpendicular scan. Yields one unit offset per call; the forward walker
/// applies it and the backward walker applies its negation.
struct Scan {
    /// Whether the line is mostly vertical (so the scan is mostly horizontal).
    steep: bool,
    slope: i64,
    direction: i64,
    along: i64,
}

impl Scan {
    fn new(dx: i64, dy: i64) -> Self {
        let steep = dx.abs() < dy.abs();
        // Truncated integer slope: 0 for axis-dominant lines, +-1 on diagonals.
        let slope = if steep { -dx / dy } else { -dy / dx };
        Self {
            steep,
            slope,
            direction: if slope >= 0 { 1 } else { -1 },
            along: 0,
        }
    }

    fn next_offset(&mut self) -> (i64, i64) {
        if self.along == self.slope {
            self.along = 0;
            if self.steep { (1, 0) } else { (0, 1) }
        } else {
            self.along += self.direction;
            if self.steep {
                (0, self.direction)
            } else {
                (self.direction, 0)
            }
        }
    }
}

/// Pick the next seed between `from` and `to`.
///
/// The first guess is `from + (to - from) / (remaining + 1)` (floored). When
/// it is blocked, the scan runs up to `limit` steps per walker. The forward
/// walker's cell wins whenever it is passable.
pub fn find_start<M: CostMap + ?Sized>(
    map: &M,
    remaining: u32,
    from: Point,
    to: Point,
    limit: u32,
) -> Result<Point> {
    if from == to {
        return Ok(from);
    }
    let dx = i64::from(to.x) - i64::from(from.x);
    let dy = i64::from(to.y) - i64::from(from.y);
    let parts = i64::from(remaining) + 1;
    // The guess lies between `from` and `to`, so it never leaves the quadrant.
    let guess = from
        .offset(dx.div_euclid(parts), dy.div_euclid(parts))
        .ok_or(SearchError::SeedPlacement { from, to })?;

    // Walkers sit at `guess + shift` and `guess - shift`; cells off the grid
    // count as walls.
    let open = |ox: i64, oy: i64| guess.offset(ox, oy).filter(|&p| map.is_passable(p));
    let mut scan = Scan::new(dx, dy);
    let mut shift = (0i64, 0i64);
    let mut steps = 0u32;
    loop {
        if let Some(p) = open(shift.0, shift.1).or_else(|| open(-shift.0, -shift.1)) {
            return Ok(p);
        }
        if steps >= limit {
            log::warn!("seed scan between {from} and {to} gave up after {steps} steps");
            return Err(SearchError::SeedPlacement { from, to });
        }
        let (ox, oy) = scan.next_offset();
        shift = (shift.0 + ox, shift.1 + oy);
        steps += 1;
    }
}

/// Place one seed per worker: `start` first, `end` last, the rest filled in
/// from both ends towards the middle.
///
/// A single worker gets only `start`; its successor boundary is `end`.
pub fn place_seeds<M: CostMap + ?Sized>(
    map: &M,
    start: Point,
    end: Point,
    workers: usize,
    limit: u32,
) -> Result<Vec<Point>> {
    if workers == 0 {
        return Err(SearchError::InvalidWorkerCount(workers));
    }
    if workers == 1 {
        return Ok(vec![start]);
    }
    let mut seeds = vec![start; workers];
    seeds[workers - 1] = end;

    let (mut i, mut j) = (1, workers - 2);
    while i < j {
        seeds[i] = find_start(map, (j - i + 1) as u32, seeds[i - 1], seeds[j + 1], limit)?;
        seeds[j] = find_start(map, (j - i) as u32, seeds[j + 1], seeds[i], limit)?;
        i += 1;
        j -= 1;
    }
    if i == j {
        seeds[i] = find_start(map, 1, seeds[i - 1], seeds[i + 1], limit)?;
    }
    log::debug!("placed {workers} seeds: {seeds:?}");
    Ok(seeds)
}
