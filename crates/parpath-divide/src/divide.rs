use std::time::{Duration, Instant};

use parpath_core::{CostMap, Point};
use parpath_search::{
    Result, SearchError, SearchOutcome, append_dedup, check_endpoints, path_cost,
};

use crate::board::Meeting;
use crate::config::DivideConfig;
use crate::seed::place_seeds;
use crate::stitch::{leg, remove_loops, stitch};
use crate::wave::{Wave, run_wave};
use crate::worker::WorkerStats;

/// A finished parallel search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DivideOutcome {
    /// Start to end, inclusive, each step cardinal.
    pub path: Vec<Point>,
    /// Sum of entry costs along `path`, excluding the start cell.
    pub cost: u64,
    /// Cost of the path stitched from the first wave alone.
    pub unsmoothed_cost: u64,
    pub elapsed: Duration,
    /// Tiles expanded across every worker of every wave.
    pub expanded: usize,
    /// First-wave seeds, `start` first.
    pub seeds: Vec<Point>,
    /// First-wave meeting points, one per boundary.
    pub meetings: Vec<Meeting>,
    /// Per-worker counters, one list per wave that ran.
    pub waves: Vec<Vec<WorkerStats>>,
}

impl DivideOutcome {
    fn trivial(p: Point) -> Self {
        Self {
            path: vec![p],
            cost: 0,
            unsmoothed_cost: 0,
            elapsed: Duration::ZERO,
            expanded: 0,
            seeds: vec![p],
            meetings: Vec::new(),
            waves: Vec::new(),
        }
    }

    pub fn is_continuous(&self) -> bool {
        self.path.windows(2).all(|w| w[0].is_adjacent(w[1]))
    }

    /// Drop the per-wave detail.
    pub fn into_outcome(self) -> SearchOutcome {
        SearchOutcome {
            path: self.path,
            cost: self.cost,
            elapsed: self.elapsed,
            expanded: self.expanded,
        }
    }
}

fn wave_stats(wave: &Wave) -> Vec<WorkerStats> {
    wave.reports.iter().map(|r| r.stats).collect()
}

/// Re-search between the first wave's internal meeting points and splice the
/// result between the first and last first-wave legs.
fn smooth<M: CostMap + ?Sized>(map: &M, first: &Wave) -> Result<(Vec<Point>, Wave)> {
    let boundaries = first.boundaries();
    let n = first.reports.len();
    let inner = &boundaries[1..n];
    let Some(&tail) = inner.last() else {
        return Err(SearchError::InvalidWorkerCount(n));
    };
    let second = run_wave(map, inner, tail)?;

    let mut path = leg(map, &first.reports[0], boundaries[0], boundaries[1])?;
    append_dedup(&mut path, stitch(map, &second.boundaries(), &second.reports)?);
    append_dedup(
        &mut path,
        leg(map, &first.reports[n - 1], boundaries[n - 1], boundaries[n])?,
    );
    Ok((remove_loops(path), second))
}

/// Parallel divide-and-conquer search from `start` to `end`.
///
/// Seeds are placed along the straight line between the endpoints, one per
/// worker. Each worker searches outward from its seed on its own thread until
/// it has met both neighbours; the legs are then stitched at the meeting
/// points. With smoothing enabled and more than two workers, a second wave
/// re-searches between the first wave's internal meeting points and the
/// cheaper of the two stitched paths is returned.
pub fn par_divide<M: CostMap + ?Sized>(
    map: &M,
    start: Point,
    end: Point,
    config: &DivideConfig,
) -> Result<DivideOutcome> {
    if config.workers == 0 {
        return Err(SearchError::InvalidWorkerCount(0));
    }
    check_endpoints(map, start, end)?;
    if start == end {
        return Ok(DivideOutcome::trivial(start));
    }
    let began = Instant::now();

    let limit = config
        .scan_limit
        .unwrap_or_else(|| map.width().saturating_add(map.height()));
    let seeds = place_seeds(map, start, end, config.workers, limit)?;
    let first = run_wave(map, &seeds, end)?;
    let unsmoothed = stitch(map, &first.boundaries(), &first.reports)?;
    let unsmoothed_cost = path_cost(map, &unsmoothed)?;

    let mut waves = vec![wave_stats(&first)];
    let (path, cost) = if config.smoothing && seeds.len() > 2 {
        let (smoothed, second) = smooth(map, &first)?;
        waves.push(wave_stats(&second));
        let smoothed_cost = path_cost(map, &smoothed)?;
        if smoothed_cost <= unsmoothed_cost {
            (smoothed, smoothed_cost)
        } else {
            log::debug!("smoothing raised cost {unsmoothed_cost} -> {smoothed_cost}; keeping first wave");
            (unsmoothed, unsmoothed_cost)
        }
    } else {
        (unsmoothed, unsmoothed_cost)
    };

    let expanded = waves.iter().flatten().map(|s| s.expanded).sum();
    let elapsed = began.elapsed();
    log::debug!(
        "par_divide {start} -> {end} with {} workers: cost {cost} (first wave {unsmoothed_cost}), {} steps, {expanded} expanded in {elapsed:?}",
        seeds.len(),
        path.len()
    );
    Ok(DivideOutcome {
        path,
        cost,
        unsmoothed_cost,
        elapsed,
        expanded,
        seeds,
        meetings: first.meetings,
        waves,
    })
}
