use std::collections::HashMap;

use parpath_core::{CostMap, Point};
use parpath_search::{Result, append_dedup, trace_back};

use crate::worker::WorkerReport;

/// One worker's share of the path: from the meeting point on its predecessor
/// boundary back to its seed, then out to the meeting point on its successor
/// boundary.
pub fn leg<M: CostMap + ?Sized>(
    map: &M,
    report: &WorkerReport,
    lo: Point,
    hi: Point,
) -> Result<Vec<Point>> {
    let mut path = trace_back(map, &report.expanded, lo, report.seed)?;
    let mut out = trace_back(map, &report.expanded, hi, report.seed)?;
    out.reverse();
    append_dedup(&mut path, out);
    Ok(path)
}

/// Concatenate every worker's leg. `boundaries` has one more entry than
/// `reports`; neighbouring legs share their boundary point once.
pub fn stitch<M: CostMap + ?Sized>(
    map: &M,
    boundaries: &[Point],
    reports: &[WorkerReport],
) -> Result<Vec<Point>> {
    let mut path = Vec::new();
    for (report, ends) in reports.iter().zip(boundaries.windows(2)) {
        append_dedup(&mut path, leg(map, report, ends[0], ends[1])?);
    }
    Ok(remove_loops(path))
}

/// Cut out any stretch that returns to a point already on the path.
///
/// Two legs of one worker can share cells near its seed, which makes the
/// stitched path walk out and back. Costs are non-negative, so dropping the
/// detour never makes the path dearer.
pub fn remove_loops(path: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(path.len());
    let mut index: HashMap<Point, usize> = HashMap::with_capacity(path.len());
    for p in path {
        if let Some(&at) = index.get(&p) {
            for dropped in out.drain(at + 1..) {
                index.remove(&dropped);
            }
        } else {
            index.insert(p, out.len());
            out.push(p);
        }
    }
    out
}
