use parpath_core::{CostMap, Point};
use parpath_search::{ExpandedMap, Heuristic, INF, OpenSet, Result};

use crate::board::MeetingBoard;

/// What one worker searches from and towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerTask {
    pub id: usize,
    pub seed: Point,
    /// Predecessor's seed; the first worker uses its own.
    pub pred: Point,
    /// Successor's seed; the last worker uses the wave's tail.
    pub succ: Point,
}

/// Counters a worker hands back when it joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkerStats {
    pub id: usize,
    /// Tiles popped and recorded.
    pub expanded: usize,
    /// Successful neighbour relaxations.
    pub relaxed: usize,
    /// Whether the open set ran dry before both boundaries were met.
    pub exhausted: bool,
}

/// Everything a worker owns once it has stopped.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    pub seed: Point,
    pub stats: WorkerStats,
    pub expanded: ExpandedMap,
}

fn meet(board: &MeetingBoard, boundary: usize, point: Point, author: usize) {
    if board.mark(boundary, point, author) {
        log::trace!("worker {author} closed boundary {boundary} at {point}");
    }
}

/// Run one worker to completion.
///
/// The worker expands outward from its seed, steered by the distance to the
/// nearer of its two neighbouring seeds, until both of its boundaries have a
/// meeting point. A boundary is met when the worker pops the neighbour's
/// seed, or pops a cell the neighbour has already claimed in the shared
/// registry. The worker also stops if the wave is aborted or its open set
/// empties; in the latter case it raises the abort flag when the boundary it
/// still needs can no longer be met by anyone.
pub fn run_worker<M: CostMap + ?Sized>(
    map: &M,
    task: WorkerTask,
    board: &MeetingBoard,
) -> Result<WorkerReport> {
    let WorkerTask {
        id,
        seed,
        pred,
        succ,
    } = task;
    let (lo, hi) = (id, id + 1);

    let mut open = OpenSet::new(map, Heuristic::MinDistanceToEither(pred, succ));
    open.push(seed, INF, None);
    open.decrease_cost(seed, 0)?;
    let mut expanded = ExpandedMap::new();
    let mut stats = WorkerStats {
        id,
        ..WorkerStats::default()
    };

    while !(board.is_met(lo) && board.is_met(hi)) {
        if board.is_aborted() {
            break;
        }
        if open.is_empty() {
            stats.exhausted = true;
            board.set_exhausted(id);
            let stranded_lo = !board.is_met(lo)
                && id.checked_sub(1).is_none_or(|p| board.is_exhausted(p));
            let stranded_hi =
                !board.is_met(hi) && (hi == board.workers() || board.is_exhausted(hi));
            if stranded_lo || stranded_hi {
                log::warn!("worker {id} ran dry from {seed} with a boundary nobody can reach");
                board.raise_abort();
            }
            break;
        }

        let tile = open.pop()?;
        let pos = tile.position;
        if pos == pred {
            meet(board, lo, pos, id);
        }
        if pos == succ {
            meet(board, hi, pos, id);
        }
        match board.claim(tile.id(), id) {
            Some(owner) if Some(owner) == id.checked_sub(1) => meet(board, lo, pos, id),
            Some(owner) if owner == hi => meet(board, hi, pos, id),
            _ => {}
        }
        expanded.insert(tile.id(), tile);
        stats.relaxed += open.expand_from(&tile)?;
    }

    stats.expanded = expanded.len();
    log::debug!(
        "worker {id} from {seed} stopped: {} expanded, {} relaxed{}",
        stats.expanded,
        stats.relaxed,
        if stats.exhausted { ", exhausted" } else { "" }
    );
    Ok(WorkerReport {
        seed,
        stats,
        expanded,
    })
}
