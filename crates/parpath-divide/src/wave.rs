use std::thread;

use parpath_core::{CostMap, Point};
use parpath_search::{Result, SearchError};

use crate::board::{Meeting, MeetingBoard};
use crate::worker::{WorkerReport, WorkerTask, run_worker};

/// A finished wave: one meeting per boundary and one report per worker, in
/// worker order.
#[derive(Debug)]
pub struct Wave {
    pub meetings: Vec<Meeting>,
    pub reports: Vec<WorkerReport>,
}

impl Wave {
    /// Meeting points, boundary `0` through boundary `n`.
    pub fn boundaries(&self) -> Vec<Point> {
        self.meetings.iter().map(|m| m.point).collect()
    }
}

fn tasks(seeds: &[Point], tail: Point) -> Vec<WorkerTask> {
    seeds
        .iter()
        .enumerate()
        .map(|(id, &seed)| WorkerTask {
            id,
            seed,
            pred: id.checked_sub(1).map_or(seed, |p| seeds[p]),
            succ: seeds.get(id + 1).copied().unwrap_or(tail),
        })
        .collect()
}

/// Run one worker per seed on scoped threads and join them all.
///
/// The last worker's successor boundary is `tail`. Fails if any boundary is
/// left without a meeting point, if a worker cannot be spawned or if one
/// panics.
pub fn run_wave<M: CostMap + ?Sized>(map: &M, seeds: &[Point], tail: Point) -> Result<Wave> {
    let n = seeds.len();
    if n == 0 {
        return Err(SearchError::InvalidWorkerCount(0));
    }
    let board = MeetingBoard::new(n);
    let tasks = tasks(seeds, tail);

    let (joined, spawn_error) = thread::scope(|scope| {
        let board = &board;
        let mut handles = Vec::with_capacity(n);
        let mut spawn_error = None;
        for task in tasks {
            let spawned = thread::Builder::new()
                .name(format!("parpath-worker-{}", task.id))
                .spawn_scoped(scope, move || run_worker(map, task, board));
            match spawned {
                Ok(handle) => handles.push((task.id, handle)),
                Err(source) => {
                    board.raise_abort();
                    spawn_error = Some(SearchError::WorkerSpawn {
                        worker: task.id,
                        source,
                    });
                    break;
                }
            }
        }
        let joined: Vec<Result<WorkerReport>> = handles
            .into_iter()
            .map(|(id, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(SearchError::WorkerPanicked(id)))
            })
            .collect();
        (joined, spawn_error)
    });

    if let Some(err) = spawn_error {
        return Err(err);
    }
    let reports = joined.into_iter().collect::<Result<Vec<_>>>()?;

    if let Some(boundary) = board.stranded_boundary() {
        let from = seeds[boundary.saturating_sub(1).min(n - 1)];
        let to = seeds.get(boundary).copied().unwrap_or(tail);
        log::warn!("boundary {boundary} between {from} and {to} was never met");
        return Err(SearchError::UnreachableSegment { boundary, from, to });
    }
    let meetings = board
        .into_meetings()
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or(SearchError::UnreachableSegment {
            boundary: 0,
            from: seeds[0],
            to: tail,
        })?;
    Ok(Wave { meetings, reports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use parpath_core::World;

    #[test]
    fn tasks_link_neighbouring_seeds() {
        let seeds = [Point::new(0, 0), Point::new(2, 0), Point::new(4, 0)];
        let t = tasks(&seeds, Point::new(4, 0));
        assert_eq!(t[0].pred, Point::new(0, 0));
        assert_eq!(t[0].succ, Point::new(2, 0));
        assert_eq!(t[1].pred, Point::new(0, 0));
        assert_eq!(t[1].succ, Point::new(4, 0));
        assert_eq!(t[2].pred, Point::new(2, 0));
        assert_eq!(t[2].succ, Point::new(4, 0));
    }

    #[test]
    fn every_boundary_gets_a_meeting() {
        let w = World::filled(9, 3, 1).unwrap();
        let seeds = [Point::new(0, 1), Point::new(4, 1), Point::new(8, 1)];
        let wave = run_wave(&w, &seeds, Point::new(8, 1)).unwrap();
        let b = wave.boundaries();
        assert_eq!(b.len(), 4);
        assert_eq!(b[0], Point::new(0, 1));
        assert_eq!(b[3], Point::new(8, 1));
        assert_eq!(wave.reports.len(), 3);
        assert!(wave.reports.iter().all(|r| !r.stats.exhausted));
    }

    #[test]
    fn split_world_reports_segment() {
        let w = World::from_rows(&[[1, 1, 0, 1, 1], [1, 1, 0, 1, 1]]).unwrap();
        let seeds = [Point::new(0, 0), Point::new(4, 1)];
        let err = run_wave(&w, &seeds, Point::new(4, 1)).unwrap_err();
        assert!(matches!(
            err,
            SearchError::UnreachableSegment { boundary: 1, .. }
        ));
    }
}
