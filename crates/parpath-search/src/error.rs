//! Error type shared by every search in the workspace.

use parpath_core::Point;
use thiserror::Error;

/// Everything a search can fail with.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("position {0} is out of bounds or a wall")]
    InvalidPosition(Point),

    #[error("start position {0} is out of bounds or a wall")]
    InvalidStart(Point),

    #[error("end position {0} is out of bounds or a wall")]
    InvalidEnd(Point),

    #[error("open set is empty")]
    EmptyQueue,

    #[error("no path exists from {start} to {end}")]
    UnreachableGoal { start: Point, end: Point },

    #[error("segment {boundary} between {from} and {to} could not be joined")]
    UnreachableSegment {
        boundary: usize,
        from: Point,
        to: Point,
    },

    #[error("no passable seed found between {from} and {to}")]
    SeedPlacement { from: Point, to: Point },

    #[error("open-set entry for cell {0} has no record")]
    MissingRecord(u32),

    #[error("backpointer chain broken at {0}")]
    BrokenChain(Point),

    #[error("at least one worker is required (got {0})")]
    InvalidWorkerCount(usize),

    #[error("failed to spawn worker {worker}: {source}")]
    WorkerSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type Result<T> = std::result::Result<T, SearchError>;
