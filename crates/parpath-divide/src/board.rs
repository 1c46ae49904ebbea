use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::Mutex;
use parpath_core::Point;

/// Where two neighbouring workers joined, and which worker noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meeting {
    pub point: Point,
    pub author: usize,
}

/// State shared by the workers of one wave.
///
/// Worker `w` owns boundaries `w` (towards its predecessor) and `w + 1`
/// (towards its successor), so a wave of `n` workers has `n + 1` boundaries.
/// Every boundary is written at most once; the `met` flags mirror the meeting
/// slots so workers can poll them without taking the lock.
pub struct MeetingBoard {
    /// Cell identity to the first worker that expanded it.
    registry: DashMap<u32, usize>,
    meetings: Mutex<Vec<Option<Meeting>>>,
    met: Vec<AtomicBool>,
    exhausted: Vec<AtomicBool>,
    abort: AtomicBool,
}

impl MeetingBoard {
    pub fn new(workers: usize) -> Self {
        Self {
            registry: DashMap::new(),
            meetings: Mutex::new(vec![None; workers + 1]),
            met: (0..=workers).map(|_| AtomicBool::new(false)).collect(),
            exhausted: (0..workers).map(|_| AtomicBool::new(false)).collect(),
            abort: AtomicBool::new(false),
        }
    }

    /// Number of workers this board was built for.
    #[inline]
    pub fn workers(&self) -> usize {
        self.exhausted.len()
    }

    /// Claim cell `id` for `worker`. First writer wins: returns the earlier
    /// owner if there is one, otherwise records `worker` and returns `None`.
    pub fn claim(&self, id: u32, worker: usize) -> Option<usize> {
        match self.registry.entry(id) {
            Entry::Occupied(e) => Some(*e.get()),
            Entry::Vacant(e) => {
                e.insert(worker);
                None
            }
        }
    }

    #[inline]
    pub fn is_met(&self, boundary: usize) -> bool {
        self.met
            .get(boundary)
            .is_some_and(|f| f.load(Ordering::Acquire))
    }

    /// Record the meeting point of `boundary`. Returns `false` if it was
    /// already set (the first meeting stands) or the boundary does not exist.
    pub fn mark(&self, boundary: usize, point: Point, author: usize) -> bool {
        let mut meetings = self.meetings.lock();
        let Some(slot) = meetings.get_mut(boundary) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(Meeting { point, author });
        if let Some(flag) = self.met.get(boundary) {
            flag.store(true, Ordering::Release);
        }
        true
    }

    pub fn set_exhausted(&self, worker: usize) {
        if let Some(flag) = self.exhausted.get(worker) {
            flag.store(true, Ordering::SeqCst);
        }
    }

    pub fn is_exhausted(&self, worker: usize) -> bool {
        self.exhausted
            .get(worker)
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    pub fn raise_abort(&self) {
        self.abort.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }

    /// The unmet boundary to blame for a failed wave: one whose workers on
    /// both sides ran dry, or failing that the first unmet one.
    pub fn stranded_boundary(&self) -> Option<usize> {
        let n = self.workers();
        let dry = |w: usize| w >= n || self.is_exhausted(w);
        let mut first = None;
        for b in (0..=n).filter(|&b| !self.is_met(b)) {
            if b.checked_sub(1).is_none_or(|w| dry(w)) && dry(b) {
                return Some(b);
            }
            first.get_or_insert(b);
        }
        first
    }

    #[cfg(test)]
    fn claimed(&self) -> usize {
        self.registry.len()
    }

    /// Consume the board and return the meeting slot of every boundary.
    pub fn into_meetings(self) -> Vec<Option<Meeting>> {
        self.meetings.into_inner()
    }
}
