use std::collections::HashMap;

use parpath_core::{CostMap, Point, WorldTile};

use crate::error::{Result, SearchError};
use crate::heuristic::Heuristic;
use crate::tile::PathTile;

// ---------------------------------------------------------------------------
// Internal bookkeeping
// ---------------------------------------------------------------------------

/// Where a known cell currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// In the heap at this index.
    Open(usize),
    /// Popped; the record stays for backpointer lookups.
    Closed,
}

#[derive(Debug, Clone)]
struct Record {
    tile: PathTile,
    slot: Slot,
}

/// Heap entry. Priority is cached so sifting never touches the record map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeapEntry {
    priority: u64,
    sequence: u64,
    id: u32,
}

impl HeapEntry {
    /// Lower priority first; equal priorities pop in push order.
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        (self.priority, self.sequence) < (other.priority, other.sequence)
    }
}

// ---------------------------------------------------------------------------
// OpenSet
// ---------------------------------------------------------------------------

/// Indexable binary min-heap of [`PathTile`]s keyed by cell identity.
///
/// Tiles are ordered by `best_cost + heuristic(position)`. Every open cell has
/// exactly one heap entry and one record, and the record always knows its
/// heap index, so decrease-key is `O(log n)` and membership is `O(1)`.
/// Records survive `pop` (as closed) so that final costs and backpointers
/// remain queryable through [`OpenSet::lookup`]; closed cells are never
/// reopened.
pub struct OpenSet<'w, M: CostMap + ?Sized> {
    map: &'w M,
    heuristic: Heuristic,
    records: HashMap<u32, Record>,
    heap: Vec<HeapEntry>,
    next_sequence: u64,
}

impl<'w, M: CostMap + ?Sized> OpenSet<'w, M> {
    /// Create an empty open set over `map`.
    pub fn new(map: &'w M, heuristic: Heuristic) -> Self {
        Self {
            map,
            heuristic,
            records: HashMap::new(),
            heap: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Number of open tiles.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// In bounds and not a wall. Every other component asks this before
    /// touching a cell.
    #[inline]
    pub fn is_valid_position(&self, p: Point) -> bool {
        self.map.is_passable(p)
    }

    /// The cell's world tile, or [`SearchError::InvalidPosition`].
    #[inline]
    pub fn validate(&self, p: Point) -> Result<WorldTile> {
        self.map
            .at(p)
            .filter(|t| !t.is_wall())
            .ok_or(SearchError::InvalidPosition(p))
    }

    /// Whether `p` has been pushed and not yet popped.
    pub fn contains(&self, p: Point) -> bool {
        matches!(self.slot(p), Some(Slot::Open(_)))
    }

    /// Whether `p` has been popped.
    pub fn is_closed(&self, p: Point) -> bool {
        matches!(self.slot(p), Some(Slot::Closed))
    }

    /// Insert a tile for `position` unless it is invalid or already known.
    ///
    /// Returns `false` (and does nothing) for walls, out-of-bounds cells and
    /// cells that are open or closed already.
    pub fn push(
        &mut self,
        position: Point,
        best_cost: u32,
        best_predecessor: Option<Point>,
    ) -> bool {
        let Ok(world_tile) = self.validate(position) else {
            return false;
        };
        if self.records.contains_key(&world_tile.id) {
            return false;
        }
        self.insert(PathTile {
            position,
            world_tile,
            best_cost,
            best_predecessor,
        });
        true
    }

    /// Lower the best cost of `position` to `new_best_cost`.
    ///
    /// A cell that was never pushed is pushed with that cost. Returns whether
    /// anything changed; closed cells and non-improving costs are no-ops.
    pub fn decrease_cost(&mut self, position: Point, new_best_cost: u32) -> Result<bool> {
        let world_tile = self.validate(position)?;
        match self.known(world_tile.id) {
            None => {
                self.insert(PathTile {
                    best_cost: new_best_cost,
                    ..PathTile::unreached(position, world_tile)
                });
                Ok(true)
            }
            Some((Slot::Open(slot), current)) if new_best_cost < current => {
                self.lower(slot, new_best_cost, None)?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    /// Conditionally relax `candidate` through `from`.
    ///
    /// The tentative cost is `from.best_cost + cost(candidate)`. If it beats
    /// the candidate's current best (unseen cells count as `INF` and are
    /// pushed lazily) the cost and backpointer are updated and heap order is
    /// restored. Returns whether the candidate improved.
    pub fn relax(&mut self, candidate: Point, from: &PathTile) -> Result<bool> {
        let world_tile = self.validate(candidate)?;
        if !from.is_reached() {
            return Ok(false);
        }
        let tentative = from
            .best_cost
            .saturating_add(u32::from(world_tile.cost));
        match self.known(world_tile.id) {
            None => {
                self.insert(PathTile {
                    position: candidate,
                    world_tile,
                    best_cost: tentative,
                    best_predecessor: Some(from.position),
                });
                Ok(true)
            }
            Some((Slot::Open(slot), current)) if tentative < current => {
                self.lower(slot, tentative, Some(from.position))?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    /// Relax every valid, not-yet-closed cardinal neighbour of `tile` in
    /// east, south, west, north order. Returns how many improved.
    pub fn expand_from(&mut self, tile: &PathTile) -> Result<usize> {
        let mut improved = 0;
        for n in tile.position.neighbors_4().into_iter().flatten() {
            if self.is_valid_position(n) && !self.is_closed(n) && self.relax(n, tile)? {
                improved += 1;
            }
        }
        Ok(improved)
    }

    /// The tile with the smallest priority.
    pub fn peek_min(&self) -> Result<PathTile> {
        let entry = self.heap.first().ok_or(SearchError::EmptyQueue)?;
        Ok(self.record(entry.id)?.tile)
    }

    /// Priority (`best_cost + heuristic`) of the minimum, if any.
    #[inline]
    pub fn min_priority(&self) -> Option<u64> {
        self.heap.first().map(|e| e.priority)
    }

    /// Remove and return the minimum. Its record stays readable as closed.
    pub fn pop(&mut self) -> Result<PathTile> {
        let last = self.heap.len().checked_sub(1).ok_or(SearchError::EmptyQueue)?;
        self.swap(0, last);
        let entry = self.heap.pop().ok_or(SearchError::EmptyQueue)?;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        let record = self.record_mut(entry.id)?;
        record.slot = Slot::Closed;
        Ok(record.tile)
    }

    /// Current record for `p`; cells never pushed come back unreached.
    pub fn lookup(&self, p: Point) -> Result<PathTile> {
        let world_tile = self.validate(p)?;
        Ok(self
            .records
            .get(&world_tile.id)
            .map_or(PathTile::unreached(p, world_tile), |r| r.tile))
    }

    // -----------------------------------------------------------------------
    // Heap internals
    // -----------------------------------------------------------------------

    fn slot(&self, p: Point) -> Option<Slot> {
        let id = self.map.at(p)?.id;
        self.records.get(&id).map(|r| r.slot)
    }

    fn known(&self, id: u32) -> Option<(Slot, u32)> {
        self.records.get(&id).map(|r| (r.slot, r.tile.best_cost))
    }

    #[inline]
    fn priority_of(&self, tile: &PathTile) -> u64 {
        u64::from(tile.best_cost) + u64::from(self.heuristic.estimate(tile.position))
    }

    fn record(&self, id: u32) -> Result<&Record> {
        self.records.get(&id).ok_or(SearchError::MissingRecord(id))
    }

    fn record_mut(&mut self, id: u32) -> Result<&mut Record> {
        self.records.get_mut(&id).ok_or(SearchError::MissingRecord(id))
    }

    /// Point the record of the entry at `slot` back at its heap index.
    fn reindex(&mut self, slot: usize) {
        let id = self.heap[slot].id;
        let record = self.records.get_mut(&id);
        debug_assert!(record.is_some(), "heap entry {id} has no record");
        if let Some(record) = record {
            record.slot = Slot::Open(slot);
        }
    }

    fn insert(&mut self, tile: PathTile) {
        let slot = self.heap.len();
        self.heap.push(HeapEntry {
            priority: self.priority_of(&tile),
            sequence: self.next_sequence,
            id: tile.id(),
        });
        self.next_sequence += 1;
        self.records.insert(
            tile.id(),
            Record {
                tile,
                slot: Slot::Open(slot),
            },
        );
        self.sift_up(slot);
    }

    /// Apply a lower cost to the open entry at `slot`. Costs only go down,
    /// so only upward movement is needed.
    fn lower(&mut self, slot: usize, best_cost: u32, predecessor: Option<Point>) -> Result<()> {
        let id = self.heap[slot].id;
        let record = self.record_mut(id)?;
        record.tile.best_cost = best_cost;
        if predecessor.is_some() {
            record.tile.best_predecessor = predecessor;
        }
        let tile = record.tile;
        self.heap[slot].priority = self.priority_of(&tile);
        self.sift_up(slot);
        Ok(())
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.reindex(a);
        self.reindex(b);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.heap[i].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.heap[left].precedes(&self.heap[smallest]) {
                smallest = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[smallest]) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    /// Check heap order and index consistency.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        for i in 1..self.heap.len() {
            let parent = (i - 1) / 2;
            assert!(
                self.heap[parent].priority <= self.heap[i].priority,
                "heap order violated at {i}"
            );
        }
        for (i, e) in self.heap.iter().enumerate() {
            let record = self.record(e.id).unwrap();
            assert_eq!(record.slot, Slot::Open(i));
            assert_eq!(e.priority, self.priority_of(&record.tile));
        }
        let open = self
            .records
            .values()
            .filter(|r| matches!(r.slot, Slot::Open(_)))
            .count();
        assert_eq!(open, self.heap.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::INF;
    use parpath_core::World;
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn world(w: u32, h: u32) -> World {
        World::filled(w, h, 1).unwrap()
    }

    #[test]
    fn pops_in_cost_order() {
        let w = world(5, 5);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        assert!(open.push(Point::new(0, 0), 7, None));
        assert!(open.push(Point::new(1, 0), 3, None));
        assert!(open.push(Point::new(2, 0), 5, None));
        assert!(open.push(Point::new(3, 0), 1, None));
        let costs: Vec<u32> = (0..4).map(|_| open.pop().unwrap().best_cost).collect();
        assert_eq!(costs, vec![1, 3, 5, 7]);
        assert!(open.is_empty());
    }

    #[test]
    fn equal_priorities_pop_in_push_order() {
        let w = world(5, 1);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        for x in [3, 1, 4, 0, 2] {
            open.push(Point::new(x, 0), 2, None);
        }
        let order: Vec<u32> = (0..5).map(|_| open.pop().unwrap().position.x).collect();
        assert_eq!(order, vec![3, 1, 4, 0, 2]);
    }

    #[test]
    fn push_rejects_walls_out_of_bounds_and_duplicates() {
        let w = World::from_rows(&[[1, 0, 1]]).unwrap();
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        assert!(!open.push(Point::new(1, 0), 0, None));
        assert!(!open.push(Point::new(3, 0), 0, None));
        assert!(open.push(Point::new(0, 0), 4, None));
        assert!(!open.push(Point::new(0, 0), 1, None));
        assert_eq!(open.len(), 1);
        assert_eq!(open.peek_min().unwrap().best_cost, 4);
    }

    #[test]
    fn decrease_cost_moves_tile_up() {
        let w = world(4, 1);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        open.push(Point::new(0, 0), 5, None);
        open.push(Point::new(1, 0), 6, None);
        open.push(Point::new(2, 0), 7, None);
        assert!(open.decrease_cost(Point::new(2, 0), 1).unwrap());
        open.assert_invariants();
        assert_eq!(open.peek_min().unwrap().position, Point::new(2, 0));
        // Not lower: no-op.
        assert!(!open.decrease_cost(Point::new(0, 0), 9).unwrap());
        assert_eq!(open.lookup(Point::new(0, 0)).unwrap().best_cost, 5);
        // Never pushed: pushed lazily.
        assert!(open.decrease_cost(Point::new(3, 0), 0).unwrap());
        assert_eq!(open.peek_min().unwrap().position, Point::new(3, 0));
        assert!(matches!(
            open.decrease_cost(Point::new(9, 0), 0),
            Err(SearchError::InvalidPosition(_))
        ));
    }

    #[test]
    fn relax_updates_cost_and_predecessor() {
        let w = World::from_rows(&[[1, 4, 1], [1, 1, 1]]).unwrap();
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        open.push(Point::new(0, 0), INF, None);
        open.decrease_cost(Point::new(0, 0), 0).unwrap();
        let origin = open.pop().unwrap();

        assert!(open.relax(Point::new(1, 0), &origin).unwrap());
        let t = open.lookup(Point::new(1, 0)).unwrap();
        assert_eq!(t.best_cost, 4);
        assert_eq!(t.best_predecessor, Some(Point::new(0, 0)));

        // A cheaper route through (1, 1) wins.
        assert!(open.relax(Point::new(0, 1), &origin).unwrap());
        let below = open.pop().unwrap();
        assert_eq!(below.position, Point::new(0, 1));
        assert!(open.relax(Point::new(1, 1), &below).unwrap());
        let mid = open.pop().unwrap();
        assert_eq!(mid.best_cost, 2);

        // (1, 0) via (1, 1) costs 2 + 4 = 6: no improvement.
        assert!(!open.relax(Point::new(1, 0), &mid).unwrap());
        assert_eq!(
            open.lookup(Point::new(1, 0)).unwrap().best_predecessor,
            Some(Point::new(0, 0))
        );
    }

    #[test]
    fn relax_ignores_closed_and_unreached() {
        let w = world(3, 1);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        open.decrease_cost(Point::new(0, 0), 0).unwrap();
        let first = open.pop().unwrap();
        open.relax(Point::new(1, 0), &first).unwrap();
        let second = open.pop().unwrap();
        assert!(!open.relax(Point::new(0, 0), &second).unwrap());
        assert!(open.is_closed(Point::new(0, 0)));
        assert_eq!(open.lookup(Point::new(0, 0)).unwrap().best_cost, 0);

        let ghost = PathTile::unreached(Point::new(1, 0), w.at(Point::new(1, 0)).unwrap());
        assert!(!open.relax(Point::new(2, 0), &ghost).unwrap());
        assert!(!open.contains(Point::new(2, 0)));
    }

    #[test]
    fn expand_from_follows_cardinal_order() {
        let w = world(3, 3);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        open.decrease_cost(Point::new(1, 1), 0).unwrap();
        let centre = open.pop().unwrap();
        assert_eq!(open.expand_from(&centre).unwrap(), 4);
        let order: Vec<Point> = (0..4).map(|_| open.pop().unwrap().position).collect();
        assert_eq!(
            order,
            vec![
                Point::new(2, 1),
                Point::new(1, 2),
                Point::new(0, 1),
                Point::new(1, 0)
            ]
        );
    }

    #[test]
    fn empty_queue_errors() {
        let w = world(1, 1);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        assert!(matches!(open.peek_min(), Err(SearchError::EmptyQueue)));
        assert!(matches!(open.pop(), Err(SearchError::EmptyQueue)));
        assert_eq!(open.min_priority(), None);
    }

    #[test]
    fn lost_record_is_an_error() {
        let w = world(2, 1);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        open.push(Point::new(1, 0), 3, None);
        open.records.clear();
        assert!(matches!(open.peek_min(), Err(SearchError::MissingRecord(1))));
        assert!(matches!(open.pop(), Err(SearchError::MissingRecord(1))));
    }

    #[test]
    fn lookup_unseen_is_unreached() {
        let w = World::from_rows(&[[1, 0]]).unwrap();
        let open = OpenSet::new(&w, Heuristic::Zero);
        let t = open.lookup(Point::new(0, 0)).unwrap();
        assert!(!t.is_reached());
        assert_eq!(t.best_predecessor, None);
        assert!(open.lookup(Point::new(1, 0)).is_err());
    }

    #[test]
    fn heuristic_orders_by_estimate() {
        let w = world(10, 1);
        let goal = Point::new(9, 0);
        let mut open = OpenSet::new(&w, Heuristic::DistanceTo(goal));
        open.push(Point::new(0, 0), 1, None); // 1 + 9
        open.push(Point::new(8, 0), 5, None); // 5 + 1
        assert_eq!(open.min_priority(), Some(6));
        assert_eq!(open.pop().unwrap().position, Point::new(8, 0));
    }

    #[test]
    fn random_operations_keep_heap_valid() {
        let w = world(16, 16);
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut open = OpenSet::new(&w, Heuristic::DistanceTo(Point::new(15, 15)));

        for round in 0..2000 {
            let p = Point::new(rng.random_range(0..16), rng.random_range(0..16));
            match rng.random_range(0..3u32) {
                0 => {
                    open.push(p, rng.random_range(0..500), None);
                }
                1 => {
                    let before = open.lookup(p).unwrap().best_cost;
                    open.decrease_cost(p, rng.random_range(0..500)).unwrap();
                    let after = open.lookup(p).unwrap().best_cost;
                    assert!(after <= before, "cost rose at {p} in round {round}");
                }
                _ => {
                    if !open.is_empty() {
                        let t = open.pop().unwrap();
                        assert!(open.is_closed(t.position));
                        assert!(!open.contains(t.position));
                    }
                }
            }
            open.assert_invariants();
        }
    }

    #[test]
    fn drained_order_is_non_decreasing() {
        let w = world(12, 12);
        let mut rng = StdRng::seed_from_u64(42);
        let mut open = OpenSet::new(&w, Heuristic::Zero);
        for _ in 0..300 {
            let p = Point::new(rng.random_range(0..12), rng.random_range(0..12));
            let c = rng.random_range(0..1000);
            if !open.push(p, c, None) {
                open.decrease_cost(p, c).unwrap();
            }
        }
        let mut prev = 0;
        while !open.is_empty() {
            let t = open.pop().unwrap();
            assert!(t.best_cost >= prev);
            prev = t.best_cost;
            open.assert_invariants();
        }
    }
}
