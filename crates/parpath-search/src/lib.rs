//! Best-first search over [`CostMap`](parpath_core::CostMap) grids.
//!
//! This crate provides the sequential searches of the *parpath* workspace and
//! the building blocks the parallel searcher reuses:
//!
//! - **Dijkstra** shortest path ([`dijkstra`])
//! - **A\*** with a Manhattan heuristic ([`astar`])
//! - **Bidirectional** best-first search ([`bidirectional`])
//! - An indexable priority queue with decrease-key ([`OpenSet`])
//! - Backpointer reconstruction and path splicing ([`trace_back`], [`append_dedup`])
//!
//! # Cost model
//!
//! | Quantity | Meaning |
//! |---|---|
//! | cell cost `c(v)` | cost of *entering* `v`; `0` is a wall |
//! | `best_cost(v)` | cheapest known sum of `c` along a path from the origin, origin excluded |
//! | priority | `best_cost(v) + h(v)` for the active [`Heuristic`] |
//! | path cost | sum of `c` over every path cell except the first |

mod bidirectional;
mod dijkstra;
mod error;
mod heuristic;
mod open_set;
mod outcome;
mod tile;
mod trace;

pub use bidirectional::{BidirectionalConfig, MeetTermination, bidirectional};
pub use dijkstra::{astar, dijkstra, search};
pub use error::{Result, SearchError};
pub use heuristic::Heuristic;
pub use open_set::OpenSet;
pub use outcome::{SearchOutcome, check_endpoints};
pub use tile::{INF, PathTile};
pub use trace::{ExpandedMap, append_dedup, path_cost, trace_back};
