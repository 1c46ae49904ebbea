//! Parallel divide-and-conquer path search.
//!
//! [`par_divide`] splits one start-to-end query across several threads:
//!
//! 1. **Seeds.** One waypoint per worker is guessed along the straight line
//!    between the endpoints ([`place_seeds`]); blocked guesses slide sideways
//!    to the nearest open cell.
//! 2. **Wave.** Every worker runs a best-first search from its seed towards
//!    its two neighbours' seeds. Cells are claimed in a shared registry;
//!    popping a neighbour's cell or seed fixes the meeting point of the
//!    boundary between them ([`MeetingBoard`]).
//! 3. **Smoothing.** With more than two workers, a second wave searches
//!    between the first wave's internal meeting points.
//! 4. **Stitching.** Each worker's backpointers give the leg between its two
//!    meeting points; legs are joined into one path ([`stitch`]).
//!
//! Only the registry and the meeting slots are shared between threads. Open
//! sets and expanded maps are owned by their worker and handed back on join.

mod board;
mod config;
mod divide;
mod seed;
mod stitch;
mod wave;
mod worker;

pub use board::{Meeting, MeetingBoard};
pub use config::DivideConfig;
pub use divide::{DivideOutcome, par_divide};
pub use seed::{find_start, place_seeds};
pub use stitch::{leg, remove_loops, stitch};
pub use wave::{Wave, run_wave};
pub use worker::{WorkerReport, WorkerStats, WorkerTask, run_worker};
