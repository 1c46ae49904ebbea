//! **parpath-core** — grid addressing for cost-map path search.
//!
//! This crate provides the types every search in the *parpath* workspace
//! consumes read-only: unsigned grid [`Point`]s, the fixed cardinal
//! expansion order, per-cell [`WorldTile`] cost/identity pairs, the
//! [`CostMap`] collaborator trait and an in-memory [`World`] that implements
//! it (including random cave generation).

pub mod distance;
pub mod geom;
pub mod traits;
pub mod world;

pub use distance::manhattan;
pub use geom::{CARDINALS, Direction, Point};
pub use traits::CostMap;
pub use world::{GenerateConfig, World, WorldError, WorldTile};
