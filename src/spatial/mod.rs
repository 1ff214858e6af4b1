//! Spatial data structures for section bookkeeping
//!
//! The region grid partitions the processing canvas into fixed-size sections
//! and tracks which of them have been drawn in the current cycle.

/// Section grid and coverage state
pub mod grid;

pub use grid::{RegionGrid, Section};
