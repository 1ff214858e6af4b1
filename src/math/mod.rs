//! Mathematical utilities for the engine

/// Channel means and per-pixel blend arithmetic
pub mod color;
/// Rotation and scale of drawn tiles
pub mod transform;
