//! Image ownership and region sampling

/// Mean color of pixel regions
pub mod sampler;
/// Source and target image storage
pub mod store;
