/// Cyclic crossfade between consecutive target images
pub mod blend;
/// Tile drawing with random transform and chromatic shift
pub mod compositing;
/// Engine state, tick loop and command surface
pub mod executor;
/// Bounded random search for the closest source tile
pub mod search;
