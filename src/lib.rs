//! Stochastic tile-mosaic reconstruction of a rotating target sequence
//!
//! The engine cuts small tiles from a source image and places them over the
//! sections of a processing region so that each section approximates the
//! average color of a slowly crossfading sequence of target images. Tiles are
//! drawn with slight random rotation, scale and an occasional chromatic shift
//! into a persistent layer that fills in over successive ticks and clears when
//! every section has been covered.

#![forbid(unsafe_code)]

/// Transition blending, match search, tile compositing and the engine itself
pub mod algorithm;
/// Image ownership and region color sampling
pub mod imaging;
/// Input/output, configuration, error handling and the command-line driver
pub mod io;
/// Color arithmetic and tile transforms
pub mod math;
/// Section grid and coverage tracking
pub mod spatial;

pub use algorithm::executor::{EngineConfig, MosaicEngine, TickReport};
pub use io::error::{EngineError, Result};
