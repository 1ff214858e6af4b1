//! Bounded random search for the source tile closest to a target color

use crate::imaging::sampler::average_color;
use crate::io::error::{Result, invalid_source};
use crate::math::color::Color;
use image::RgbaImage;
use rand::Rng;

/// Best tile found by a search
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileMatch {
    /// Left edge of the tile in the source
    pub x: u32,
    /// Top edge of the tile in the source
    pub y: u32,
    /// L1 distance between the tile's mean color and the target color
    pub distance: f64,
}

/// Sample `attempts` random tiles of the source and keep the closest
///
/// Each attempt draws `x` uniformly from `[0, width - section_size)` and then
/// `y` from `[0, height - section_size)`. Only a strictly smaller distance
/// replaces the retained candidate, so ties keep the earliest attempt and the
/// result is fully determined by the random sequence. An `attempts` of zero is
/// treated as one.
///
/// # Errors
///
/// Returns an error if the source is not larger than `section_size` on both
/// axes.
pub fn find_best_match<R: Rng>(
    source: &RgbaImage,
    target: Color,
    section_size: u32,
    attempts: usize,
    rng: &mut R,
) -> Result<TileMatch> {
    let (width, height) = source.dimensions();
    if width <= section_size || height <= section_size {
        return Err(invalid_source(&format!(
            "source image {width}x{height} has no room for a {section_size}px tile"
        )));
    }

    let x_range = width - section_size;
    let y_range = height - section_size;

    let mut best = TileMatch {
        x: 0,
        y: 0,
        distance: f64::INFINITY,
    };

    for _ in 0..attempts.max(1) {
        let x = rng.random_range(0..x_range);
        let y = rng.random_range(0..y_range);
        let candidate = average_color(source, x, y, section_size)?;

        let distance = candidate.l1_distance(&target);
        if distance < best.distance {
            best = TileMatch { x, y, distance };
        }
    }

    Ok(best)
}
