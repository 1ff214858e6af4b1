//! Mean color of square pixel regions, clamped at image edges

use crate::io::error::{EngineError, Result};
use crate::math::color::Color;
use image::RgbaImage;

/// Mean color of a region together with the number of pixels that contributed
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionSample {
    /// Mean of each color channel
    pub color: Color,
    /// In-bounds pixels included in the mean
    pub samples: usize,
}

/// Average the `size`×`size` square at `(x, y)` intersected with the image bounds
///
/// # Errors
///
/// Returns [`EngineError::EmptySampleRegion`] if the square does not overlap
/// the image at all.
pub fn sample_region(image: &RgbaImage, x: u32, y: u32, size: u32) -> Result<RegionSample> {
    let x_end = x.saturating_add(size).min(image.width());
    let y_end = y.saturating_add(size).min(image.height());

    let mut sums = [0u64; 3];
    let mut samples = 0usize;

    for j in y..y_end {
        for i in x..x_end {
            if let Some(pixel) = image.get_pixel_checked(i, j) {
                for (sum, &channel) in sums.iter_mut().zip(pixel.0.iter()) {
                    *sum += u64::from(channel);
                }
                samples += 1;
            }
        }
    }

    if samples == 0 {
        return Err(EngineError::EmptySampleRegion {
            origin: (x, y),
            size,
            image_dimensions: image.dimensions(),
        });
    }

    let count = samples as f64;
    let [r, g, b] = sums.map(|sum| sum as f64 / count);
    Ok(RegionSample {
        color: Color::new(r, g, b),
        samples,
    })
}

/// Mean R, G, B over the clamped `size`×`size` square at `(x, y)`
///
/// # Errors
///
/// Returns [`EngineError::EmptySampleRegion`] if the square does not overlap
/// the image at all.
pub fn average_color(image: &RgbaImage, x: u32, y: u32, size: u32) -> Result<Color> {
    sample_region(image, x, y, size).map(|sample| sample.color)
}
