//! Frames handed to a display: the processing view and the full preview canvas

use crate::algorithm::executor::MosaicEngine;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Blended target with the composited layer drawn over it
///
/// Sized to the processing region. Uncovered sections show the blended
/// target through the transparent layer.
pub fn processing_view(engine: &MosaicEngine) -> RgbaImage {
    let mut view = engine.blended_frame();
    imageops::overlay(&mut view, engine.layer(), 0, 0);
    view
}

/// Preview canvas: half-size source and blended target on top, processing view below
///
/// The canvas is as wide as the processing region and one and a half times
/// as tall.
pub fn preview_canvas(engine: &MosaicEngine) -> RgbaImage {
    let (width, height) = engine.store().dimensions();
    let half_w = (width / 2).max(1);
    let half_h = (height / 2).max(1);

    let blended = engine.blended_frame();
    let mut canvas = RgbaImage::from_pixel(width, height + half_h, image::Rgba([0, 0, 0, 255]));

    let source_thumb = imageops::resize(
        engine.store().source(),
        half_w,
        half_h,
        FilterType::Triangle,
    );
    let target_thumb = imageops::resize(&blended, half_w, half_h, FilterType::Triangle);
    imageops::replace(&mut canvas, &source_thumb, 0, 0);
    imageops::replace(&mut canvas, &target_thumb, i64::from(half_w), 0);

    let mut view = blended;
    imageops::overlay(&mut view, engine.layer(), 0, 0);
    imageops::replace(&mut canvas, &view, 0, i64::from(half_h));

    canvas
}
