//! Frame capture and GIF generation for run visualization

use crate::io::configuration::VIEWER_MIN_FRAME_DELAY_MS;
use crate::io::error::{EngineError, Result};
use crate::io::image::create_parent_dir;
use image::{Delay, Frame, RgbaImage};
use std::path::Path;

/// Records presentation frames at a fixed tick interval
///
/// Frames are kept in memory until exported, so long runs should use a
/// coarser interval.
pub struct FrameCapture {
    frames: Vec<RgbaImage>,
    interval: usize,
}

impl FrameCapture {
    /// Capture every `interval` ticks (an interval of zero is treated as one)
    pub fn new(interval: usize, expected_ticks: usize) -> Self {
        let interval = interval.max(1);
        Self {
            frames: Vec::with_capacity(expected_ticks / interval + 1),
            interval,
        }
    }

    /// Test whether `tick` falls on the capture interval
    pub const fn should_capture(&self, tick: usize) -> bool {
        tick % self.interval == 0
    }

    /// Store a frame unconditionally
    pub fn record(&mut self, frame: RgbaImage) {
        self.frames.push(frame);
    }

    /// Store the frame produced by `render` if `tick` falls on the interval
    pub fn record_tick(&mut self, tick: usize, render: impl FnOnce() -> RgbaImage) {
        if self.should_capture(tick) {
            self.record(render());
        }
    }

    /// Captured frames in order
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Number of captured frames
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Export the captured frames as an animated GIF
    ///
    /// Frames are skipped when `frame_delay_ms` is shorter than viewers
    /// reliably display, keeping the apparent playback speed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No frames were captured
    /// - File system operations fail
    /// - GIF encoding fails
    pub fn export_gif<P: AsRef<Path>>(&self, output_path: P, frame_delay_ms: u32) -> Result<()> {
        let output_path = output_path.as_ref();
        let Some(last) = self.frames.last() else {
            return Err(EngineError::InvalidSourceData {
                reason: "No frames captured for visualization".to_string(),
            });
        };

        let frame_delay_ms = frame_delay_ms.max(1);
        let effective_delay_ms = frame_delay_ms.max(VIEWER_MIN_FRAME_DELAY_MS);
        let skip_factor = if frame_delay_ms < VIEWER_MIN_FRAME_DELAY_MS {
            VIEWER_MIN_FRAME_DELAY_MS.div_ceil(frame_delay_ms) as usize
        } else {
            1
        };

        let delay = Delay::from_numer_denom_ms(effective_delay_ms, 1);
        let mut frames: Vec<Frame> = self
            .frames
            .iter()
            .step_by(skip_factor)
            .map(|img| Frame::from_parts(img.clone(), 0, 0, delay))
            .collect();

        // Final frame displays longer for better visibility
        frames.push(Frame::from_parts(
            last.clone(),
            0,
            0,
            Delay::from_numer_denom_ms(effective_delay_ms * 25, 1),
        ));

        create_parent_dir(output_path)?;
        let file = std::fs::File::create(output_path).map_err(|e| EngineError::FileSystem {
            path: output_path.to_path_buf(),
            operation: "create file",
            source: e,
        })?;

        let mut encoder = image::codecs::gif::GifEncoder::new(file);
        encoder
            .set_repeat(image::codecs::gif::Repeat::Infinite)
            .and_then(|()| encoder.encode_frames(frames))
            .map_err(|e| EngineError::ImageExport {
                path: output_path.to_path_buf(),
                source: e,
            })
    }
}
