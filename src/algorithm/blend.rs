//! Cyclic crossfade between consecutive target images

use crate::io::error::{Result, invalid_source};
use crate::math::color::crossfade;
use image::{Rgba, RgbaImage};

/// Position in the rotating target sequence
///
/// Holds indices only; the images themselves live in the image store and are
/// passed in when a blended frame or region is requested.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetCycle {
    len: usize,
    current: usize,
    next: usize,
    blend_amount: f64,
}

impl TargetCycle {
    /// Start a cycle over `len` targets at target 0, blending toward target 1
    ///
    /// # Errors
    ///
    /// Returns an error if `len` is zero.
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(invalid_source(&"target cycle needs at least one image"));
        }
        Ok(Self {
            len,
            current: 0,
            next: 1 % len,
            blend_amount: 0.0,
        })
    }

    /// Restart the cycle over a new number of targets
    ///
    /// # Errors
    ///
    /// Returns an error if `len` is zero; the cycle is left untouched.
    pub fn reset_len(&mut self, len: usize) -> Result<()> {
        *self = Self::new(len)?;
        Ok(())
    }

    /// Number of targets in the cycle
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Always false; a cycle is never constructed empty
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the target being faded out
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Index of the target being faded in
    pub const fn next(&self) -> usize {
        self.next
    }

    /// Weight of the next target, always in `[0, 1)`
    pub const fn blend_amount(&self) -> f64 {
        self.blend_amount
    }

    /// Advance the blend by `step`, rolling over to the following pair at 1
    ///
    /// Returns `true` when the cycle moved on to a new current target.
    /// Negative and non-finite steps leave the blend unchanged.
    pub fn advance(&mut self, step: f64) -> bool {
        let step = if step.is_finite() { step.max(0.0) } else { 0.0 };
        self.blend_amount += step;

        if self.blend_amount >= 1.0 {
            self.blend_amount = 0.0;
            self.current = self.next;
            self.next = (self.current + 1) % self.len;
            return true;
        }
        false
    }

    /// Blended pixel at `(x, y)`, or `None` outside the targets
    pub fn blended_pixel(&self, targets: &[RgbaImage], x: u32, y: u32) -> Option<Rgba<u8>> {
        let current = targets.get(self.current)?.get_pixel_checked(x, y)?;
        let next = targets.get(self.next)?.get_pixel_checked(x, y)?;
        Some(crossfade(*current, *next, self.blend_amount))
    }

    /// Blended copy of the `width`×`height` region at `(x, y)`, clamped to the targets
    pub fn blended_region(
        &self,
        targets: &[RgbaImage],
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> RgbaImage {
        let Some(current) = targets.get(self.current) else {
            return RgbaImage::new(0, 0);
        };
        let clamped_w = x.saturating_add(width).min(current.width()).saturating_sub(x);
        let clamped_h = y
            .saturating_add(height)
            .min(current.height())
            .saturating_sub(y);

        RgbaImage::from_fn(clamped_w, clamped_h, |i, j| {
            self.blended_pixel(targets, x + i, y + j)
                .unwrap_or(Rgba([0, 0, 0, 0]))
        })
    }

    /// Write the full blended frame into `frame`
    ///
    /// Pixels outside the targets are left untouched.
    pub fn render_into(&self, targets: &[RgbaImage], frame: &mut RgbaImage) {
        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            if let Some(blended) = self.blended_pixel(targets, x, y) {
                *pixel = blended;
            }
        }
    }
}
