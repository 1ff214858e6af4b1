//! Drawing matched source tiles into the persistent layer with jitter and chromatic shift

use crate::io::configuration::{
    GLITCH_JITTER, GLITCH_OPACITY, GLITCH_PROBABILITY, MAX_ROTATION, MAX_TILE_SCALE,
    MIN_TILE_SCALE,
};
use crate::math::color::{Channel, over};
use crate::math::transform::TilePlacement;
use image::RgbaImage;
use image::imageops;
use rand::Rng;

/// Randomization ranges for tile draws
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositingConfig {
    /// Rotation is drawn uniformly from `[-max_rotation, max_rotation]` radians
    pub max_rotation: f64,
    /// Lower bound of the uniform scale factor
    pub min_scale: f64,
    /// Upper bound of the uniform scale factor
    pub max_scale: f64,
    /// Probability that a draw receives the chromatic-shift pass
    pub glitch_probability: f64,
    /// Opacity of each tinted chromatic-shift draw
    pub glitch_opacity: f64,
    /// Each tinted draw is offset uniformly within `[-glitch_jitter, glitch_jitter]` per axis
    pub glitch_jitter: f64,
}

impl Default for CompositingConfig {
    fn default() -> Self {
        Self {
            max_rotation: MAX_ROTATION,
            min_scale: MIN_TILE_SCALE,
            max_scale: MAX_TILE_SCALE,
            glitch_probability: GLITCH_PROBABILITY,
            glitch_opacity: GLITCH_OPACITY,
            glitch_jitter: GLITCH_JITTER,
        }
    }
}

impl CompositingConfig {
    /// Configuration that draws tiles untransformed and never glitches
    pub const fn exact() -> Self {
        Self {
            max_rotation: 0.0,
            min_scale: 1.0,
            max_scale: 1.0,
            glitch_probability: 0.0,
            glitch_opacity: GLITCH_OPACITY,
            glitch_jitter: 0.0,
        }
    }

    /// Normalize ranges so sampling never panics
    #[must_use]
    pub fn clamped(self) -> Self {
        let finite_or = |value: f64, fallback: f64| {
            if value.is_finite() { value } else { fallback }
        };
        let min_scale = finite_or(self.min_scale, MIN_TILE_SCALE).max(f64::EPSILON);
        let max_scale = finite_or(self.max_scale, MAX_TILE_SCALE).max(min_scale);

        Self {
            max_rotation: finite_or(self.max_rotation, MAX_ROTATION).abs(),
            min_scale,
            max_scale,
            glitch_probability: finite_or(self.glitch_probability, GLITCH_PROBABILITY)
                .clamp(0.0, 1.0),
            glitch_opacity: finite_or(self.glitch_opacity, GLITCH_OPACITY).clamp(0.0, 1.0),
            glitch_jitter: finite_or(self.glitch_jitter, GLITCH_JITTER).abs(),
        }
    }
}

/// Random parameters chosen for one section draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionDraw {
    /// Rotation applied to the tile in radians
    pub angle: f64,
    /// Scale applied to the tile
    pub scale: f64,
    /// Whether the chromatic-shift pass ran
    pub glitched: bool,
}

/// How a transformed tile combines with the layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawMode {
    /// Overwrite covered layer pixels with tile pixels
    Replace,
    /// Composite a single-channel copy of the tile over the layer
    Tinted {
        /// Channel kept by the tint
        channel: Channel,
        /// Opacity of the tinted copy
        opacity: f64,
    },
}

/// Draws source tiles into the composited layer
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositingEngine {
    config: CompositingConfig,
}

impl CompositingEngine {
    /// Create an engine with the given randomization ranges
    pub fn new(config: CompositingConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    /// Active randomization ranges
    pub const fn config(&self) -> &CompositingConfig {
        &self.config
    }

    /// Copy the `section_size` tile at `source_pos` into `layer` over the section at `section_pos`
    ///
    /// The tile is rotated and scaled about the section's center, replacing
    /// what was there. With probability `glitch_probability` three tinted
    /// copies (red, green, blue) are then composited over it, each with its
    /// own jitter offset.
    pub fn render_section<R: Rng>(
        &self,
        layer: &mut RgbaImage,
        source: &RgbaImage,
        source_pos: (u32, u32),
        section_pos: (u32, u32),
        section_size: u32,
        rng: &mut R,
    ) -> SectionDraw {
        let block =
            imageops::crop_imm(source, source_pos.0, source_pos.1, section_size, section_size)
                .to_image();

        let rotation = self.config.max_rotation;
        let angle = rng.random_range(-rotation..=rotation);
        let scale = rng.random_range(self.config.min_scale..=self.config.max_scale);

        let half = f64::from(section_size) / 2.0;
        let placement = TilePlacement {
            center: (
                f64::from(section_pos.0) + half,
                f64::from(section_pos.1) + half,
            ),
            angle,
            scale,
            offset: (0.0, 0.0),
        };
        draw_block(layer, &block, placement, DrawMode::Replace);

        let glitched = rng.random::<f64>() < self.config.glitch_probability;
        if glitched {
            let jitter = self.config.glitch_jitter;
            for channel in Channel::ALL {
                let dx = rng.random_range(-jitter..=jitter);
                let dy = rng.random_range(-jitter..=jitter);
                draw_block(
                    layer,
                    &block,
                    placement.shifted(dx, dy),
                    DrawMode::Tinted {
                        channel,
                        opacity: self.config.glitch_opacity,
                    },
                );
            }
        }

        SectionDraw {
            angle,
            scale,
            glitched,
        }
    }
}

/// Draw `block` into `layer` under `placement`, clipped to the layer
///
/// Every destination pixel whose center maps inside the block after the
/// inverse transform samples the nearest block pixel.
pub fn draw_block(
    layer: &mut RgbaImage,
    block: &RgbaImage,
    placement: TilePlacement,
    mode: DrawMode,
) {
    if block.width() == 0 || block.height() == 0 || layer.width() == 0 || layer.height() == 0 {
        return;
    }

    let size = (f64::from(block.width()), f64::from(block.height()));
    let (min_x, min_y, max_x, max_y) = placement.bounds(size);
    let min_x = min_x.max(0) as u32;
    let min_y = min_y.max(0) as u32;
    let max_x = max_x.min(i64::from(layer.width()) - 1);
    let max_y = max_y.min(i64::from(layer.height()) - 1);
    if max_x < 0 || max_y < 0 {
        return;
    }

    for py in min_y..=max_y as u32 {
        for px in min_x..=max_x as u32 {
            let (u, v) = placement.to_local(f64::from(px) + 0.5, f64::from(py) + 0.5, size);
            if u < 0.0 || v < 0.0 || u >= size.0 || v >= size.1 {
                continue;
            }

            let Some(&texel) = block.get_pixel_checked(u as u32, v as u32) else {
                continue;
            };
            let Some(dst) = layer.get_pixel_mut_checked(px, py) else {
                continue;
            };

            *dst = match mode {
                DrawMode::Replace => texel,
                DrawMode::Tinted { channel, opacity } => {
                    over(*dst, channel.isolate(texel), opacity)
                }
            };
        }
    }
}
