//! Source and target image ownership with validated replacement

use crate::io::error::{Result, invalid_source};
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Owns the source image and the cyclic list of target images
///
/// Targets are resized to the processing region on installation so every
/// blend and sample works in region coordinates. The source keeps its own
/// dimensions but must be strictly larger than one section on both axes,
/// otherwise no tile position can be drawn from it.
#[derive(Debug, Clone)]
pub struct ImageStore {
    source: RgbaImage,
    targets: Vec<RgbaImage>,
    dimensions: (u32, u32),
    section_size: u32,
}

impl ImageStore {
    /// Build a store for a processing region of `dimensions` (width, height)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The target list is empty
    /// - The source is not larger than `section_size` in both dimensions
    pub fn new(
        source: RgbaImage,
        targets: Vec<RgbaImage>,
        dimensions: (u32, u32),
        section_size: u32,
    ) -> Result<Self> {
        validate_source(&source, section_size)?;
        let targets = fit_targets(targets, dimensions)?;

        Ok(Self {
            source,
            targets,
            dimensions,
            section_size,
        })
    }

    /// Current source image
    pub const fn source(&self) -> &RgbaImage {
        &self.source
    }

    /// Target images in cycle order, each sized to the processing region
    pub fn targets(&self) -> &[RgbaImage] {
        &self.targets
    }

    /// Number of targets in the cycle
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Processing region dimensions (width, height)
    pub const fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Swap in a new source image
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not larger than one section; the
    /// current source stays installed in that case.
    pub fn replace_source(&mut self, source: RgbaImage) -> Result<()> {
        validate_source(&source, self.section_size)?;
        self.source = source;
        Ok(())
    }

    /// Swap in a new target list
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty; the current targets stay
    /// installed in that case.
    pub fn replace_targets(&mut self, targets: Vec<RgbaImage>) -> Result<()> {
        self.targets = fit_targets(targets, self.dimensions)?;
        Ok(())
    }
}

fn validate_source(source: &RgbaImage, section_size: u32) -> Result<()> {
    let (width, height) = source.dimensions();
    if width <= section_size || height <= section_size {
        return Err(invalid_source(&format!(
            "source image {width}x{height} must be larger than the {section_size}px section size"
        )));
    }
    Ok(())
}

fn fit_targets(targets: Vec<RgbaImage>, dimensions: (u32, u32)) -> Result<Vec<RgbaImage>> {
    if targets.is_empty() {
        return Err(invalid_source(&"at least one target image is required"));
    }

    let (width, height) = dimensions;
    Ok(targets
        .into_iter()
        .map(|target| {
            if target.dimensions() == dimensions {
                target
            } else {
                imageops::resize(&target, width, height, FilterType::Triangle)
            }
        })
        .collect())
}
