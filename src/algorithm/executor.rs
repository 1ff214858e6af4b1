use crate::{
    algorithm::blend::TargetCycle,
    algorithm::compositing::{CompositingConfig, CompositingEngine},
    algorithm::search::find_best_match,
    imaging::sampler::average_color,
    imaging::store::ImageStore,
    io::configuration::{
        CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_MATCH_ATTEMPTS, DEFAULT_SECTIONS_PER_FRAME,
        DEFAULT_TRANSITION_SPEED, MAX_SECTIONS_PER_FRAME, MAX_TRANSITION_SPEED,
        MIN_SECTIONS_PER_FRAME, MIN_TRANSITION_SPEED, SECTION_SIZE, SECTIONS_PER_FRAME_STEP,
        TRANSITION_SPEED_DOWN_FACTOR, TRANSITION_SPEED_UP_FACTOR,
    },
    io::error::{EngineError, Result},
    spatial::grid::RegionGrid,
};
use image::{Rgba, RgbaImage};
use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, info, trace};

/// Engine parameters controlling geometry, per-tick budget and search effort
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    /// Width of the processing region in pixels
    pub width: u32,
    /// Height of the processing region in pixels
    pub height: u32,
    /// Edge length of a section in pixels
    pub section_size: u32,
    /// Sections processed per active tick
    pub sections_per_frame: usize,
    /// Largest accepted sections-per-frame value
    pub max_sections_per_frame: usize,
    /// Blend amount added per tick
    pub transition_speed: f64,
    /// Accepted transition speeds (min, max)
    pub transition_speed_range: (f64, f64),
    /// Random attempts per match search
    pub match_attempts: usize,
    /// Tile draw randomization
    pub compositing: CompositingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            section_size: SECTION_SIZE,
            sections_per_frame: DEFAULT_SECTIONS_PER_FRAME,
            max_sections_per_frame: MAX_SECTIONS_PER_FRAME,
            transition_speed: DEFAULT_TRANSITION_SPEED,
            transition_speed_range: (MIN_TRANSITION_SPEED, MAX_TRANSITION_SPEED),
            match_attempts: DEFAULT_MATCH_ATTEMPTS,
            compositing: CompositingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Pull every runtime value into its valid range
    ///
    /// Geometry is left alone; zero sizes are rejected when the engine is built.
    #[must_use]
    pub fn clamped(self) -> Self {
        let max_sections = self.max_sections_per_frame.max(MIN_SECTIONS_PER_FRAME);
        let (low, high) = self.transition_speed_range;
        let (low, high) = if low.is_finite() && high.is_finite() && low > 0.0 && low <= high {
            (low, high)
        } else {
            (MIN_TRANSITION_SPEED, MAX_TRANSITION_SPEED)
        };

        Self {
            sections_per_frame: self
                .sections_per_frame
                .clamp(MIN_SECTIONS_PER_FRAME, max_sections),
            max_sections_per_frame: max_sections,
            transition_speed: clamp_speed(self.transition_speed, (low, high)),
            transition_speed_range: (low, high),
            match_attempts: self.match_attempts.max(1),
            compositing: self.compositing.clamped(),
            ..self
        }
    }
}

fn clamp_speed(speed: f64, (low, high): (f64, f64)) -> f64 {
    if speed.is_nan() {
        low
    } else {
        speed.clamp(low, high)
    }
}

/// Work performed by one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Sections drawn during the tick
    pub sections_processed: usize,
    /// Full-coverage rollovers that happened during the tick
    pub cycles_completed: usize,
    /// Whether the target cycle moved on to a new current target
    pub target_advanced: bool,
}

/// Tile-mosaic reconstruction engine
///
/// Owns every piece of mutable state: image store, target cycle, region grid,
/// composited layer and the seeded random generator. All mutation happens in
/// [`MosaicEngine::tick`] or the synchronous command methods.
pub struct MosaicEngine {
    config: EngineConfig,
    store: ImageStore,
    cycle: TargetCycle,
    grid: RegionGrid,
    layer: RgbaImage,
    compositor: CompositingEngine,
    rng: StdRng,
    is_processing: bool,
    sections_per_frame: usize,
    transition_speed: f64,
    tick_count: u64,
    cycles_completed: u64,
}

impl MosaicEngine {
    /// Create an idle engine over the given images
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The processing region or section size is zero
    /// - The target list is empty
    /// - The source is not larger than one section
    pub fn new(
        source: RgbaImage,
        targets: Vec<RgbaImage>,
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self> {
        let config = config.clamped();
        let grid = RegionGrid::new(config.width, config.height, config.section_size)?;
        let store = ImageStore::new(
            source,
            targets,
            (config.width, config.height),
            config.section_size,
        )?;
        let cycle = TargetCycle::new(store.target_count())?;

        debug!(
            width = config.width,
            height = config.height,
            sections = grid.len(),
            targets = store.target_count(),
            "engine initialized"
        );

        Ok(Self {
            store,
            cycle,
            grid,
            layer: RgbaImage::new(config.width, config.height),
            compositor: CompositingEngine::new(config.compositing),
            rng: StdRng::seed_from_u64(seed),
            is_processing: false,
            sections_per_frame: config.sections_per_frame,
            transition_speed: config.transition_speed,
            tick_count: 0,
            cycles_completed: 0,
            config,
        })
    }

    /// Advance the target blend and, when processing, draw up to the per-tick budget
    ///
    /// # Errors
    ///
    /// Returns an error if sampling or matching a section fails, which the
    /// grid construction rules out.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.tick_count += 1;
        let target_advanced = self.cycle.advance(self.transition_speed);
        if target_advanced {
            debug!(
                current = self.cycle.current(),
                next = self.cycle.next(),
                "target cycle advanced"
            );
        }

        let mut report = if self.is_processing {
            self.per_frame(self.sections_per_frame)?
        } else {
            TickReport::default()
        };
        report.target_advanced = target_advanced;
        Ok(report)
    }

    /// Run `count` section events against the current blend state
    ///
    /// When no section is left, the grid and layer are cleared and the same
    /// event proceeds against the fresh grid.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling or matching a section fails.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn per_frame(&mut self, count: usize) -> Result<TickReport> {
        let mut report = TickReport::default();

        for _ in 0..count {
            if self.grid.is_complete() {
                self.clear_coverage();
                self.cycles_completed += 1;
                report.cycles_completed += 1;
                debug!(cycles = self.cycles_completed, "coverage cycle completed");
            }

            let Some(index) = self.grid.choose_unprocessed(&mut self.rng) else {
                break;
            };
            self.process_section(index)?;
            report.sections_processed += 1;
        }

        Ok(report)
    }

    fn process_section(&mut self, index: usize) -> Result<()> {
        let size = self.config.section_size;
        let (x, y) = self
            .grid
            .origin(index)
            .ok_or_else(|| EngineError::EmptySampleRegion {
                origin: (0, 0),
                size,
                image_dimensions: self.store.dimensions(),
            })?;

        let region = self.cycle.blended_region(self.store.targets(), x, y, size, size);
        let target_color = average_color(&region, 0, 0, size)?;

        let tile = find_best_match(
            self.store.source(),
            target_color,
            size,
            self.config.match_attempts,
            &mut self.rng,
        )?;

        let draw = self.compositor.render_section(
            &mut self.layer,
            self.store.source(),
            (tile.x, tile.y),
            (x, y),
            size,
            &mut self.rng,
        );
        trace!(
            section = index,
            source_x = tile.x,
            source_y = tile.y,
            distance = tile.distance,
            glitched = draw.glitched,
            "section drawn"
        );

        self.grid.mark_processed(index);
        Ok(())
    }

    fn clear_coverage(&mut self) {
        self.grid.reset();
        for pixel in self.layer.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    /// Begin section processing on subsequent ticks
    pub const fn start_processing(&mut self) {
        self.is_processing = true;
    }

    /// Stop section processing; blending keeps running
    pub const fn pause_processing(&mut self) {
        self.is_processing = false;
    }

    /// Flip between processing and paused
    pub const fn toggle_processing(&mut self) {
        self.is_processing = !self.is_processing;
    }

    /// Clear all coverage and the layer, and pause processing
    pub fn reset(&mut self) {
        self.clear_coverage();
        self.is_processing = false;
    }

    /// Set the per-tick section budget, clamped to `[1, max_sections_per_frame]`
    pub fn set_sections_per_frame(&mut self, sections: usize) {
        self.sections_per_frame =
            sections.clamp(MIN_SECTIONS_PER_FRAME, self.config.max_sections_per_frame);
    }

    /// Raise the per-tick section budget by one step
    pub fn increase_sections_per_frame(&mut self) {
        self.set_sections_per_frame(
            self.sections_per_frame
                .saturating_add(SECTIONS_PER_FRAME_STEP),
        );
    }

    /// Lower the per-tick section budget by one step
    pub fn decrease_sections_per_frame(&mut self) {
        self.set_sections_per_frame(
            self.sections_per_frame
                .saturating_sub(SECTIONS_PER_FRAME_STEP),
        );
    }

    /// Set the per-tick blend increment, clamped to the configured range
    pub fn set_transition_speed(&mut self, speed: f64) {
        self.transition_speed = clamp_speed(speed, self.config.transition_speed_range);
    }

    /// Speed the target transition up by a fixed factor
    pub fn increase_transition_speed(&mut self) {
        self.set_transition_speed(self.transition_speed * TRANSITION_SPEED_UP_FACTOR);
    }

    /// Slow the target transition down by a fixed factor
    pub fn decrease_transition_speed(&mut self) {
        self.set_transition_speed(self.transition_speed * TRANSITION_SPEED_DOWN_FACTOR);
    }

    /// Install a freshly loaded source image
    ///
    /// An idle engine restarts its coverage so the next run is drawn entirely
    /// from the new source; a processing engine keeps going.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not larger than one section; the
    /// previous source stays active in that case.
    pub fn install_source(&mut self, source: RgbaImage) -> Result<()> {
        let (width, height) = source.dimensions();
        self.store.replace_source(source)?;
        if !self.is_processing {
            self.clear_coverage();
        }
        info!(width, height, "source image installed");
        Ok(())
    }

    /// Install a new target list and restart the target cycle
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty; the previous targets stay
    /// active in that case.
    pub fn replace_targets(&mut self, targets: Vec<RgbaImage>) -> Result<()> {
        self.store.replace_targets(targets)?;
        self.cycle.reset_len(self.store.target_count())?;
        info!(targets = self.store.target_count(), "target images replaced");
        Ok(())
    }

    /// Full blended target frame for the current blend state
    pub fn blended_frame(&self) -> RgbaImage {
        let (width, height) = self.store.dimensions();
        let mut frame = RgbaImage::new(width, height);
        self.cycle.render_into(self.store.targets(), &mut frame);
        frame
    }

    /// Composited layer of drawn tiles
    pub const fn layer(&self) -> &RgbaImage {
        &self.layer
    }

    /// Section coverage state
    pub const fn grid(&self) -> &RegionGrid {
        &self.grid
    }

    /// Target blend state
    pub const fn cycle(&self) -> &TargetCycle {
        &self.cycle
    }

    /// Installed images
    pub const fn store(&self) -> &ImageStore {
        &self.store
    }

    /// Effective configuration after clamping
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether section processing is active
    pub const fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// Current per-tick section budget
    pub const fn sections_per_frame(&self) -> usize {
        self.sections_per_frame
    }

    /// Current per-tick blend increment
    pub const fn transition_speed(&self) -> f64 {
        self.transition_speed
    }

    /// Fraction of sections drawn in the current cycle
    pub fn coverage(&self) -> f64 {
        self.grid.coverage()
    }

    /// Ticks executed so far
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Coverage rollovers so far
    pub const fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }
}
