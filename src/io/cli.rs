//! Command-line driver ticking the engine over images loaded from disk

use crate::algorithm::executor::{EngineConfig, MosaicEngine};
use crate::io::configuration::{
    CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_CAPTURE_INTERVAL, DEFAULT_MATCH_ATTEMPTS,
    DEFAULT_SECTIONS_PER_FRAME, DEFAULT_SEED, DEFAULT_TICKS, DEFAULT_TRANSITION_SPEED,
    GIF_FRAME_DELAY_MS, OUTPUT_SUFFIX, SECTION_SIZE,
};
use crate::io::display::{preview_canvas, processing_view};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{collect_image_paths, export_png, load_rgba};
use crate::io::loader::SourceLoader;
use crate::io::progress::ProgressManager;
use crate::io::visualization::FrameCapture;
use clap::Parser;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "mosaicdrift")]
#[command(
    author,
    version,
    about = "Reconstruct a rotating sequence of target images from tiles of a source image"
)]
/// Command-line arguments for the mosaic driver
// CLI tools commonly need multiple boolean flags for various features and user preferences
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image the tiles are cut from
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Target images or directories of images, cycled in order
    #[arg(value_name = "TARGET", required = true, num_args = 1..)]
    pub targets: Vec<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = DEFAULT_TICKS)]
    pub ticks: usize,

    /// Sections drawn per tick (clamped to the valid range)
    #[arg(long, default_value_t = DEFAULT_SECTIONS_PER_FRAME)]
    pub sections_per_frame: usize,

    /// Blend amount added per tick (clamped to the valid range)
    #[arg(long, default_value_t = DEFAULT_TRANSITION_SPEED)]
    pub transition_speed: f64,

    /// Random attempts per section when searching the source
    #[arg(short, long, default_value_t = DEFAULT_MATCH_ATTEMPTS)]
    pub attempts: usize,

    /// Processing region width in pixels
    #[arg(short = 'w', long, default_value_t = CANVAS_WIDTH)]
    pub width: u32,

    /// Processing region height in pixels
    #[arg(short = 'H', long, default_value_t = CANVAS_HEIGHT)]
    pub height: u32,

    /// Section edge length in pixels
    #[arg(long, default_value_t = SECTION_SIZE)]
    pub section_size: u32,

    /// Output PNG path (defaults to <source>_mosaic.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export only the composited layer instead of the processing view
    #[arg(short, long)]
    pub layer_only: bool,

    /// Export the full preview canvas with source and target thumbnails
    #[arg(short, long, conflicts_with = "layer_only")]
    pub preview: bool,

    /// Enable visualization output as animated GIF
    #[arg(short, long)]
    pub visualize: bool,

    /// Ticks between captured visualization frames
    #[arg(long, default_value_t = DEFAULT_CAPTURE_INTERVAL)]
    pub capture_interval: usize,

    /// Image to hot-swap in as the source during the run
    #[arg(long, value_name = "PATH")]
    pub swap_source: Option<PathBuf>,

    /// Tick at which the swap load starts (defaults to half the run)
    #[arg(long, requires = "swap_source")]
    pub swap_at: Option<usize>,

    /// Ticks to run idle (blending only) before processing starts
    #[arg(long, default_value_t = 0)]
    pub paused_ticks: usize,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Log engine events at debug level
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Engine configuration built from the flags
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            width: self.width,
            height: self.height,
            section_size: self.section_size,
            sections_per_frame: self.sections_per_frame,
            transition_speed: self.transition_speed,
            match_attempts: self.attempts,
            ..EngineConfig::default()
        }
    }

    /// Tick at which a requested source swap begins loading
    pub fn swap_tick(&self) -> Option<usize> {
        self.swap_source
            .as_ref()
            .map(|_| self.swap_at.unwrap_or(self.ticks / 2).max(1))
    }

    /// Where the final PNG is written
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| sibling_path(&self.source, &format!("{OUTPUT_SUFFIX}.png")))
    }

    /// Where the visualization GIF is written
    pub fn visualization_path(&self) -> PathBuf {
        let output = self.output_path();
        output.with_extension("gif")
    }
}

fn sibling_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let name = format!("{}{suffix}", stem.to_string_lossy());

    if let Some(parent) = input_path.parent() {
        parent.join(name)
    } else {
        PathBuf::from(name)
    }
}

/// Outcome of a completed run
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    /// Ticks executed
    pub ticks: usize,
    /// Sections drawn across all ticks
    pub sections_processed: usize,
    /// Coverage rollovers
    pub cycles_completed: u64,
    /// Coverage at the end of the run
    pub final_coverage: f64,
    /// Whether a requested source swap was installed
    pub source_swapped: bool,
    /// PNG written
    pub output_path: PathBuf,
    /// GIF written, if visualization was enabled
    pub visualization_path: Option<PathBuf>,
}

/// Drives one engine run according to CLI arguments
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the given arguments
    pub const fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Load images, tick the engine and export the results
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source or a target cannot be loaded
    /// - No target images are found
    /// - The engine rejects the images or configuration
    /// - Writing the output fails
    pub fn run(&self) -> Result<RunSummary> {
        let cli = &self.cli;
        let source = load_rgba(&cli.source)?;
        let targets = load_targets(&cli.targets)?;

        info!(
            source = %cli.source.display(),
            targets = targets.len(),
            ticks = cli.ticks,
            "starting run"
        );

        let mut engine = MosaicEngine::new(source, targets, cli.engine_config(), cli.seed)?;
        if cli.paused_ticks == 0 {
            engine.start_processing();
        }

        let progress = if cli.should_show_progress() {
            let label = cli
                .source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();
            ProgressManager::new(cli.ticks, &label)
        } else {
            ProgressManager::hidden()
        };

        let mut capture = cli
            .visualize
            .then(|| FrameCapture::new(cli.capture_interval, cli.ticks));
        let swap_tick = cli.swap_tick();
        let mut loader: Option<SourceLoader> = None;
        let mut source_swapped = false;
        let mut sections_processed = 0;

        for tick in 1..=cli.ticks {
            if cli.paused_ticks > 0 && tick == cli.paused_ticks + 1 {
                engine.start_processing();
            }

            if swap_tick == Some(tick) {
                if let Some(path) = &cli.swap_source {
                    loader = Some(SourceLoader::spawn(path));
                }
            }

            if let Some(pending) = loader.as_ref() {
                if let Some(result) = pending.poll() {
                    source_swapped = install_loaded(&mut engine, pending.path(), result);
                    loader = None;
                }
            }

            let report = engine.tick()?;
            sections_processed += report.sections_processed;

            progress.update(tick, engine.coverage(), engine.cycles_completed());
            if let Some(capture) = capture.as_mut() {
                capture.record_tick(tick, || processing_view(&engine));
            }
        }
        progress.finish();

        if let Some(pending) = loader {
            warn!(
                path = %pending.path().display(),
                "source swap still loading when the run ended"
            );
        }

        let output_path = cli.output_path();
        let output = self.final_frame(&engine);
        export_png(&output, &output_path)?;
        info!(path = %output_path.display(), "wrote output");

        let visualization_path = match capture {
            Some(capture) => {
                let path = cli.visualization_path();
                capture.export_gif(&path, GIF_FRAME_DELAY_MS)?;
                info!(
                    path = %path.display(),
                    frames = capture.frame_count(),
                    "wrote visualization"
                );
                Some(path)
            }
            None => None,
        };

        Ok(RunSummary {
            ticks: cli.ticks,
            sections_processed,
            cycles_completed: engine.cycles_completed(),
            final_coverage: engine.coverage(),
            source_swapped,
            output_path,
            visualization_path,
        })
    }

    fn final_frame(&self, engine: &MosaicEngine) -> RgbaImage {
        if self.cli.layer_only {
            engine.layer().clone()
        } else if self.cli.preview {
            preview_canvas(engine)
        } else {
            processing_view(engine)
        }
    }
}

fn load_targets(inputs: &[PathBuf]) -> Result<Vec<RgbaImage>> {
    let paths = collect_image_paths(inputs)?;
    if paths.is_empty() {
        return Err(invalid_parameter(
            "targets",
            &inputs.len(),
            &"no target images found",
        ));
    }
    paths.iter().map(load_rgba).collect()
}

// Load failures stay at the boundary: the engine keeps its current source
fn install_loaded(engine: &mut MosaicEngine, path: &Path, result: Result<RgbaImage>) -> bool {
    match result.and_then(|image| engine.install_source(image)) {
        Ok(()) => true,
        Err(error) => {
            warn!(path = %path.display(), %error, "keeping previous source");
            false
        }
    }
}
