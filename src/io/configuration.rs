//! Engine constants and runtime configuration defaults

// Processing region and section geometry
/// Width of the processing region in pixels
pub const CANVAS_WIDTH: u32 = 800;
/// Height of the processing region in pixels
pub const CANVAS_HEIGHT: u32 = 600;
/// Edge length of a square section in pixels
pub const SECTION_SIZE: u32 = 10;

// Per-tick work budget
/// Sections processed per tick when nothing else is requested
pub const DEFAULT_SECTIONS_PER_FRAME: usize = 50;
/// Lower bound for sections processed per tick
pub const MIN_SECTIONS_PER_FRAME: usize = 1;
/// Upper bound for sections processed per tick
pub const MAX_SECTIONS_PER_FRAME: usize = 50;
/// Increment used by the step-up/step-down speed commands
pub const SECTIONS_PER_FRAME_STEP: usize = 5;

// Target transition
/// Blend amount added per tick
pub const DEFAULT_TRANSITION_SPEED: f64 = 0.0005;
/// Slowest allowed transition speed
pub const MIN_TRANSITION_SPEED: f64 = 0.0001;
/// Fastest allowed transition speed
pub const MAX_TRANSITION_SPEED: f64 = 0.01;
/// Multiplier applied by the speed-up command
pub const TRANSITION_SPEED_UP_FACTOR: f64 = 1.5;
/// Multiplier applied by the slow-down command
pub const TRANSITION_SPEED_DOWN_FACTOR: f64 = 0.75;

// Match search
/// Random attempts per section when searching the source
pub const DEFAULT_MATCH_ATTEMPTS: usize = 50;

// Compositing jitter
/// Maximum absolute rotation of a drawn tile in radians
pub const MAX_ROTATION: f64 = 0.1;
/// Smallest random scale factor for a drawn tile
pub const MIN_TILE_SCALE: f64 = 0.95;
/// Largest random scale factor for a drawn tile
pub const MAX_TILE_SCALE: f64 = 1.05;
/// Chance that a drawn tile receives the chromatic-shift pass
pub const GLITCH_PROBABILITY: f64 = 0.1;
/// Opacity of each tinted chromatic-shift draw
pub const GLITCH_OPACITY: f64 = 50.0 / 255.0;
/// Maximum pixel offset of each chromatic-shift draw on either axis
pub const GLITCH_JITTER: f64 = 2.0;

// Default values for driver parameters
/// Fixed seed for reproducible runs
pub const DEFAULT_SEED: u64 = 42;
/// Ticks executed by the command-line driver
pub const DEFAULT_TICKS: usize = 600;
/// Ticks between captured visualization frames
pub const DEFAULT_CAPTURE_INTERVAL: usize = 10;

// Output settings
/// Suffix added to output filenames
pub const OUTPUT_SUFFIX: &str = "_mosaic";
/// Delay between GIF animation frames
pub const GIF_FRAME_DELAY_MS: u32 = 40;
/// Minimum frame delay that viewers reliably support (in milliseconds)
pub const VIEWER_MIN_FRAME_DELAY_MS: u32 = 20;
/// Image extensions accepted when collecting target directories
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
