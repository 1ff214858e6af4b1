/// Command-line driver
pub mod cli;
/// Engine constants and defaults
pub mod configuration;
/// Frames handed to a display
pub mod display;
/// Error types
pub mod error;
/// Image file loading and export
pub mod image;
/// Background source loading
pub mod loader;
/// Terminal progress display
pub mod progress;
/// Frame capture and GIF export
pub mod visualization;
