//! Terminal progress display for a run of engine ticks

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {prefix} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Progress bar over ticks showing coverage and completed cycles
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a visible progress bar for `ticks` ticks labelled with `label`
    pub fn new(ticks: usize, label: &str) -> Self {
        let bar = ProgressBar::new(ticks as u64);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(label.to_string());
        Self { bar }
    }

    /// Create a progress manager that draws nothing
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Report the latest tick together with coverage and rollovers
    pub fn update(&self, tick: usize, coverage: f64, cycles: u64) {
        self.bar.set_position(tick as u64);
        self.bar
            .set_message(format!("coverage {:>5.1}% cycles {cycles}", coverage * 100.0));
    }

    /// Current bar position
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Last message shown next to the bar
    pub fn message(&self) -> String {
        self.bar.message()
    }

    /// Finish the bar and leave the final state on screen
    pub fn finish(&self) {
        self.bar.finish();
    }
}
