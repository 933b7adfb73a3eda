//! Progress bar shown while images are fetched.

use crate::progress::ProgressBarOpts;
use indicatif::ProgressBar;

/// Counts settled image tasks, successful or not.
pub struct ProgressDisplay {
    bar: ProgressBar,
    clear: bool,
}

impl ProgressDisplay {
    /// Create a display for `total` tasks.
    pub fn new(opts: ProgressBarOpts, total: usize) -> Self {
        let clear = opts.clear;
        let bar = opts.to_progress_bar(total as u64);
        bar.tick();
        Self { bar, clear }
    }

    /// Record one settled task.
    pub fn settle(&self, url: &str) {
        self.bar.set_message(url.to_string());
        self.bar.inc(1);
    }

    /// Number of settled tasks so far.
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }

    /// Finish the bar, clearing it if configured to.
    pub fn finish(self) {
        if self.clear {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }
}
