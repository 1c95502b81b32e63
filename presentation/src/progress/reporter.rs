//! In-flight spinner shown while a backend round trip is outstanding

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner displayed for the duration of one request.
///
/// Cleared (not finished in place) so the rendered conversation stays
/// clean once the reply arrives.
pub struct PendingSpinner {
    bar: ProgressBar,
}

impl PendingSpinner {
    pub fn start(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
    }

    /// Stop and erase the spinner line.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }
}
