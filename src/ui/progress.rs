use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output;

/// Terminal progress for a translation run.
///
/// Starts as a spinner and turns into a bar once the number of texts is
/// known. Hidden in quiet mode; clears itself when dropped (RAII pattern).
pub struct Progress {
    progress_bar: ProgressBar,
}

impl Progress {
    /// Creates and starts a spinner with the given message.
    #[allow(clippy::unwrap_used)]
    pub fn new(message: &str) -> Self {
        let progress_bar = if output::is_quiet() {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        // unwrap is safe: template string is a compile-time constant
        progress_bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner} {msg}")
                .unwrap(),
        );
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    /// Switches to a bar counting up to `total` texts.
    #[allow(clippy::unwrap_used)]
    pub fn start_bar(&self, total: usize, message: &str) {
        // unwrap is safe: template string is a compile-time constant
        self.progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:30}] {pos}/{len} texts")
                .unwrap()
                .progress_chars("=> "),
        );
        self.progress_bar.set_length(total as u64);
        self.progress_bar.set_position(0);
        self.progress_bar.set_message(message.to_string());
    }

    pub fn set_position(&self, done: usize) {
        self.progress_bar.set_position(done as u64);
    }

    pub fn set_message(&self, message: &str) {
        self.progress_bar.set_message(message.to_string());
    }

    /// Stops the progress display and clears it from the terminal.
    pub fn stop(&self) {
        self.progress_bar.finish_and_clear();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.progress_bar.finish_and_clear();
    }
}
