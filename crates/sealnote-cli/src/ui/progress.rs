//! Progress indicators for long-running operations using indicatif.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;

/// A spinner for indeterminate progress, drawn on stderr.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Create and start a spinner with the given message.
    ///
    /// Without a terminal nothing is drawn.
    pub fn start(ctx: &UiContext, message: &str) -> Self {
        let bar = if ctx.animate {
            let pb = ProgressBar::new_spinner();
            let template = if ctx.unicode {
                "{spinner:.cyan} {msg}..."
            } else {
                "{spinner} {msg}..."
            };
            let ticks: &[&str] = if ctx.unicode {
                &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""]
            } else {
                &["|", "/", "-", "\\", ""]
            };
            if let Ok(style) = ProgressStyle::default_spinner().template(template) {
                pb.set_style(style.tick_strings(ticks));
            }
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(80));
            Some(pb)
        } else {
            None
        };

        Self { bar }
    }

    /// Stop the spinner and clear its line.
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
