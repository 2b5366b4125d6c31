//! Spinner shown while waiting on the API

use super::context::UiContext;
use console::style;

/// A spinner that degrades to plain lines on stderr
///
/// Plain output goes to stderr so machine-readable stdout stays clean.
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            eprintln!("{} {}", style("...").dim(), message);
        }
    }

    /// Stop with success message
    pub fn stop(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => {
                spinner.stop(message);
            }
            None if self.interactive => eprintln!("{} {}", style("✓").green(), message),
            None => eprintln!("{} {}", style("[OK]").green(), message),
        }
    }

    /// Stop with error message
    pub fn stop_error(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => {
                spinner.error(message);
            }
            None if self.interactive => eprintln!("{} {}", style("✗").red(), message),
            None => eprintln!("{} {}", style("[FAIL]").red(), message),
        }
    }

    /// Remove the spinner without a message
    pub fn clear(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.clear();
        }
    }
}
