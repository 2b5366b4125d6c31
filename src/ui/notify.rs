//! Terminal notifications for admin writes

use super::context::UiContext;
use super::output::{step_error, step_ok};
use crate::mutation::Notifier;

/// Prints mutation outcomes as cliclack log lines, or `[OK]`/`[FAIL]` when plain
pub struct TerminalNotifier {
    ctx: UiContext,
}

impl TerminalNotifier {
    pub fn new(ctx: UiContext) -> Self {
        Self { ctx }
    }
}

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        step_ok(&self.ctx, message);
    }

    fn error(&self, message: &str) {
        step_error(&self.ctx, message);
    }
}
