//! Terminal UI
//!
//! `cliclack` frames, spinners and prompts when attached to a terminal,
//! plain `[OK]`/`[FAIL]` lines otherwise (CI, pipes, `AFFILIATE_HUB_NON_INTERACTIVE`).
//!
//! ```rust,ignore
//! use affiliate_hub::ui::{self, TaskSpinner, UiContext};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Loading catalog...");
//! // ... fetch ...
//! spinner.stop("Loaded 12 products");
//!
//! if ui::confirm(&ctx, "Delete 'Desk Lamp'?", false).await? {
//!     // ...
//! }
//! ```

mod context;
mod notify;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::{UiContext, NON_INTERACTIVE_ENV};
pub use notify::TerminalNotifier;
pub use output::{
    intro, key_value, key_value_status, remark, step_error, step_error_detail, step_ok,
    step_ok_detail, step_warn_hint,
};
pub use progress::TaskSpinner;
pub use prompts::{confirm, input, password};
pub use theme::{init_theme, HubTheme};
