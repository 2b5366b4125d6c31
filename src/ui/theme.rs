//! Custom theme for cliclack prompts

use cliclack::ThemeState;
use console::Style;

/// Storefront theme: magenta while active, green once submitted
#[derive(Debug, Clone, Default)]
pub struct HubTheme;

impl cliclack::Theme for HubTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().magenta().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Install the theme for all later prompts
pub fn init_theme() {
    cliclack::set_theme(HubTheme);
}
