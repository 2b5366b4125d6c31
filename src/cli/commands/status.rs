//! Status command - API endpoint and session health

use crate::app::HubContext;
use crate::config::ConfigManager;
use crate::error::{HubError, HubResult};
use crate::gateway::Gateway;
use crate::ui;

/// Execute the status command
pub async fn execute(hub: &HubContext) -> HubResult<()> {
    ui::intro(&hub.ui, "AffiliateHub Status");

    ui::key_value(&hub.ui, "API", hub.gateway.base_url().as_str());
    ui::key_value(
        &hub.ui,
        "Credential",
        &ConfigManager::token_path().display().to_string(),
    );

    if !hub.session.is_authenticated() {
        ui::key_value_status(&hub.ui, "Session", "not logged in", false);
        ui::remark(&hub.ui, "Run: affiliate-hub login");
        return Ok(());
    }

    match hub.track(hub.gateway.verify().await).await {
        Ok(()) => ui::key_value_status(&hub.ui, "Session", "logged in (verified)", true),
        Err(HubError::AuthExpired) => {
            ui::key_value_status(&hub.ui, "Session", "expired, credential cleared", false);
            ui::remark(&hub.ui, "Run: affiliate-hub login");
        }
        Err(e) => {
            ui::key_value_status(&hub.ui, "Session", "logged in (unverified)", false);
            ui::step_error_detail(&hub.ui, "Could not reach the API", &e.to_string());
        }
    }

    Ok(())
}
