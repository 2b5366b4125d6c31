//! Login and logout commands

use crate::activity::Activity;
use crate::app::HubContext;
use crate::cli::args::LoginArgs;
use crate::error::HubResult;
use crate::model::LoginCredentials;
use crate::ui::{self, TaskSpinner};
use secrecy::SecretString;

/// Execute the login command
pub async fn login(args: LoginArgs, hub: &HubContext) -> HubResult<()> {
    if hub.session.is_authenticated() {
        ui::remark(&hub.ui, "Already logged in, replacing the stored credential");
    }

    let username = match args.username {
        Some(username) => username,
        None => ui::input(&hub.ui, "Username:", "--username").await?,
    };
    let password = match args.password {
        Some(password) => SecretString::from(password),
        None => ui::password(&hub.ui, "Password:", "--password").await?,
    };
    let credentials = LoginCredentials { username, password };

    let mut spinner = TaskSpinner::new(&hub.ui);
    spinner.start("Signing in...");
    if let Err(e) = hub.session.login(&*hub.gateway, &credentials).await {
        spinner.stop_error("Login failed");
        return Err(e);
    }
    spinner.stop(&format!("Logged in as {}", credentials.username));

    hub.activity
        .record(Activity::LoggedIn {
            username: credentials.username,
        })
        .await;
    Ok(())
}

/// Execute the logout command
pub async fn logout(hub: &HubContext) -> HubResult<()> {
    if !hub.session.is_authenticated() {
        ui::remark(&hub.ui, "Not logged in");
        return Ok(());
    }

    hub.session.logout().await?;
    hub.activity.record(Activity::LoggedOut).await;
    ui::step_ok(&hub.ui, "Logged out");
    Ok(())
}
