//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{HubError, HubResult};
use secrecy::SecretString;

/// Prompt for confirmation, returns default if non-interactive or auto-yes
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> HubResult<bool> {
    if ctx.auto_yes() {
        eprintln!("  {} (auto-approved)", message);
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    let message = message.to_string();
    blocking(move || {
        cliclack::confirm(&message)
            .initial_value(default)
            .interact()
    })
    .await
}

/// Prompt for a line of text
///
/// Without a terminal there is nobody to ask; `flag` names the option that
/// supplies the value instead.
pub async fn input(ctx: &UiContext, message: &str, flag: &str) -> HubResult<String> {
    if !ctx.is_interactive() {
        return Err(missing_value(message, flag));
    }

    let message = message.to_string();
    blocking(move || {
        cliclack::input(&message)
            .validate(|value: &String| {
                if value.trim().is_empty() {
                    Err("A value is required")
                } else {
                    Ok(())
                }
            })
            .interact::<String>()
    })
    .await
}

/// Prompt for a secret without echoing it
pub async fn password(ctx: &UiContext, message: &str, flag: &str) -> HubResult<SecretString> {
    if !ctx.is_interactive() {
        return Err(missing_value(message, flag));
    }

    let message = message.to_string();
    let value = blocking(move || cliclack::password(&message).mask('▪').interact()).await?;
    Ok(SecretString::from(value))
}

fn missing_value(message: &str, flag: &str) -> HubError {
    HubError::User(format!(
        "{} is required in non-interactive mode (pass {})",
        message.trim_end_matches(':'),
        flag
    ))
}

/// Run a blocking cliclack prompt off the async runtime
async fn blocking<T, F>(prompt: F) -> HubResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| HubError::Internal(format!("prompt task failed: {}", e)))?
        .map_err(|e| HubError::User(format!("Prompt cancelled: {}", e)))
}
