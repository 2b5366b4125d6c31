//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::{HubError, HubResult};
use crate::ui::{self, UiContext};
use crate::view::SortKey;
use rust_decimal::Decimal;

const VALID_KEYS: &[&str] = &[
    "general.log_format",
    "general.activity_log",
    "api.base_url",
    "catalog.price_min",
    "catalog.price_max",
    "catalog.sort",
];

/// Execute the config command
pub async fn execute(args: ConfigArgs, manager: &ConfigManager, config: &Config) -> HubResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => println!("{}", manager.path().display()),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value }) => {
            let ctx = UiContext::detect();
            let mut updated = config.clone();
            if let Err(e) = set_value(&mut updated, &key, &value) {
                ui::step_error_detail(&ctx, "Cannot set", &key);
                ui::remark(&ctx, &format!("Valid keys: {}", VALID_KEYS.join(", ")));
                return Err(e);
            }
            manager.save(&updated).await?;
            ui::step_ok(&ctx, &format!("Set {} = {}", key, value));
        }
    }

    Ok(())
}

fn show_config(config: &Config) -> HubResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn init_config(manager: &ConfigManager, force: bool) -> HubResult<()> {
    let ctx = UiContext::detect();
    let path = manager.path();

    if path.exists() && !force {
        ui::step_warn_hint(
            &ctx,
            &format!("Config already exists at {}", path.display()),
            "Use --force to overwrite",
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    ui::step_ok_detail(&ctx, "Configuration initialized", &path.display().to_string());
    Ok(())
}

/// Apply a dot-separated `key` to `config`
fn set_value(config: &mut Config, key: &str, value: &str) -> HubResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "log_format"] => {
            if !matches!(value, "text" | "json") {
                return Err(HubError::User(format!(
                    "Invalid log format: {}. Use text or json",
                    value
                )));
            }
            config.general.log_format = value.to_string();
        }
        ["general", "activity_log"] => config.general.activity_log = parse_bool(value)?,

        ["api", "base_url"] => {
            reqwest::Url::parse(value)
                .map_err(|e| HubError::User(format!("Invalid URL {}: {}", value, e)))?;
            config.api.base_url = value.to_string();
        }

        ["catalog", "price_min"] => config.catalog.price_min = parse_price(value)?,
        ["catalog", "price_max"] => config.catalog.price_max = parse_price(value)?,
        ["catalog", "sort"] => match value.parse::<SortKey>() {
            Ok(SortKey::Unrecognized(_)) | Err(_) => {
                return Err(HubError::User(format!(
                    "Invalid sort: {}. Use price-asc, price-desc or date-desc",
                    value
                )))
            }
            Ok(sort) => config.catalog.sort = sort.to_string(),
        },

        _ => return Err(HubError::User(format!("Unknown config key: {}", key))),
    }

    Ok(())
}

fn parse_bool(value: &str) -> HubResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(HubError::User(format!(
            "Invalid boolean value: {}. Use true/false",
            value
        ))),
    }
}

fn parse_price(value: &str) -> HubResult<Decimal> {
    let price: Decimal = value
        .trim()
        .parse()
        .map_err(|_| HubError::User(format!("Invalid price: {}", value)))?;
    if price.is_sign_negative() {
        return Err(HubError::User(format!("Price bound must not be negative: {}", value)));
    }
    Ok(price)
}
