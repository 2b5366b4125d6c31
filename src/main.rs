//! AffiliateHub - affiliate product storefront client
//!
//! CLI entry point that dispatches to subcommands.

use affiliate_hub::app::HubContext;
use affiliate_hub::cli::{commands, Cli, Commands};
use affiliate_hub::config::{Config, ConfigManager};
use affiliate_hub::error::HubResult;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> HubResult<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        commands::completions(shell);
        return Ok(());
    }

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config);
    affiliate_hub::ui::init_theme();

    if let Commands::Config(args) = cli.command {
        return commands::config(args, &manager, &config).await;
    }

    let hub = HubContext::build(config, cli.api_url.as_deref()).await?;

    match cli.command {
        Commands::Catalog(args) => commands::catalog(args, &hub).await,
        Commands::Login(args) => commands::login(args, &hub).await,
        Commands::Logout => commands::logout(&hub).await,
        Commands::Status => commands::status(&hub).await,
        Commands::Admin(args) => commands::admin(args, &hub).await,
        Commands::Config(_) | Commands::Completions { .. } => unreachable!("handled above"),
    }
}

/// 0 = warn, 1 = info, 2+ = debug; logs go to stderr
fn init_logging(verbose: u8, config: &Config) {
    let filter = match verbose {
        0 => EnvFilter::new("affiliate_hub=warn"),
        1 => EnvFilter::new("affiliate_hub=info"),
        _ => EnvFilter::new("affiliate_hub=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if config.general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
