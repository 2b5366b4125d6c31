//! CLI argument definitions using clap derive

use crate::view::SortKey;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use rust_decimal::Decimal;
use std::path::PathBuf;

/// AffiliateHub - affiliate product storefront client
///
/// Browse the public catalog, or log in as an admin to manage listings.
#[derive(Parser, Debug)]
#[command(name = "affiliate-hub")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "AFFILIATE_HUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// API root URL, overriding api.base_url
    #[arg(long, global = true, env = "AFFILIATE_HUB_API_URL")]
    pub api_url: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse the product catalog
    Catalog(CatalogArgs),

    /// Log in as an admin
    Login(LoginArgs),

    /// Forget the stored admin credential
    Logout,

    /// Show API and session status
    Status,

    /// Manage product listings (requires login)
    Admin(AdminArgs),

    /// Show or edit configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Arguments for the catalog command
#[derive(Parser, Debug, Default)]
pub struct CatalogArgs {
    /// Only show products whose title contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Lowest price to show (default: catalog.price_min)
    #[arg(long)]
    pub min_price: Option<Decimal>,

    /// Highest price to show (default: catalog.price_max)
    #[arg(long)]
    pub max_price: Option<Decimal>,

    /// Sort order: price-asc, price-desc or date-desc
    #[arg(long)]
    pub sort: Option<SortKey>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the login command
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Admin username (prompted if omitted)
    #[arg(short, long)]
    pub username: Option<String>,

    /// Admin password (prompted if omitted)
    #[arg(short, long, env = "AFFILIATE_HUB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

/// Arguments for the admin command
#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub action: AdminAction,
}

/// Fields of a listing; omitted ones are prompted for on add
#[derive(Parser, Debug, Default, Clone)]
pub struct ProductFields {
    /// Product title
    #[arg(long)]
    pub title: Option<String>,

    /// Price, e.g. 19.99
    #[arg(long, allow_hyphen_values = true)]
    pub price: Option<String>,

    /// Product image URL (http or https)
    #[arg(long)]
    pub image_url: Option<String>,

    /// Amazon affiliate link (www.amazon.* or amzn.to)
    #[arg(long, alias = "amazon-url")]
    pub affiliate_url: Option<String>,
}

/// Admin subcommands
#[derive(Subcommand, Debug)]
pub enum AdminAction {
    /// List products with their identifiers
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Create a product
    Add(ProductFields),

    /// Edit a product; only the given fields change
    Edit {
        /// Product identifier
        id: String,

        #[command(flatten)]
        fields: ProductFields,
    },

    /// Delete a product
    Remove {
        /// Product identifier
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the default configuration
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.base_url)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
