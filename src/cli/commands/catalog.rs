//! Catalog command - browse products through the derived view

use crate::app::HubContext;
use crate::cli::args::{CatalogArgs, OutputFormat};
use crate::error::HubResult;
use crate::model::Product;
use crate::ui::{self, TaskSpinner, UiContext};
use crate::view::{self, ViewFilter};
use console::style;

/// Execute the catalog command
pub async fn execute(args: CatalogArgs, hub: &HubContext) -> HubResult<()> {
    let filter = resolve_filter(&args, hub);

    let mut spinner = TaskSpinner::new(&hub.ui);
    spinner.start("Loading catalog...");
    let products = match hub.track(hub.cache.get_collection().await).await {
        Ok(products) => products,
        Err(e) => {
            spinner.stop_error("Could not load catalog");
            return Err(e);
        }
    };
    spinner.clear();

    let shown = view::derive(&products, &filter);
    print_products(&hub.ui, &shown, args.format, Columns::Catalog)?;

    if args.format == OutputFormat::Table && shown.len() < products.len() {
        ui::remark(
            &hub.ui,
            &format!(
                "{} of {} products shown (price {} to {}, sorted by {})",
                shown.len(),
                products.len(),
                filter.price_min,
                filter.price_max,
                filter.sort
            ),
        );
    }

    Ok(())
}

/// Config defaults overlaid with command-line flags
fn resolve_filter(args: &CatalogArgs, hub: &HubContext) -> ViewFilter {
    let mut filter = hub.config.catalog.filter();
    if let Some(search) = &args.search {
        filter.search = search.clone();
    }
    if let Some(min) = args.min_price {
        filter.price_min = min;
    }
    if let Some(max) = args.max_price {
        filter.price_max = max;
    }
    if let Some(sort) = &args.sort {
        filter.sort = sort.clone();
    }
    filter
}

/// Which columns a product table carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Columns {
    /// Public view: title, price, link
    Catalog,
    /// Admin view: identifier first
    Admin,
}

pub(crate) fn print_products(
    ctx: &UiContext,
    products: &[Product],
    format: OutputFormat,
    columns: Columns,
) -> HubResult<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(products)?);
        }
        OutputFormat::Plain => {
            for product in products {
                println!("{}", plain_line(product, columns));
            }
        }
        OutputFormat::Table if products.is_empty() => {
            ui::remark(ctx, "No products match");
        }
        OutputFormat::Table => print_table(products, columns),
    }
    Ok(())
}

fn plain_line(product: &Product, columns: Columns) -> String {
    match columns {
        Columns::Catalog => format!("{}\t{}", product.title, product.display_price()),
        Columns::Admin => format!(
            "{}\t{}\t{}",
            id_text(product),
            product.title,
            product.display_price()
        ),
    }
}

fn id_text(product: &Product) -> String {
    product
        .id
        .as_ref()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn added(product: &Product) -> String {
    product
        .created()
        .map(|ts| ts.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn print_table(products: &[Product], columns: Columns) {
    if columns == Columns::Admin {
        print!("{:<26} ", style("ID").bold());
    }
    println!(
        "{:<32} {:>10} {:<12} {}",
        style("TITLE").bold(),
        style("PRICE").bold(),
        style("ADDED").bold(),
        style("LINK").bold()
    );
    let width = if columns == Columns::Admin { 110 } else { 83 };
    println!("{}", "-".repeat(width));

    for product in products {
        if columns == Columns::Admin {
            let id = match &product.id {
                Some(id) => style(id.to_string()),
                None => style("(none)".to_string()).red(),
            };
            print!("{:<26} ", id);
        }
        println!(
            "{:<32} {:>10} {:<12} {}",
            truncate(&product.title, 32),
            style(product.display_price()).green(),
            added(product),
            style(&product.affiliate_url).dim()
        );
    }

    println!();
    println!("{} product(s)", products.len());
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max - 1).collect();
    format!("{kept}…")
}
