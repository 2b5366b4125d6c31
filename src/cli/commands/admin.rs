//! Admin command - manage product listings

use crate::activity::Activity;
use crate::app::HubContext;
use crate::cli::args::{AdminAction, AdminArgs, OutputFormat, ProductFields};
use crate::cli::commands::catalog::{print_products, Columns};
use crate::error::{HubError, HubResult};
use crate::model::{Product, ProductForm, ProductId};
use crate::ui::{self, TaskSpinner};
use tracing::debug;

/// Execute the admin command
pub async fn execute(args: AdminArgs, hub: &HubContext) -> HubResult<()> {
    hub.session.require_authenticated()?;

    match args.action {
        AdminAction::List { format } => list(hub, format).await,
        AdminAction::Add(fields) => add(hub, fields).await,
        AdminAction::Edit { id, fields } => edit(hub, ProductId::new(id), fields).await,
        AdminAction::Remove { id, yes } => remove(hub, ProductId::new(id), yes).await,
    }
}

async fn list(hub: &HubContext, format: OutputFormat) -> HubResult<()> {
    let products = hub.track(hub.cache.get_collection().await).await?;
    print_products(&hub.ui, &products, format, Columns::Admin)
}

async fn add(hub: &HubContext, fields: ProductFields) -> HubResult<()> {
    let mut coordinator = hub.coordinator();
    fill_for_create(hub, coordinator.form_mut(), fields).await?;

    let mut spinner = TaskSpinner::new(&hub.ui);
    spinner.start("Creating product...");
    let result = hub.track(coordinator.submit().await).await;
    spinner.clear();
    let created = result?;

    hub.activity
        .record(Activity::ProductCreated {
            id: created.id.clone(),
            title: created.title.clone(),
        })
        .await;
    if let Some(id) = &created.id {
        ui::remark(&hub.ui, &format!("id: {}", id));
    }
    Ok(())
}

async fn edit(hub: &HubContext, id: ProductId, fields: ProductFields) -> HubResult<()> {
    if fields.title.is_none()
        && fields.price.is_none()
        && fields.image_url.is_none()
        && fields.affiliate_url.is_none()
    {
        return Err(HubError::User(
            "Nothing to change: pass at least one of --title, --price, --image-url, --affiliate-url"
                .to_string(),
        ));
    }

    let product = find(hub, &id).await?;
    let mut coordinator = hub.coordinator();
    coordinator.select_for_edit(&product)?;
    apply(coordinator.form_mut(), fields);

    let mut spinner = TaskSpinner::new(&hub.ui);
    spinner.start(&format!("Updating {}...", product.title));
    let result = hub.track(coordinator.submit().await).await;
    spinner.clear();
    result?;

    hub.activity.record(Activity::ProductUpdated { id }).await;
    Ok(())
}

async fn remove(hub: &HubContext, id: ProductId, yes: bool) -> HubResult<()> {
    let product = find(hub, &id).await?;

    let ctx = hub.ui.clone().with_auto_yes(yes);
    let prompt = format!("Delete '{}' ({})?", product.title, product.display_price());
    if !ui::confirm(&ctx, &prompt, false).await? {
        ui::step_warn_hint(&hub.ui, "Not deleted", "Pass --yes to skip the prompt");
        return Ok(());
    }

    let mut coordinator = hub.coordinator();
    hub.track(coordinator.delete(product.id.as_ref()).await)
        .await?;

    hub.activity.record(Activity::ProductDeleted { id }).await;
    Ok(())
}

/// Look `id` up in the current collection
async fn find(hub: &HubContext, id: &ProductId) -> HubResult<Product> {
    let products = hub.track(hub.cache.get_collection().await).await?;
    debug!("Looking up {} among {} products", id, products.len());
    products
        .iter()
        .find(|p| p.id.as_ref() == Some(id))
        .cloned()
        .ok_or_else(|| HubError::ProductNotFound(id.to_string()))
}

/// Copy the given flags into the form, leaving other fields as loaded
fn apply(form: &mut ProductForm, fields: ProductFields) {
    if let Some(title) = fields.title {
        form.title = title;
    }
    if let Some(price) = fields.price {
        form.price = price;
    }
    if let Some(url) = fields.image_url {
        form.image_url = url;
    }
    if let Some(url) = fields.affiliate_url {
        form.affiliate_url = url;
    }
}

/// Fill a blank form from flags, prompting for anything missing
async fn fill_for_create(
    hub: &HubContext,
    form: &mut ProductForm,
    fields: ProductFields,
) -> HubResult<()> {
    form.title = or_prompt(hub, fields.title, "Title:", "--title").await?;
    form.price = or_prompt(hub, fields.price, "Price:", "--price").await?;
    form.image_url = or_prompt(hub, fields.image_url, "Image URL:", "--image-url").await?;
    form.affiliate_url =
        or_prompt(hub, fields.affiliate_url, "Amazon URL:", "--affiliate-url").await?;
    Ok(())
}

async fn or_prompt(
    hub: &HubContext,
    value: Option<String>,
    message: &str,
    flag: &str,
) -> HubResult<String> {
    match value {
        Some(value) => Ok(value),
        None => ui::input(&hub.ui, message, flag).await,
    }
}
