//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! shopfront catalog
//! shopfront catalog --category electronics --json
//! shopfront categories
//! ```

use serde::Serialize;

use shopfront_storefront::views::CatalogView;
use shopfront_storefront::{CatalogLoad, KeyValueStore, Result, ShopSession, ShopfrontConfig};

use super::Output;

/// Fetch the catalog and list its products.
pub async fn list(
    config: &ShopfrontConfig,
    category: Option<&str>,
) -> std::result::Result<Output, Box<dyn std::error::Error>> {
    let mut session = ShopSession::from_config(config)?;
    session.refresh_catalog().await;
    Ok(render_list(&session, category)?)
}

/// Fetch the catalog and list its categories.
pub async fn categories(
    config: &ShopfrontConfig,
) -> std::result::Result<Output, Box<dyn std::error::Error>> {
    let mut session = ShopSession::from_config(config)?;
    let load = session.refresh_catalog().await;
    Ok(render_categories(load)?)
}

pub fn render_list<S: KeyValueStore>(
    session: &ShopSession<S>,
    category: Option<&str>,
) -> Result<Output> {
    let view = session.catalog_view(category);

    let lines = match &view {
        CatalogView::Loading => vec!["Loading products...".to_string()],
        CatalogView::Error { message } | CatalogView::Empty { message } => vec![message.clone()],
        CatalogView::Products { products } => products
            .iter()
            .map(|card| {
                format!(
                    "[{}] {} - {} (was {}, {}) {}",
                    card.id, card.title, card.price, card.previous_price, card.savings, card.badge
                )
            })
            .collect(),
    };

    Output::new(lines, &view)
}

#[derive(Serialize)]
struct CategoriesView<'a> {
    categories: Vec<&'a str>,
    error: Option<String>,
}

pub fn render_categories(load: &CatalogLoad) -> Result<Output> {
    let view = CategoriesView {
        categories: load.catalog().categories(),
        error: load.error().map(ToString::to_string),
    };

    let lines = if load.is_error() {
        vec![shopfront_storefront::views::CATALOG_ERROR_MESSAGE.to_string()]
    } else if view.categories.is_empty() {
        vec![shopfront_storefront::views::CATALOG_EMPTY_MESSAGE.to_string()]
    } else {
        view.categories.iter().map(ToString::to_string).collect()
    };

    Output::new(lines, &view)
}
