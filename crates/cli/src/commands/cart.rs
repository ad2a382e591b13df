//! Cart commands.
//!
//! The cart lives in `SHOPFRONT_STORAGE_DIR` and survives between runs.
//!
//! # Usage
//!
//! ```bash
//! shopfront cart add 9
//! shopfront cart set 9 3
//! shopfront cart set 9 0      # removes the line
//! shopfront cart remove 9
//! shopfront cart clear
//! shopfront cart show --json
//! shopfront checkout
//! ```

use serde::Serialize;

use shopfront_core::ProductId;
use shopfront_storefront::views::{
    ADDED_FEEDBACK, CATALOG_ERROR_MESSAGE, CartView, CheckoutConfirmationView,
};
use shopfront_storefront::{
    AddOutcome, Error, KeyValueStore, Result, ShopSession, ShopfrontConfig,
};

use super::Output;

type CommandResult = std::result::Result<Output, Box<dyn std::error::Error>>;

/// Show cart contents and total.
pub fn show(config: &ShopfrontConfig) -> CommandResult {
    let session = ShopSession::from_config(config)?;
    Ok(render_cart(&session)?)
}

/// Add one unit of a catalog product.
pub async fn add(config: &ShopfrontConfig, id: &str) -> CommandResult {
    let mut session = ShopSession::from_config(config)?;
    session.refresh_catalog().await;
    Ok(add_to(&mut session, &ProductId::from(id))?)
}

/// Remove a product line.
pub fn remove(config: &ShopfrontConfig, id: &str) -> CommandResult {
    let mut session = ShopSession::from_config(config)?;
    session.cart_mut().remove_item(&ProductId::from(id));
    Ok(render_cart(&session)?)
}

/// Set a line's quantity.
pub fn set(config: &ShopfrontConfig, id: &str, quantity: i64) -> CommandResult {
    let mut session = ShopSession::from_config(config)?;
    session
        .cart_mut()
        .set_quantity(&ProductId::from(id), quantity);
    Ok(render_cart(&session)?)
}

/// Empty the cart.
pub fn clear(config: &ShopfrontConfig) -> CommandResult {
    let mut session = ShopSession::from_config(config)?;
    session.cart_mut().clear();
    Ok(render_cart(&session)?)
}

/// Place the order and empty the cart.
pub fn checkout(config: &ShopfrontConfig) -> CommandResult {
    let mut session = ShopSession::from_config(config)?;
    Ok(checkout_from(&mut session)?)
}

#[derive(Serialize)]
struct AddView {
    id: String,
    outcome: &'static str,
    message: String,
    cart: CartView,
}

pub fn add_to<S: KeyValueStore>(session: &mut ShopSession<S>, id: &ProductId) -> Result<Output> {
    let outcome = session.add_item(id);

    let (label, message) = match outcome {
        AddOutcome::Added => ("added", ADDED_FEEDBACK.to_string()),
        AddOutcome::Incremented { .. } => ("incremented", ADDED_FEEDBACK.to_string()),
        AddOutcome::UnknownProduct => {
            let catalog_failed = session.catalog_load().is_some_and(|load| load.is_error());
            let message = if catalog_failed {
                CATALOG_ERROR_MESSAGE.to_string()
            } else {
                format!("No product with id {id}")
            };
            ("unknown_product", message)
        }
        AddOutcome::Refused => (
            "refused",
            "Cart total is too large to add this item".to_string(),
        ),
    };

    let view = AddView {
        id: id.to_string(),
        outcome: label,
        message: message.clone(),
        cart: session.cart_view(),
    };

    let mut lines = vec![message];
    lines.extend(cart_lines(&view.cart));
    Output::new(lines, &view)
}

pub fn render_cart<S: KeyValueStore>(session: &ShopSession<S>) -> Result<Output> {
    let view = session.cart_view();
    Output::new(cart_lines(&view), &view)
}

pub fn checkout_from<S: KeyValueStore>(session: &mut ShopSession<S>) -> Result<Output> {
    let summary = session
        .cart_mut()
        .checkout()
        .ok_or_else(|| Error::BadRequest("checkout is disabled: cart is empty".to_string()))?;

    let view = CheckoutConfirmationView::from(&summary);
    let lines = vec![
        view.headline.clone(),
        view.detail.clone(),
        view.footer.clone(),
        format!("Order reference: {}", view.order_reference),
    ];
    Output::new(lines, &view)
}

fn cart_lines(view: &CartView) -> Vec<String> {
    if view.items.is_empty() {
        return vec!["Your cart is empty".to_string(), format!("Total: {}", view.total)];
    }

    let mut lines: Vec<String> = view
        .items
        .iter()
        .map(|item| {
            format!(
                "[{}] {} x{} @ {} = {}",
                item.id, item.title, item.quantity, item.price, item.line_price
            )
        })
        .collect();
    lines.push(format!("Items: {}", view.item_count));
    lines.push(format!("Total: {}", view.total));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Price, Product, ProductListing};
    use shopfront_storefront::config::CatalogConfig;
    use shopfront_storefront::{Catalog, CatalogClient, CatalogError, CatalogLoad, MemoryStore};

    use super::*;

    fn session() -> ShopSession<MemoryStore> {
        let client = CatalogClient::new(&CatalogConfig::for_url(
            "http://127.0.0.1:9/products".parse().unwrap(),
        ))
        .unwrap();
        ShopSession::start(client, MemoryStore::new())
    }

    fn loaded_session() -> ShopSession<MemoryStore> {
        let mut session = session();
        session.install_catalog(CatalogLoad::loaded(Catalog::new(vec![
            Product::from_listing(
                ProductListing {
                    id: ProductId::from("b"),
                    title: "Cable".to_string(),
                    price: Price::new("5.50".parse().unwrap()).unwrap(),
                    description: None,
                    category: "electronics".to_string(),
                    image: String::new(),
                },
                10,
            )
            .unwrap(),
        ])));
        session
    }

    #[test]
    fn test_empty_cart() {
        let output = render_cart(&session()).unwrap();
        assert_eq!(output.lines, vec!["Your cart is empty", "Total: $0.00"]);
        assert_eq!(output.json["checkout_enabled"], false);
    }

    #[test]
    fn test_add_then_show() {
        let mut session = loaded_session();
        add_to(&mut session, &ProductId::from("b")).unwrap();
        let output = add_to(&mut session, &ProductId::from("b")).unwrap();

        assert_eq!(output.json["outcome"], "incremented");
        assert_eq!(
            output.lines,
            vec![
                "Item added to cart!",
                "[b] Cable x2 @ $5.50 = $11.00",
                "Items: 2",
                "Total: $11.00",
            ]
        );
    }

    #[test]
    fn test_add_unknown_product() {
        let mut session = loaded_session();
        let output = add_to(&mut session, &ProductId::from("zzz")).unwrap();
        assert_eq!(output.json["outcome"], "unknown_product");
        assert_eq!(output.lines.first().unwrap(), "No product with id zzz");
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_add_with_failed_catalog() {
        let mut session = session();
        session.install_catalog(CatalogLoad::failed(CatalogError::Timeout));
        let output = add_to(&mut session, &ProductId::from("b")).unwrap();
        assert_eq!(output.lines.first().unwrap(), CATALOG_ERROR_MESSAGE);
    }

    #[test]
    fn test_checkout_clears_cart() {
        let mut session = loaded_session();
        add_to(&mut session, &ProductId::from("b")).unwrap();

        let output = checkout_from(&mut session).unwrap();
        assert_eq!(output.lines.get(1).unwrap(), "1 item(s) - Total: $5.50");
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_checkout_empty_cart_is_rejected() {
        let mut session = session();
        assert!(matches!(
            checkout_from(&mut session),
            Err(Error::BadRequest(_))
        ));
    }
}
