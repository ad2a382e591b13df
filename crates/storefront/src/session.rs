//! Session wiring for the presentation layer.
//!
//! [`ShopSession`] is constructed once at startup: it hydrates the cart from
//! storage immediately, and the catalog is fetched separately. The catalog
//! fetch future does not borrow the session, so cart operations remain
//! available while it is pending.

use std::future::Future;

use tracing::info;

use shopfront_core::ProductId;

use crate::cart::{AddOutcome, CartStore};
use crate::catalog::{Catalog, CatalogClient, CatalogLoad};
use crate::config::ShopfrontConfig;
use crate::error::Result;
use crate::persistence::{CartPersistence, FileStore, KeyValueStore};
use crate::views::{CartView, CatalogView};

/// Catalog and cart for one shopper session.
pub struct ShopSession<S> {
    catalog_client: CatalogClient,
    catalog: Option<CatalogLoad>,
    cart: CartStore<S>,
}

impl ShopSession<FileStore> {
    /// Build a session from configuration, storing the cart under
    /// `config.storage_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog HTTP client cannot be built.
    pub fn from_config(config: &ShopfrontConfig) -> Result<Self> {
        let client = CatalogClient::new(&config.catalog)?;
        Ok(Self::start(client, FileStore::new(&config.storage_dir)))
    }
}

impl<S: KeyValueStore> ShopSession<S> {
    /// Hydrate the cart from `store`. The catalog starts out loading.
    #[must_use]
    pub fn start(catalog_client: CatalogClient, store: S) -> Self {
        let cart = CartStore::hydrate(CartPersistence::new(store));
        info!(item_count = cart.item_count(), "Session started");
        Self {
            catalog_client,
            catalog: None,
            cart,
        }
    }

    /// Future fetching the catalog, independent of the session borrow.
    ///
    /// Pass the result to [`ShopSession::install_catalog`].
    pub fn fetch_catalog(&self) -> impl Future<Output = CatalogLoad> + Send + 'static {
        let client = self.catalog_client.clone();
        async move { client.load().await }
    }

    /// Make a finished load the session catalog.
    pub fn install_catalog(&mut self, load: CatalogLoad) -> &CatalogLoad {
        self.catalog.insert(load)
    }

    /// Fetch and install the catalog in one step.
    pub async fn refresh_catalog(&mut self) -> &CatalogLoad {
        let load = self.fetch_catalog().await;
        self.install_catalog(load)
    }

    /// The installed catalog load, or `None` while still loading.
    #[must_use]
    pub const fn catalog_load(&self) -> Option<&CatalogLoad> {
        self.catalog.as_ref()
    }

    /// Add a product from the installed catalog.
    ///
    /// Before the catalog is installed every id is unknown.
    pub fn add_item(&mut self, id: &ProductId) -> AddOutcome {
        match &self.catalog {
            Some(load) => self.cart.add_item(load.catalog(), id),
            None => self.cart.add_item(&Catalog::default(), id),
        }
    }

    /// The cart store.
    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// The cart store, for mutations other than adding.
    pub fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// Catalog display state, optionally filtered by category.
    #[must_use]
    pub fn catalog_view(&self, category: Option<&str>) -> CatalogView {
        self.catalog
            .as_ref()
            .map_or(CatalogView::Loading, |load| {
                CatalogView::from_load(load, category)
            })
    }

    /// Cart display state.
    #[must_use]
    pub fn cart_view(&self) -> CartView {
        CartView::from(self.cart.state())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{Price, Product, ProductListing};

    use super::*;
    use crate::catalog::CatalogError;
    use crate::config::CatalogConfig;
    use crate::persistence::MemoryStore;

    fn client() -> CatalogClient {
        CatalogClient::new(&CatalogConfig::for_url(
            "http://127.0.0.1:9/products".parse().unwrap(),
        ))
        .unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![Product::from_listing(
            ProductListing {
                id: ProductId::from("1"),
                title: "Headphones".to_string(),
                price: Price::new("19.99".parse().unwrap()).unwrap(),
                description: None,
                category: "electronics".to_string(),
                image: "https://img.example/1.jpg".to_string(),
            },
            10,
        )
        .unwrap()])
    }

    #[test]
    fn test_catalog_starts_loading() {
        let session = ShopSession::start(client(), MemoryStore::new());
        assert_eq!(session.catalog_view(None), CatalogView::Loading);
        assert!(session.catalog_load().is_none());
    }

    #[test]
    fn test_add_before_catalog_is_ignored() {
        let mut session = ShopSession::start(client(), MemoryStore::new());
        assert_eq!(
            session.add_item(&ProductId::from("1")),
            AddOutcome::UnknownProduct
        );
    }

    #[test]
    fn test_add_after_catalog_installed() {
        let mut session = ShopSession::start(client(), MemoryStore::new());
        session.install_catalog(CatalogLoad::loaded(catalog()));

        assert_eq!(session.add_item(&ProductId::from("1")), AddOutcome::Added);
        assert_eq!(session.cart_view().total, "$19.99");
    }

    #[test]
    fn test_failed_catalog_keeps_cart_usable() {
        let store = MemoryStore::new();
        {
            let mut session = ShopSession::start(client(), store.clone());
            session.install_catalog(CatalogLoad::loaded(catalog()));
            session.add_item(&ProductId::from("1"));
        }

        let mut session = ShopSession::start(client(), store);
        session.install_catalog(CatalogLoad::failed(CatalogError::Timeout));
        assert!(matches!(
            session.catalog_view(None),
            CatalogView::Error { .. }
        ));

        session.cart_mut().set_quantity(&ProductId::from("1"), 2);
        assert_eq!(session.cart_view().total, "$39.98");
    }
}
