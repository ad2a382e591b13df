//! Integration tests for cart persistence.
//!
//! These tests write the stored slot directly to check that damaged data
//! degrades to an empty cart and that failed writes never lose the
//! in-memory cart.

#![allow(clippy::unwrap_used)]

use std::fs;

use shopfront_core::{Price, Product, ProductId, ProductListing};
use shopfront_storefront::persistence::CART_SLOT;
use shopfront_storefront::{
    AddOutcome, CartPersistence, CartStore, Catalog, FileStore, KeyValueStore, MemoryStore,
};

fn catalog() -> Catalog {
    Catalog::new(vec![Product::from_listing(
        ProductListing {
            id: ProductId::from("9"),
            title: "WD 2TB Elements Portable External Hard Drive".to_string(),
            price: Price::new("64".parse().unwrap()).unwrap(),
            description: None,
            category: "electronics".to_string(),
            image: "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg".to_string(),
        },
        20,
    )
    .unwrap()])
}

// =============================================================================
// Damaged Stored Data
// =============================================================================

#[test]
fn test_malformed_file_hydrates_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cart.json"), "{\"9\": {\"id\": ").unwrap();

    let store = CartStore::hydrate(CartPersistence::new(FileStore::new(dir.path())));
    assert!(store.is_empty());
    assert_eq!(store.total().to_string(), "$0.00");
}

#[test]
fn test_wrong_shape_hydrates_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    for payload in ["[1, 2, 3]", "\"cart\"", "{\"9\": {\"quantity\": 2}}", "null"] {
        fs::write(dir.path().join("cart.json"), payload).unwrap();
        let store = CartStore::hydrate(CartPersistence::new(FileStore::new(dir.path())));
        assert!(store.is_empty(), "payload {payload} should hydrate empty");
    }
}

#[test]
fn test_overflowing_total_hydrates_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");
    let huge = r#"{
        "9": {
            "id": "9",
            "title": "Vault",
            "price": "100000000000000000000",
            "category": "electronics",
            "image": "",
            "salePercentage": 20,
            "previousPrice": "120000000000000000000",
            "quantity": 4294967295
        }
    }"#;
    fs::write(&path, huge).unwrap();

    let store = CartStore::hydrate(CartPersistence::new(FileStore::new(dir.path())));
    assert!(store.is_empty());
    assert_eq!(store.total().to_string(), "$0.00");
    assert!(!path.exists());
}

#[test]
fn test_damaged_cart_is_replaced_on_next_write() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("cart.json"), "garbage").unwrap();

    let mut store = CartStore::hydrate(CartPersistence::new(FileStore::new(dir.path())));
    store.add_item(&catalog(), &ProductId::from("9"));

    let reloaded = CartPersistence::new(FileStore::new(dir.path()))
        .try_load()
        .unwrap();
    assert_eq!(reloaded.item_count(), 1);
}

#[test]
fn test_missing_directory_hydrates_empty_cart() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("not").join("yet");

    let mut store = CartStore::hydrate(CartPersistence::new(FileStore::new(&nested)));
    assert!(store.is_empty());

    // First write creates the directory
    store.add_item(&catalog(), &ProductId::from("9"));
    assert!(nested.join("cart.json").exists());
}

// =============================================================================
// Failed Writes
// =============================================================================

#[test]
fn test_unavailable_storage_keeps_memory_cart() {
    let backing = MemoryStore::new();
    let mut store = CartStore::hydrate(CartPersistence::new(backing.clone()));
    let catalog = catalog();

    store.add_item(&catalog, &ProductId::from("9"));
    let saved = backing.get(CART_SLOT).unwrap().unwrap();

    backing.set_available(false);
    assert_eq!(
        store.add_item(&catalog, &ProductId::from("9")),
        AddOutcome::Incremented { quantity: 2 }
    );
    assert_eq!(store.item_count(), 2);
    assert_eq!(store.total().to_string(), "$128.00");

    backing.set_available(true);
    assert_eq!(backing.get(CART_SLOT).unwrap().unwrap(), saved);
}

#[test]
fn test_quota_exceeded_keeps_memory_cart() {
    let backing = MemoryStore::with_quota(16);
    let mut store = CartStore::hydrate(CartPersistence::new(backing.clone()));

    assert_eq!(
        store.add_item(&catalog(), &ProductId::from("9")),
        AddOutcome::Added
    );
    assert_eq!(store.item_count(), 1);
    assert_eq!(backing.get(CART_SLOT).unwrap(), None);
}

// =============================================================================
// Stored Format
// =============================================================================

#[test]
fn test_stored_format_is_keyed_by_product_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = CartStore::hydrate(CartPersistence::new(FileStore::new(dir.path())));
    store.add_item(&catalog(), &ProductId::from("9"));
    store.set_quantity(&ProductId::from("9"), 3);

    let raw = fs::read_to_string(dir.path().join("cart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let line = &value["9"];
    assert_eq!(line["id"], "9");
    assert_eq!(line["quantity"], 3);
    assert_eq!(line["salePercentage"], 20);
    assert_eq!(line["price"], "64");
}

#[test]
fn test_legacy_browser_format_loads() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = r#"{
        "9": {
            "id": 9,
            "title": "WD 2TB Elements Portable External Hard Drive",
            "price": 64,
            "description": "USB 3.0 and USB 2.0 compatibility",
            "category": "electronics",
            "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg",
            "salepercentage": 25,
            "previousprice": 80,
            "quantity": 2
        }
    }"#;
    fs::write(dir.path().join("cart.json"), legacy).unwrap();

    let store = CartStore::hydrate(CartPersistence::new(FileStore::new(dir.path())));
    assert_eq!(store.item_count(), 2);
    assert_eq!(store.total().to_string(), "$128.00");

    let line = store.items().into_iter().next().unwrap();
    assert_eq!(line.product.sale_percentage, 25);
    assert_eq!(line.product.previous_price.to_string(), "$80.00");
}
