//! Catalog products.
//!
//! [`ProductListing`] mirrors the upstream payload. [`Product`] is the
//! session-scoped snapshot with the sale fields derived once at load time.

use core::ops::Range;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{Price, PriceError};

/// Range the decorative sale percentage is drawn from.
pub const SALE_PERCENTAGE_RANGE: Range<u8> = 10..40;

/// Markup applied to derive the struck-through "previous" price (1.3).
fn previous_price_factor() -> Decimal {
    Decimal::new(13, 1)
}

/// Share of the price shown as the "save" amount (0.3).
fn discount_factor() -> Decimal {
    Decimal::new(3, 1)
}

/// A product as returned by the remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListing {
    /// Upstream identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Long description, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category name (e.g., "electronics").
    #[serde(default)]
    pub category: String,
    /// Image URL.
    pub image: String,
}

/// A catalog product with derived display fields.
///
/// The derived fields are computed once in [`Product::from_listing`] and are
/// display-only: `sale_percentage` is decorative and never feeds pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Upstream identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Long description, when the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category name.
    #[serde(default)]
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Advertised "% OFF" badge value.
    #[serde(default, alias = "salepercentage")]
    pub sale_percentage: u8,
    /// `price * 1.3`, rounded to cents.
    #[serde(default, alias = "previousprice")]
    pub previous_price: Price,
    /// `price * 0.3`, rounded to cents.
    #[serde(default)]
    pub discount: Price,
}

impl Product {
    /// Build a product snapshot from an upstream listing.
    ///
    /// `sale_percentage` is supplied by the caller so this stays
    /// deterministic; it is clamped into [`SALE_PERCENTAGE_RANGE`].
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Overflow`] if a derived price is out of range.
    pub fn from_listing(listing: ProductListing, sale_percentage: u8) -> Result<Self, PriceError> {
        let sale_percentage = sale_percentage.clamp(
            SALE_PERCENTAGE_RANGE.start,
            SALE_PERCENTAGE_RANGE.end - 1,
        );
        let previous_price = listing.price.scaled(previous_price_factor())?;
        let discount = listing.price.scaled(discount_factor())?;

        Ok(Self {
            id: listing.id,
            title: listing.title,
            price: listing.price,
            description: listing.description,
            category: listing.category,
            image: listing.image,
            sale_percentage,
            previous_price,
            discount,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const FAKESTORE_ITEM: &str = r#"{
        "id": 9,
        "title": "WD 2TB Elements Portable External Hard Drive - USB 3.0",
        "price": 64,
        "description": "USB 3.0 and USB 2.0 compatibility",
        "category": "electronics",
        "image": "https://fakestoreapi.com/img/61IBBVJvSDL._AC_SY879_.jpg",
        "rating": { "rate": 3.3, "count": 203 }
    }"#;

    #[test]
    fn test_listing_parses_upstream_payload() {
        let listing: ProductListing = serde_json::from_str(FAKESTORE_ITEM).unwrap();
        assert_eq!(listing.id, ProductId::from("9"));
        assert_eq!(listing.category, "electronics");
        assert_eq!(listing.price.amount(), Decimal::from(64));
    }

    #[test]
    fn test_listing_missing_price_rejected() {
        let result = serde_json::from_str::<ProductListing>(
            r#"{"id": 1, "title": "x", "image": "y"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_from_listing_derives_sale_fields() {
        let listing: ProductListing = serde_json::from_str(FAKESTORE_ITEM).unwrap();
        let product = Product::from_listing(listing, 25).unwrap();

        assert_eq!(product.sale_percentage, 25);
        assert_eq!(product.previous_price.to_string(), "$83.20");
        assert_eq!(product.discount.to_string(), "$19.20");
    }

    #[test]
    fn test_from_listing_clamps_sale_percentage() {
        let listing: ProductListing = serde_json::from_str(FAKESTORE_ITEM).unwrap();
        assert_eq!(Product::from_listing(listing.clone(), 0).unwrap().sale_percentage, 10);
        assert_eq!(Product::from_listing(listing, 99).unwrap().sale_percentage, 39);
    }

    #[test]
    fn test_from_listing_rejects_unrepresentable_markup() {
        let mut listing: ProductListing = serde_json::from_str(FAKESTORE_ITEM).unwrap();
        listing.price = Price::new("70000000000000000000000000000".parse().unwrap()).unwrap();
        assert_eq!(Product::from_listing(listing, 20), Err(PriceError::Overflow));
    }

    #[test]
    fn test_product_accepts_legacy_field_names() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": 9, "title": "Drive", "price": 64, "category": "electronics",
                "image": "img.jpg", "salepercentage": 12,
                "previousprice": "83.20", "discount": "19.20"
            }"#,
        )
        .unwrap();
        assert_eq!(product.sale_percentage, 12);
        assert_eq!(product.previous_price.to_string(), "$83.20");
    }
}
