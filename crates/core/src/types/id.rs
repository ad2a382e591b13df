//! Opaque product identifiers.
//!
//! Upstream catalogs hand out ids as either JSON numbers or strings, and the
//! durable cart slot keys line items by the stringified id. [`ProductId`]
//! normalizes both forms to a string so the two never disagree.

use core::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Type-safe product identifier.
///
/// Created from the upstream catalog payload and used as the cart key.
///
/// # Example
///
/// ```rust
/// # use shopfront_core::ProductId;
/// let from_number: ProductId = serde_json::from_str("9").unwrap();
/// let from_string: ProductId = serde_json::from_str("\"9\"").unwrap();
///
/// assert_eq!(from_number, from_string);
/// assert_eq!(from_number.as_str(), "9");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new ID from its string form.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl core::str::FromStr for ProductId {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

struct ProductIdVisitor;

impl Visitor<'_> for ProductIdVisitor {
    type Value = ProductId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a product id as a string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(v), &self));
        }
        Ok(ProductId::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        if v.is_empty() {
            return Err(E::invalid_value(de::Unexpected::Str(&v), &self));
        }
        Ok(ProductId(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ProductId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ProductId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ProductIdVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_string_ids_match() {
        let a: ProductId = serde_json::from_str("14").unwrap();
        let b: ProductId = serde_json::from_str("\"14\"").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_as_string() {
        let id = ProductId::from(3_i64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"3\"");
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
    }

    #[test]
    fn test_fractional_id_rejected() {
        assert!(serde_json::from_str::<ProductId>("1.5").is_err());
    }

    #[test]
    fn test_id_usable_as_map_key() {
        let map: std::collections::BTreeMap<ProductId, u32> =
            serde_json::from_str(r#"{"9": 1, "10": 2}"#).unwrap();
        assert_eq!(map.get(&ProductId::from("10")), Some(&2));
    }
}
