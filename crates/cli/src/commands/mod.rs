//! Command implementations.
//!
//! Each command returns an [`Output`] holding both the text rendering and the
//! JSON rendering; `main` picks one based on `--json`.

use serde::Serialize;

use shopfront_storefront::Result;

pub mod cart;
pub mod catalog;

/// Rendered command output.
#[derive(Debug)]
pub struct Output {
    pub lines: Vec<String>,
    pub json: serde_json::Value,
}

impl Output {
    /// Pair text lines with a serializable view.
    ///
    /// # Errors
    ///
    /// Returns an error if `view` cannot be represented as JSON.
    pub fn new(lines: Vec<String>, view: &impl Serialize) -> Result<Self> {
        Ok(Self {
            lines,
            json: serde_json::to_value(view)?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use shopfront_storefront::Error;

    use super::*;

    #[test]
    fn test_output_keeps_lines_and_json() {
        let output = Output::new(vec!["Total: $1.00".to_string()], &["a", "b"]).unwrap();
        assert_eq!(output.lines, vec!["Total: $1.00"]);
        assert_eq!(output.json, serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_unserializable_view_is_an_error() {
        // JSON object keys must be strings
        let view = BTreeMap::from([(vec![1_u8], 1_u8)]);
        assert!(matches!(
            Output::new(Vec::new(), &view),
            Err(Error::Serialization(_))
        ));
    }
}
