//! Product model as served by the shop API.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// A product from `GET /products/`.
///
/// `description` and `stock` are optional on the wire and default to empty
/// and zero respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_shape() {
        let json = r#"{"id": 1, "name": "Arduino Uno R3", "description": "AVR dev board", "price": "24.99", "stock": 12}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.name, "Arduino Uno R3");
        assert_eq!(product.price.to_string(), "$24.99");
        assert_eq!(product.stock, 12);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{"id": 2, "name": "ESP32", "price": "29.99"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.description.is_empty());
        assert_eq!(product.stock, 0);
    }
}
