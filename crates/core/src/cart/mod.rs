//! Cart data model.
//!
//! A cart is an ordered sequence of line items, unique by product id, with
//! insertion order preserved. Quantities are always at least 1; mutations
//! that would violate that are absorbed as no-ops rather than reported.
//!
//! The persisted representation is a JSON array of [`CartItem`] - the same
//! shape for storage and memory, written whole on every mutation by
//! [`CartStore`].

mod store;

pub use store::{CART_KEY, CartStore};

use serde::{Deserialize, Serialize};

use crate::types::{Price, Product, ProductId};

/// One row in the cart: a product snapshot plus the requested quantity.
///
/// `name`, `description`, `price`, and `stock` are copied from the product
/// at add-time and never refreshed, so a later catalog change does not
/// silently reprice an existing cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    pub quantity: u32,
}

impl CartItem {
    fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock: product.stock,
            quantity,
        }
    }

    /// Price times quantity for this row.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// An ordered collection of line items, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of a product.
    ///
    /// If the product is already in the cart its quantity increases;
    /// otherwise a new snapshot row is appended. A zero quantity is
    /// normalized to 1 so the quantity invariant holds for any input.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem::snapshot(product, quantity));
        }
    }

    /// Replace the quantity of the item with `id`.
    ///
    /// A quantity below 1 or an unknown id leaves the cart unchanged.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = quantity;
        }
    }

    /// Drop the item with `id`, if present.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|item| item.id != id);
    }

    /// Drop all items.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price x quantity over all items, unrounded.
    ///
    /// Presentation layers round for display; nothing here does.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Serialize to the persisted JSON-array form.
    #[must_use]
    pub fn encode(&self) -> String {
        // Plain data with string keys cannot fail to serialize.
        serde_json::to_string(&self.items).unwrap_or_else(|_| String::from("[]"))
    }

    /// Deserialize from the persisted JSON-array form.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error if `raw` is not a valid item array.
    pub fn decode(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Vec<CartItem>>(raw).map(|items| Self { items })
    }

    /// Decode a persisted value, treating corruption as "no cart".
    ///
    /// This is the recovery path for the durable slot: an absent or
    /// undecodable value yields an empty cart instead of an error.
    #[must_use]
    pub fn decode_or_default(raw: Option<&str>) -> Self {
        raw.and_then(|raw| Self::decode(raw).ok()).unwrap_or_default()
    }
}
