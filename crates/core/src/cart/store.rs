//! Write-through cart persistence.

use crate::cart::Cart;
use crate::kv::KeyValueStore;
use crate::types::{Price, Product, ProductId};

/// Durable-slot key holding the serialized cart.
pub const CART_KEY: &str = "cart";

type Listener = Box<dyn Fn(&Cart) + Send + Sync>;

/// Single source of truth for the cart, backed by a durable slot.
///
/// Every mutation synchronously rewrites the slot with the full cart
/// contents (or removes it, for [`clear`](Self::clear)) before notifying
/// subscribers, so the persisted and in-memory representations are
/// identical after every call. None of the operations can fail: invalid
/// inputs are no-ops and storage failures are absorbed by the
/// [`KeyValueStore`] implementation.
///
/// Mutation notifications go through an explicit subscribe/notify contract
/// rather than any UI framework, so callers decide what a cart change
/// means (re-render a fragment, log, update a badge).
pub struct CartStore<S> {
    slot: S,
    cart: Cart,
    listeners: Vec<Listener>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the cart from the slot.
    ///
    /// An absent slot yields an empty cart; so does an undecodable one
    /// (corruption is treated as "no cart", never an error).
    pub fn load(slot: S) -> Self {
        let cart = Cart::decode_or_default(slot.get(CART_KEY).as_deref());
        Self {
            slot,
            cart,
            listeners: Vec::new(),
        }
    }

    /// The current cart contents.
    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Register a listener invoked after every mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&Cart) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add `quantity` of a product (merging with an existing row).
    pub fn add(&mut self, product: &Product, quantity: u32) {
        self.cart.add(product, quantity);
        self.persist();
        self.notify();
    }

    /// Replace the quantity of the item with `id`.
    ///
    /// A quantity below 1 leaves both the cart and the slot untouched; an
    /// unknown id rewrites the slot with identical contents.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.cart.update_quantity(id, quantity);
        self.persist();
        self.notify();
    }

    /// Drop the item with `id`, if present.
    pub fn remove(&mut self, id: ProductId) {
        self.cart.remove(id);
        self.persist();
        self.notify();
    }

    /// Empty the cart and drop the durable slot entirely.
    pub fn clear(&mut self) {
        self.cart.clear();
        self.slot.remove(CART_KEY);
        self.notify();
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    /// Sum of price x quantity, unrounded.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }

    fn persist(&mut self) {
        let encoded = self.cart.encode();
        self.slot.set(CART_KEY, encoded);
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.cart);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::kv::MemoryStore;

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Part {id}"),
            description: String::new(),
            price: Price::new(price.parse().unwrap()),
            stock: 10,
        }
    }

    #[test]
    fn test_load_from_empty_slot() {
        let store = CartStore::load(MemoryStore::new());
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_mutations_write_through() {
        let mut slot = MemoryStore::new();
        let mut store = CartStore::load(&mut slot);
        store.add(&product(1, "24.99"), 1);
        store.add(&product(1, "24.99"), 1);
        drop(store);

        // The slot holds the full cart after every mutation.
        let persisted = slot.get(CART_KEY).unwrap();
        let reloaded = Cart::decode(&persisted).unwrap();
        assert_eq!(reloaded.total_items(), 2);
        assert_eq!(reloaded.items().len(), 1);
    }

    #[test]
    fn test_roundtrip_through_slot() {
        let mut slot = MemoryStore::new();
        let uno = product(1, "24.99");

        let mut store = CartStore::load(&mut slot);
        store.add(&uno, 2);
        drop(store);

        let reloaded = CartStore::load(&mut slot);
        assert_eq!(reloaded.cart().items().len(), 1);
        let item = &reloaded.cart().items()[0];
        assert_eq!(item.id, uno.id);
        assert_eq!(item.name, uno.name);
        assert_eq!(item.price, uno.price);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_corrupt_slot_loads_empty() {
        let mut slot = MemoryStore::new();
        slot.set(CART_KEY, "definitely-not-json".to_owned());

        let store = CartStore::load(&mut slot);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_clear_removes_slot() {
        let mut slot = MemoryStore::new();
        let mut store = CartStore::load(&mut slot);
        store.add(&product(1, "10"), 1);
        store.clear();
        assert!(store.cart().is_empty());
        drop(store);

        assert_eq!(slot.get(CART_KEY), None);
    }

    #[test]
    fn test_update_quantity_zero_skips_persist() {
        let mut slot = MemoryStore::new();
        let mut store = CartStore::load(&mut slot);
        store.add(&product(1, "10"), 1);
        store.clear();

        // The floored update must not resurrect the slot.
        store.update_quantity(ProductId::new(1), 0);
        drop(store);
        assert_eq!(slot.get(CART_KEY), None);
    }

    #[test]
    fn test_subscribers_fire_on_every_mutation() {
        let fired = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&fired);

        let mut store = CartStore::load(MemoryStore::new());
        store.subscribe(move |_cart| {
            observed.fetch_add(1, Ordering::SeqCst);
        });

        let uno = product(1, "24.99");
        store.add(&uno, 1);
        store.update_quantity(uno.id, 5);
        store.remove(uno.id);
        store.clear();

        assert_eq!(fired.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_totals_worked_example() {
        let mut store = CartStore::load(MemoryStore::new());
        let r1 = product(1, "10");

        store.add(&r1, 1);
        assert_eq!(store.total_items(), 1);
        assert_eq!(store.total_price().to_string(), "$10.00");

        store.add(&r1, 1);
        assert_eq!(store.total_items(), 2);
        assert_eq!(store.total_price().to_string(), "$20.00");

        store.update_quantity(r1.id, 5);
        assert_eq!(store.total_items(), 5);
        assert_eq!(store.total_price().to_string(), "$50.00");

        store.remove(r1.id);
        assert_eq!(store.total_items(), 0);
    }
}
