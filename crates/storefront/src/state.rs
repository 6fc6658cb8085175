//! Application state shared across handlers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use boardhouse_core::CartStore;

use crate::api::ApiClient;
use crate::config::ShopConfig;
use crate::store::{FileStore, SharedStore};

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to open durable store: {0}")]
    Store(#[from] std::io::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// shop API client, the durable store, and the cart.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ShopConfig,
    api: ApiClient,
    store: SharedStore,
    cart: Mutex<CartStore<SharedStore>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Opens the durable store under the configured data directory and loads
    /// the persisted cart (an absent or corrupt slot loads as empty).
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn new(config: ShopConfig) -> Result<Self, StateError> {
        let api = ApiClient::new(&config);
        let store = SharedStore::new(FileStore::open(&config.data_dir)?);

        let mut cart = CartStore::load(store.clone());
        cart.subscribe(|cart| {
            tracing::debug!(
                items = cart.total_items(),
                total = %cart.total_price(),
                "cart updated"
            );
        });

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                store,
                cart: Mutex::new(cart),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the shop API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a handle to the durable store (auth slots live here).
    #[must_use]
    pub fn store(&self) -> SharedStore {
        self.inner.store.clone()
    }

    /// Lock the cart store.
    ///
    /// Cart operations are synchronous and non-blocking; the guard must not
    /// be held across await points. Poisoning is recovered since the
    /// write-through slot, not the mutex, is the source of truth.
    pub fn cart(&self) -> MutexGuard<'_, CartStore<SharedStore>> {
        self.inner.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
