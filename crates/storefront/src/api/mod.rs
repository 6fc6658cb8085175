//! Remote shop API client (products and authentication).
//!
//! Plain JSON over `reqwest`. The product list is cached with `moka`
//! (5-minute TTL) since cart rows snapshot product fields at add-time
//! anyway; auth calls are never cached. Failures carry the HTTP status
//! where one was received so callers can map them to user-facing messages.

mod types;

pub use types::{RegisteredUser, TokenPair};

use std::sync::Arc;
use std::time::Duration;

use boardhouse_core::{Product, ProductId};
use moka::future::Cache;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ShopConfig;
use types::{LoginRequest, RegisterRequest};

/// Product list cache TTL.
const PRODUCTS_CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Cache key for the product list (the cache holds a single entry).
const PRODUCTS_CACHE_KEY: &str = "products";

/// Errors that can occur when calling the shop API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection refused, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// The HTTP status of the failure, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            Self::Parse(_) => None,
        }
    }

    /// The raw body of a non-success response, if any.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Client for the remote shop API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    products_cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl ApiClient {
    /// Create a new shop API client.
    #[must_use]
    pub fn new(config: &ShopConfig) -> Self {
        let products_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(PRODUCTS_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                products_cache,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Fetch the product list via `GET /products/` (cached).
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable body.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<Product>>, ApiError> {
        if let Some(products) = self.inner.products_cache.get(PRODUCTS_CACHE_KEY).await {
            debug!("product list served from cache");
            return Ok(products);
        }

        let products = Arc::new(self.fetch_products().await?);
        self.inner
            .products_cache
            .insert(PRODUCTS_CACHE_KEY, Arc::clone(&products))
            .await;
        Ok(products)
    }

    /// Look up one product by id from the (cached) product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn product(&self, id: ProductId) -> Result<Option<Product>, ApiError> {
        Ok(self
            .products()
            .await?
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.endpoint("/products/"))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Exchange credentials for a token pair via `POST /auth/login/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 401 for bad credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        self.post_json("/auth/login/", &LoginRequest { username, password })
            .await
    }

    /// Create an account via `POST /auth/register/`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 400 when the username or email is
    /// already taken (the body carries the field errors).
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RegisteredUser, ApiError> {
        self.post_json(
            "/auth/register/",
            &RegisterRequest {
                username,
                email,
                password,
            },
        )
        .await
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status() {
        let err = ApiError::Api {
            status: 401,
            message: "no active account".to_string(),
        };
        assert_eq!(err.status(), Some(401));

        let err = ApiError::Parse("bad json".to_string());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_api_error_body() {
        let err = ApiError::Api {
            status: 400,
            message: r#"{"username": ["taken"]}"#.to_string(),
        };
        assert_eq!(err.body(), Some(r#"{"username": ["taken"]}"#));

        let err = ApiError::Parse("bad json".to_string());
        assert_eq!(err.body(), None);
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - unavailable");
    }
}
