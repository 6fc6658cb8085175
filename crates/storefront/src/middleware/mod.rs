//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors, applied in `main`)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Authentication is an extractor ([`RequireAuth`]) rather than a layer,
//! applied per-route.

pub mod auth;
pub mod request_id;

pub use auth::{RequireAuth, clear_current_user, current_user, set_current_user};
pub use request_id::request_id_middleware;
