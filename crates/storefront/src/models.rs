//! Identity types and durable-storage key names.
//!
//! The login flow stores the token pair and username under their own slots
//! in the durable store; [`CurrentUser`] is reconstructed from those slots
//! per request by the auth extractors. The tokens themselves are opaque to
//! the storefront: written at login, dropped at logout, and only checked
//! for presence in between.

/// The logged-in user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Username as entered at login.
    pub username: String,
}

/// Durable-storage keys for authentication data.
///
/// The cart slot key lives in `boardhouse_core::CART_KEY`; these three are
/// owned by the login/registration flows.
pub mod storage_keys {
    /// Key for the API access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Key for the API refresh token.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// Key for the logged-in username.
    pub const USERNAME: &str = "username";
}
