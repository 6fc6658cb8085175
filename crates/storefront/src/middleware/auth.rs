//! Authentication extractors over the durable store.
//!
//! Login state is three slots in the durable store (access token, refresh
//! token, username); a request is authenticated when the token and username
//! slots are both present. There is no session layer: the store plays the
//! role browser local storage plays for the client-side rendition of this
//! flow.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use boardhouse_core::KeyValueStore;

use crate::api::TokenPair;
use crate::models::{CurrentUser, storage_keys};
use crate::state::AppState;
use crate::store::SharedStore;

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, redirects to the login page with the original
/// path as the post-login destination.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection returned when authentication is required but absent.
pub struct AuthRejection {
    next: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let target = format!("/auth/login?next={}", urlencoding::encode(&self.next));
        Redirect::to(&target).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        current_user(state).map(Self).ok_or_else(|| {
            // parts.uri is stripped inside nested routers; the original
            // request URI lives in the OriginalUri extension.
            let next = parts.extensions.get::<OriginalUri>().map_or_else(
                || parts.uri.path().to_owned(),
                |original| original.path().to_owned(),
            );
            AuthRejection { next }
        })
    }
}

/// Read the current user from the durable store, if logged in.
///
/// A username without an access token is not a login; both slots must be
/// present.
#[must_use]
pub fn current_user(state: &AppState) -> Option<CurrentUser> {
    let store = state.store();
    let username = store.get(storage_keys::USERNAME)?;
    store.get(storage_keys::ACCESS_TOKEN)?;
    Some(CurrentUser { username })
}

/// Persist a successful login: token pair and username into their slots.
pub fn set_current_user(store: &mut SharedStore, username: &str, tokens: &TokenPair) {
    store.set(storage_keys::ACCESS_TOKEN, tokens.access.clone());
    store.set(storage_keys::REFRESH_TOKEN, tokens.refresh.clone());
    store.set(storage_keys::USERNAME, username.to_owned());
}

/// Clear login state: drop all three auth slots.
pub fn clear_current_user(store: &mut SharedStore) {
    store.remove(storage_keys::ACCESS_TOKEN);
    store.remove(storage_keys::REFRESH_TOKEN);
    store.remove(storage_keys::USERNAME);
}
