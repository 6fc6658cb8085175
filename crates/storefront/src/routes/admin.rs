//! Admin login route handlers.
//!
//! The admin console itself is a separate concern; this page only
//! authenticates against the same auth API and stores the resulting token
//! pair, then sends the operator back to the storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::middleware::set_current_user;
use crate::state::AppState;

/// Admin login form data.
#[derive(Debug, Deserialize)]
pub struct AdminLoginForm {
    pub username: String,
    pub password: String,
}

/// Admin login page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/login.html")]
pub struct AdminLoginTemplate {
    pub error: Option<String>,
}

/// Display the admin login page.
pub async fn login_page() -> impl IntoResponse {
    AdminLoginTemplate { error: None }
}

/// Handle admin login form submission.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<AdminLoginForm>) -> Response {
    match state.api().login(&form.username, &form.password).await {
        Ok(tokens) => {
            let mut store = state.store();
            set_current_user(&mut store, &form.username, &tokens);
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            AdminLoginTemplate {
                error: Some("Invalid username or password".to_owned()),
            }
            .into_response()
        }
    }
}
