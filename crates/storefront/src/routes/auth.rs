//! Authentication route handlers.
//!
//! Login and registration delegate to the remote auth API; the resulting
//! token pair and username are stored under their own durable-store slots.
//! Failures are mapped to user-facing messages by HTTP status: 401 means
//! bad credentials, 5xx means the API is down, a 400 on registration
//! carries field conflicts, and anything else is a generic failure.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use boardhouse_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::api::ApiError;
use crate::filters;
use crate::middleware::{clear_current_user, set_current_user};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Query parameters for the login page.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub success: Option<String>,
    pub next: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
    pub next: String,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Helpers
// =============================================================================

/// Only allow same-site paths as post-login destinations.
fn sanitize_next(next: Option<String>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => String::from("/account"),
    }
}

/// Map a login failure to the storefront's user-facing message.
fn login_error_message(error: &ApiError) -> String {
    match error.status() {
        Some(401) => "Invalid username or password. Please try again.".to_owned(),
        Some(status) if status >= 500 => "Server error. Please try again later.".to_owned(),
        _ => "Login failed. Please check your connection and try again.".to_owned(),
    }
}

/// Map a registration failure to the storefront's user-facing message.
///
/// A 400 carries field errors keyed by field name; the field picks the
/// message.
fn register_error_message(error: &ApiError) -> String {
    match error.status() {
        Some(400) => {
            let body: serde_json::Value = error
                .body()
                .and_then(|raw| serde_json::from_str(raw).ok())
                .unwrap_or_default();
            if body.get("username").is_some() {
                "Username already exists. Please choose a different one.".to_owned()
            } else if body.get("email").is_some() {
                "Email already registered. Please use a different email.".to_owned()
            } else {
                "Registration failed. Please check your information.".to_owned()
            }
        }
        Some(status) if status >= 500 => "Server error. Please try again later.".to_owned(),
        _ => "Registration failed. Please check your connection and try again.".to_owned(),
    }
}

/// Validate the registration form before calling the API.
///
/// Returns the first problem found, in the order the form shows fields.
fn validate_registration(form: &RegisterForm) -> Option<String> {
    if form.password != form.confirm_password {
        return Some("Passwords do not match".to_owned());
    }
    if form.password.len() < 6 {
        return Some("Password must be at least 6 characters long".to_owned());
    }
    if Email::parse(&form.email).is_err() {
        return Some("Please enter a valid email address".to_owned());
    }
    None
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let success = match query.success.as_deref() {
        Some("registered") => Some("Registration successful! You can now sign in.".to_owned()),
        _ => None,
    };

    LoginTemplate {
        error: None,
        success,
        next: sanitize_next(query.next),
    }
}

/// Handle login form submission.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let next = sanitize_next(form.next.clone());

    match state.api().login(&form.username, &form.password).await {
        Ok(tokens) => {
            let mut store = state.store();
            set_current_user(&mut store, &form.username, &tokens);
            Redirect::to(&next).into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            LoginTemplate {
                error: Some(login_error_message(&e)),
                success: None,
                next,
            }
            .into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page() -> impl IntoResponse {
    RegisterTemplate { error: None }
}

/// Handle registration form submission.
#[instrument(skip(state, form))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    if let Some(error) = validate_registration(&form) {
        return RegisterTemplate { error: Some(error) }.into_response();
    }

    match state
        .api()
        .register(&form.username, &form.email, &form.password)
        .await
    {
        Ok(user) => {
            tracing::info!(username = %user.username, "account registered");
            Redirect::to("/auth/login?success=registered").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            RegisterTemplate {
                error: Some(register_error_message(&e)),
            }
            .into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout: drop the stored tokens and username.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> Redirect {
    let mut store = state.store();
    clear_current_user(&mut store);
    Redirect::to("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, message: &str) -> ApiError {
        ApiError::Api {
            status,
            message: message.to_owned(),
        }
    }

    #[test]
    fn test_sanitize_next_allows_local_paths() {
        assert_eq!(
            sanitize_next(Some("/account/orders".to_owned())),
            "/account/orders"
        );
    }

    #[test]
    fn test_sanitize_next_rejects_external_targets() {
        assert_eq!(sanitize_next(Some("https://evil.example".to_owned())), "/account");
        assert_eq!(sanitize_next(Some("//evil.example".to_owned())), "/account");
        assert_eq!(sanitize_next(None), "/account");
    }

    #[test]
    fn test_login_error_messages_by_status() {
        assert_eq!(
            login_error_message(&api_error(401, "no active account")),
            "Invalid username or password. Please try again."
        );
        assert_eq!(
            login_error_message(&api_error(503, "unavailable")),
            "Server error. Please try again later."
        );
        assert_eq!(
            login_error_message(&ApiError::Parse("bad json".to_owned())),
            "Login failed. Please check your connection and try again."
        );
    }

    #[test]
    fn test_register_error_messages_by_field() {
        assert_eq!(
            register_error_message(&api_error(400, r#"{"username": ["taken"]}"#)),
            "Username already exists. Please choose a different one."
        );
        assert_eq!(
            register_error_message(&api_error(400, r#"{"email": ["taken"]}"#)),
            "Email already registered. Please use a different email."
        );
        assert_eq!(
            register_error_message(&api_error(400, "not json")),
            "Registration failed. Please check your information."
        );
        assert_eq!(
            register_error_message(&api_error(500, "boom")),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn test_validate_registration() {
        let form = RegisterForm {
            username: "demo".to_owned(),
            email: "demo@example.com".to_owned(),
            password: "hunter22".to_owned(),
            confirm_password: "hunter22".to_owned(),
        };
        assert_eq!(validate_registration(&form), None);

        let mismatched = RegisterForm {
            confirm_password: "other".to_owned(),
            ..form_clone(&form)
        };
        assert_eq!(
            validate_registration(&mismatched).as_deref(),
            Some("Passwords do not match")
        );

        let short = RegisterForm {
            password: "abc".to_owned(),
            confirm_password: "abc".to_owned(),
            ..form_clone(&form)
        };
        assert_eq!(
            validate_registration(&short).as_deref(),
            Some("Password must be at least 6 characters long")
        );

        let bad_email = RegisterForm {
            email: "not-an-email".to_owned(),
            ..form_clone(&form)
        };
        assert_eq!(
            validate_registration(&bad_email).as_deref(),
            Some("Please enter a valid email address")
        );
    }

    fn form_clone(form: &RegisterForm) -> RegisterForm {
        RegisterForm {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password.clone(),
            confirm_password: form.confirm_password.clone(),
        }
    }
}
