//! Checkout route handlers.
//!
//! Order placement is simulated: the form is validated, the cart cleared,
//! and the visitor redirected home with a confirmation banner. There is no
//! order API upstream.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Checkout form data. Card fields are collected but never validated or
/// stored.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub card_number: String,
    #[serde(default)]
    pub expiry_date: String,
    #[serde(default)]
    pub cvv: String,
}

impl CheckoutForm {
    /// Whether any required shipping/contact field is blank.
    fn missing_required(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.address,
            &self.city,
            &self.state,
            &self.zip_code,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub error: Option<String>,
}

/// Map an error code from the redirect back to user-facing text.
fn error_message(code: &str) -> String {
    match code {
        "missing_fields" => "Please fill in all required fields".to_owned(),
        "empty_cart" => "Your cart is empty".to_owned(),
        _ => "Checkout failed. Please try again.".to_owned(),
    }
}

/// Display the checkout page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let cart = CartView::from(state.cart().cart());
    let error = query.error.as_deref().map(error_message);
    CheckoutTemplate { cart, error }
}

/// Handle order placement.
///
/// Requires the shipping/contact fields and a non-empty cart; on success the
/// cart is cleared (dropping its durable slot) and the visitor lands on the
/// home page with a confirmation banner.
#[instrument(skip(state, form))]
pub async fn place_order(State(state): State<AppState>, Form(form): Form<CheckoutForm>) -> Redirect {
    if form.missing_required() {
        return Redirect::to("/checkout?error=missing_fields");
    }

    {
        let mut cart = state.cart();
        if cart.cart().is_empty() {
            return Redirect::to("/checkout?error=empty_cart");
        }

        tracing::info!(
            items = cart.total_items(),
            total = %cart.total_price(),
            "order placed"
        );
        cart.clear();
    }

    Redirect::to("/?order=placed")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> CheckoutForm {
        CheckoutForm {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            email: "ada@example.com".to_owned(),
            address: "1 Analytical Way".to_owned(),
            city: "London".to_owned(),
            state: "LDN".to_owned(),
            zip_code: "E1 6AN".to_owned(),
            card_number: String::new(),
            expiry_date: String::new(),
            cvv: String::new(),
        }
    }

    #[test]
    fn test_card_fields_are_optional() {
        assert!(!filled_form().missing_required());
    }

    #[test]
    fn test_blank_required_field_detected() {
        let mut form = filled_form();
        form.city = "   ".to_owned();
        assert!(form.missing_required());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            error_message("missing_fields"),
            "Please fill in all required fields"
        );
        assert_eq!(error_message("empty_cart"), "Your cart is empty");
        assert_eq!(error_message("other"), "Checkout failed. Please try again.");
    }
}
