//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the durable store behind `AppState`; handlers
//! lock it, mutate synchronously, and render fragments. Mutating responses
//! carry an `HX-Trigger: cart-updated` header so the count badge refreshes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use boardhouse_core::{Cart, CartItem, Price, ProductId};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Display-layer tax rate (8%), applied when rendering totals only.
fn tax_rate() -> Decimal {
    Decimal::new(8, 2)
}

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i32(),
            name: item.name.clone(),
            description: item.description.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

/// Cart display data for templates.
///
/// Subtotal, tax, and total are presentation-layer values rounded to cents
/// at format time; the cart's own total is kept unrounded.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u64,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let subtotal = cart.total_price().amount();
        let tax = subtotal * tax_rate();
        let total = subtotal + tax;

        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            item_count: cart.total_items(),
            subtotal: Price::new(subtotal).to_string(),
            tax: Price::new(tax).to_string(),
            total: Price::new(total).to_string(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = CartView::from(state.cart().cart());
    CartShowTemplate { cart }
}

/// Add item to cart (HTMX).
///
/// Snapshots the product's display fields at add-time; a product already in
/// the cart gets its quantity incremented instead of a second row. Returns
/// the count badge with an HTMX trigger so other fragments refresh.
///
/// # Errors
///
/// Returns `AppError::NotFound` for an unknown product id and
/// `AppError::Api` when the product list cannot be fetched.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let quantity = form.quantity.unwrap_or(1);

    let product = state
        .api()
        .product(ProductId::new(form.product_id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let count = {
        let mut cart = state.cart();
        cart.add(&product, quantity);
        cart.total_items()
    };

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
///
/// A quantity of zero is absorbed as a no-op (the cart floors edits at 1),
/// as is an unknown product id.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Response {
    let cart = {
        let mut guard = state.cart();
        guard.update_quantity(ProductId::new(form.product_id), form.quantity);
        CartView::from(guard.cart())
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Remove item from cart (HTMX).
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let cart = {
        let mut guard = state.cart();
        guard.remove(ProductId::new(form.product_id));
        CartView::from(guard.cart())
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Empty the cart and drop its durable slot (HTMX).
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>) -> Response {
    let cart = {
        let mut guard = state.cart();
        guard.clear();
        CartView::from(guard.cart())
    };

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate { cart },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(state))]
pub async fn count(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.cart().total_items();
    CartCountTemplate { count }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boardhouse_core::Product;

    use super::*;

    fn cart_with(price: &str, quantity: u32) -> Cart {
        let mut cart = Cart::new();
        let product = Product {
            id: ProductId::new(1),
            name: "R1".to_owned(),
            description: String::new(),
            price: Price::new(price.parse().unwrap()),
            stock: 100,
        };
        cart.add(&product, quantity);
        cart
    }

    #[test]
    fn test_cart_view_totals_include_display_tax() {
        let view = CartView::from(&cart_with("10", 5));
        assert_eq!(view.item_count, 5);
        assert_eq!(view.subtotal, "$50.00");
        assert_eq!(view.tax, "$4.00");
        assert_eq!(view.total, "$54.00");
    }

    #[test]
    fn test_cart_view_rounds_tax_for_display_only() {
        // 24.99 * 0.08 = 1.9992, shown as $2.00
        let view = CartView::from(&cart_with("24.99", 1));
        assert_eq!(view.subtotal, "$24.99");
        assert_eq!(view.tax, "$2.00");
        assert_eq!(view.total, "$26.99");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert!(view.items.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.subtotal, "$0.00");
    }
}
