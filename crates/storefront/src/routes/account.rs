//! Account route handlers (profile and order history).
//!
//! Both pages require a logged-in user; anonymous visitors are redirected
//! to the login page with the original path as the post-login destination.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAuth;

/// A line in an order.
#[derive(Clone)]
pub struct OrderLineView {
    pub name: String,
    pub quantity: u32,
    pub price: String,
}

/// An order in the history list.
#[derive(Clone)]
pub struct OrderView {
    pub number: String,
    pub date: String,
    pub status: String,
    pub total: String,
    pub lines: Vec<OrderLineView>,
}

/// Sample order history shown until an orders API exists upstream.
fn demo_orders() -> Vec<OrderView> {
    vec![
        OrderView {
            number: "ORD-001".to_string(),
            date: "2024-01-15".to_string(),
            status: "Delivered".to_string(),
            total: "$299.97".to_string(),
            lines: vec![
                OrderLineView {
                    name: "Arduino Uno R3".to_string(),
                    quantity: 2,
                    price: "$24.99".to_string(),
                },
                OrderLineView {
                    name: "Raspberry Pi 4 Model B".to_string(),
                    quantity: 1,
                    price: "$249.99".to_string(),
                },
            ],
        },
        OrderView {
            number: "ORD-002".to_string(),
            date: "2024-01-10".to_string(),
            status: "Shipped".to_string(),
            total: "$89.97".to_string(),
            lines: vec![OrderLineView {
                name: "ESP32 Development Board".to_string(),
                quantity: 3,
                price: "$29.99".to_string(),
            }],
        },
    ]
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub username: String,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub username: String,
    pub orders: Vec<OrderView>,
}

/// Display the profile page.
#[instrument(skip(user))]
pub async fn index(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    ProfileTemplate {
        username: user.username,
    }
}

/// Display the order history.
#[instrument(skip(user))]
pub async fn orders(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    OrdersTemplate {
        username: user.username,
        orders: demo_orders(),
    }
}
