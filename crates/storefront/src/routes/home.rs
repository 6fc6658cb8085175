//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use boardhouse_core::Product;
use serde::Deserialize;
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 3;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: u32,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            description: if product.description.is_empty() {
                "No description available".to_owned()
            } else {
                product.description.clone()
            },
            price: product.price.to_string(),
            stock: product.stock,
        }
    }
}

/// Query parameters for the post-checkout banner.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub order: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// First few products from the catalog.
    pub featured: Vec<ProductView>,
    /// Whether to show the order-placed banner.
    pub order_placed: bool,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let featured = state.api().products().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured products: {e}");
            Vec::new()
        },
        |products| {
            products
                .iter()
                .take(FEATURED_COUNT)
                .map(ProductView::from)
                .collect()
        },
    );

    HomeTemplate {
        featured,
        order_placed: query.order.as_deref() == Some("placed"),
    }
}
