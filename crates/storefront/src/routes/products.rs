//! Product listing route handlers.

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

/// Search and sort query parameters.
#[derive(Debug, Deserialize)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub sort: Option<String>,
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
    pub q: String,
    pub sort: String,
    pub error: Option<String>,
    pub total: usize,
}

/// Display the product listing page.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> impl IntoResponse {
    let q = query.q.unwrap_or_default();
    let sort = query.sort.unwrap_or_else(|| "name".to_owned());

    let (products, error) = match state.api().products().await {
        Ok(products) => {
            let mut listed: Vec<Product> = products
                .iter()
                .filter(|product| matches_query(product, &q))
                .cloned()
                .collect();
            sort_products(&mut listed, &sort);
            (listed.iter().map(ProductView::from).collect(), None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (
                Vec::new(),
                Some("Failed to load products. Please try again later.".to_owned()),
            )
        }
    };

    let total = products.len();
    ProductsIndexTemplate {
        products,
        q,
        sort,
        error,
        total,
    }
}

/// Case-insensitive match against product name or description.
fn matches_query(product: &Product, q: &str) -> bool {
    if q.is_empty() {
        return true;
    }
    let needle = q.to_lowercase();
    product.name.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}

/// Sort per the listing's sort selector; unknown values fall back to name.
fn sort_products(products: &mut [Product], sort: &str) {
    match sort {
        "price-low" => products.sort_by_key(|product| product.price),
        "price-high" => {
            products.sort_by_key(|product| product.price);
            products.reverse();
        }
        "stock" => products.sort_by(|a, b| b.stock.cmp(&a.stock)),
        _ => products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boardhouse_core::{Price, ProductId};

    use super::*;

    fn product(id: i32, name: &str, description: &str, price: &str, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::new(price.parse().unwrap()),
            stock,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Arduino Uno R3", "AVR development board", "24.99", 12),
            product(2, "ESP32 Development Board", "WiFi and BT", "29.99", 40),
            product(3, "Raspberry Pi 4 Model B", "Quad-core SBC", "249.99", 0),
        ]
    }

    #[test]
    fn test_matches_query_name_and_description() {
        let uno = product(1, "Arduino Uno R3", "AVR development board", "24.99", 12);
        assert!(matches_query(&uno, ""));
        assert!(matches_query(&uno, "arduino"));
        assert!(matches_query(&uno, "AVR"));
        assert!(!matches_query(&uno, "raspberry"));
    }

    #[test]
    fn test_sort_by_price() {
        let mut products = catalog();
        sort_products(&mut products, "price-low");
        let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        sort_products(&mut products, "price-high");
        let ids: Vec<i32> = products.iter().map(|p| p.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_stock_descending() {
        let mut products = catalog();
        sort_products(&mut products, "stock");
        let stocks: Vec<u32> = products.iter().map(|p| p.stock).collect();
        assert_eq!(stocks, vec![40, 12, 0]);
    }

    #[test]
    fn test_unknown_sort_falls_back_to_name() {
        let mut products = catalog();
        sort_products(&mut products, "definitely-not-a-sort");
        assert_eq!(products[0].name, "Arduino Uno R3");
    }
}
