use axum::{
    Router,
    routing::{get, post, put},
};

use super::handlers::{
    admin_list_products, cancel_order, checkout, confirm_payment, create_order, create_product,
    delete_product, get_order, get_product, list_orders, list_products, update_product,
};
use crate::state::AppState;

/// Mounted at `/api/products`.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

/// Mounted at `/api/orders`.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/checkout", post(checkout))
        .route("/:id/cancel", post(cancel_order))
}

/// Merged into the API-key protected `/api/admin` router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin_list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/payments/:reference/confirm", post(confirm_payment))
}
