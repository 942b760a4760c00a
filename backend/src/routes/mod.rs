//! Route definitions for the Store Back Office API

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes(state.clone()))
        .nest("/clients", client_routes(state.clone()))
        .nest("/inventory", inventory_routes(state.clone()))
        .nest("/sales", sale_routes(state.clone()))
        .nest("/invoices", invoice_routes(state.clone()))
        .nest("/quotes", quote_routes(state))
}

/// Product catalog routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products))
        .route("/categories", get(handlers::list_categories))
        .route("/:product_id", get(handlers::get_product))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Client registry routes (protected)
fn client_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_clients))
        .route("/:client_id", get(handlers::get_client))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory))
        .route("/low-stock", get(handlers::low_stock))
        .route("/movements", get(handlers::list_movements))
        .route(
            "/products/:product_id",
            get(handlers::get_product_inventory),
        )
        .route("/products/:product_id/adjust", post(handlers::adjust_stock))
        .route(
            "/products/:product_id/movements",
            get(handlers::product_movements),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Sale routes (protected)
fn sale_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route("/:sale_id", get(handlers::get_sale))
        .route("/:sale_id/cancel", post(handlers::cancel_sale))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Quote routes (protected)
fn quote_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_quotes).post(handlers::create_quote))
        .route("/:quote_id", get(handlers::get_quote))
        .route("/:quote_id/send", post(handlers::send_quote))
        .route("/:quote_id/accept", post(handlers::accept_quote))
        .route("/:quote_id/reject", post(handlers::reject_quote))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
