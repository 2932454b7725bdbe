//! Server-rendered front end. Every page is backed by [`ApiClient`] calls.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod pages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::client::ApiClient;

pub use error::WebError;

#[derive(Clone)]
pub struct WebState {
    pub client: ApiClient,
}

impl WebState {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

pub fn web_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route("/orders/:id", get(handlers::order_details))
        .route("/orders/:id/edit", post(handlers::edit_order))
        .route("/orders/:id/delete", post(handlers::delete_order))
        .route("/orders/:id/lines", post(handlers::add_order_line))
        .route("/order-lines", get(handlers::list_order_lines))
        .route("/order-lines/:id", get(handlers::order_line_details))
        .route("/order-lines/:id/edit", post(handlers::edit_order_line))
        .route("/order-lines/:id/delete", post(handlers::delete_order_line))
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            crate::middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
