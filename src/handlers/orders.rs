use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::common::{ensure_matching_id, success_response, validate_input};
use crate::errors::ServiceError;
use crate::models::{NewOrder, OrderDto, OrderWithLines};
use crate::repositories::{OrderRepository, Repository};
use crate::AppState;

/// Routes mounted under `/api/Order`
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/:id",
            get(get_order).put(update_order).delete(delete_order),
        )
}

/// List every order with its lines. An empty store is a 200 with `[]`.
pub async fn list_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<OrderWithLines>>, ServiceError> {
    let orders = OrderRepository::new(state.db.clone()).load_all().await?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<OrderWithLines>, ServiceError> {
    OrderRepository::new(state.db.clone())
        .load_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound(format!("Order with ID {} not found", id)))
}

/// Create an order; the id and creation timestamp are assigned here.
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<NewOrder>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let mut repo = OrderRepository::new(state.db.clone());
    let created = repo.create(payload.into_model(Utc::now())).await?;

    info!(order_id = %created.order_id, order_number = %created.order_number, "order created");
    Ok(success_response(created))
}

/// Replace an order. The submitted payload is echoed back whether or not a row matched.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderDto>,
) -> Result<Json<OrderDto>, ServiceError> {
    ensure_matching_id(id, payload.order_id)?;
    validate_input(&payload)?;

    let repo = OrderRepository::new(state.db.clone());
    if repo.modify(payload.clone().into()).await?.is_some() {
        info!(order_id = %id, "order updated");
    }

    Ok(Json(payload))
}

/// Delete an order. Responds 200 whether or not the order existed.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let removed = OrderRepository::new(state.db.clone()).remove(id).await?;
    info!(order_id = %id, removed, "order delete requested");
    Ok(StatusCode::OK)
}
