use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use sea_orm::{ColumnTrait, Condition};
use tracing::info;
use uuid::Uuid;

use super::common::{ensure_matching_id, success_response, validate_input};
use crate::entities::{order, order_line};
use crate::errors::ServiceError;
use crate::models::{NewOrderLine, OrderLineDto};
use crate::repositories::{OrderLineRepository, OrderRepository, Repository};
use crate::AppState;

/// Routes mounted under `/api/OrderLine`.
///
/// `POST /{id}` takes the owning order's id; the other verbs on `/{id}` take the line's id.
pub fn order_line_routes() -> Router<AppState> {
    Router::new().route("/", get(list_order_lines)).route(
        "/:id",
        get(get_order_line)
            .post(create_order_line)
            .put(update_order_line)
            .delete(delete_order_line),
    )
}

pub async fn list_order_lines(
    State(state): State<AppState>,
) -> Result<Json<Vec<order_line::Model>>, ServiceError> {
    let lines = OrderLineRepository::new(state.db.clone()).load_all().await?;
    Ok(Json(lines))
}

pub async fn get_order_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<order_line::Model>, ServiceError> {
    OrderLineRepository::new(state.db.clone())
        .load_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound(format!("Order line with ID {} not found", id)))
}

/// Add a line to an existing order.
pub async fn create_order_line(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<NewOrderLine>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let owner = Condition::all().add(order::Column::OrderId.eq(order_id));
    if !OrderRepository::new(state.db.clone())
        .exists_matching(owner)
        .await?
    {
        return Err(ServiceError::NotFound(format!(
            "Order with ID {} not found",
            order_id
        )));
    }

    let mut repo = OrderLineRepository::new(state.db.clone());
    let created = repo.create(payload.into_model(order_id)).await?;

    info!(
        order_id = %order_id,
        order_line_id = %created.order_line_id,
        "order line created"
    );
    Ok(success_response(created))
}

/// Replace an order line. A body id that disagrees with the path is rejected
/// before anything is read or written.
pub async fn update_order_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderLineDto>,
) -> Result<Json<OrderLineDto>, ServiceError> {
    ensure_matching_id(id, payload.order_line_id)?;
    validate_input(&payload)?;

    let repo = OrderLineRepository::new(state.db.clone());
    if repo.modify(payload.clone().into()).await?.is_some() {
        info!(order_line_id = %id, "order line updated");
    }

    Ok(Json(payload))
}

pub async fn delete_order_line(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let removed = OrderLineRepository::new(state.db.clone()).remove(id).await?;
    info!(order_line_id = %id, removed, "order line delete requested");
    Ok(StatusCode::OK)
}
