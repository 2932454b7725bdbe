use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect},
    Form,
};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::error::{ApiContext, WebError};
use super::forms::{EditOrderForm, EditOrderLineForm, OrderForm, OrderLineForm};
use super::pages::{self, Notice, NoticeQuery};
use super::WebState;

fn validated<T: Validate>(value: T) -> Result<T, WebError> {
    value.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        fields.sort();
        WebError::BadRequest(format!("invalid value for {}", fields.join(", ")))
    })?;
    Ok(value)
}

fn redirect_with(path: &str, notice: Notice) -> Redirect {
    Redirect::to(&format!("{}?notice={}", path, notice.as_query()))
}

pub async fn index() -> Redirect {
    Redirect::to("/orders")
}

#[instrument(skip_all)]
pub async fn list_orders(
    State(state): State<WebState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, WebError> {
    let orders = state
        .client
        .get_orders()
        .await
        .during("retrieving the orders")?;
    pages::order_list(&orders, query.notice)
}

#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<WebState>,
    Form(form): Form<OrderForm>,
) -> Result<impl IntoResponse, WebError> {
    let order = validated(form.into_new_order()?)?;
    let created = state
        .client
        .add_order(&order)
        .await
        .during("creating the order")?;

    info!(order_id = %created.order_id, "order created from web");
    Ok(redirect_with(
        &format!("/orders/{}", created.order_id),
        Notice::OrderSaved,
    ))
}

#[instrument(skip(state, query))]
pub async fn order_details(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, WebError> {
    let order = state
        .client
        .get_order(id)
        .await
        .during("retrieving the order")?
        .ok_or_else(|| WebError::NotFound(format!("Order {}", id)))?;
    pages::order_detail(&order, query.notice)
}

#[instrument(skip(state, form))]
pub async fn edit_order(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
    Form(form): Form<EditOrderForm>,
) -> Result<impl IntoResponse, WebError> {
    let order = form.into_dto()?;
    if order.order_id != id {
        return Err(WebError::BadRequest(format!(
            "order id {} does not match {}",
            order.order_id, id
        )));
    }
    let order = validated(order)?;

    state
        .client
        .update_order(&order)
        .await
        .during("updating the order")?;

    info!(order_id = %id, "order updated from web");
    Ok(redirect_with(&format!("/orders/{}", id), Notice::OrderUpdated))
}

#[instrument(skip(state))]
pub async fn delete_order(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, WebError> {
    state
        .client
        .delete_order(id)
        .await
        .during("deleting the order")?;

    info!(order_id = %id, "order deleted from web");
    Ok(redirect_with("/orders", Notice::OrderDeleted))
}

/// The API answers 404 for an unknown order, which renders as the not-found page.
#[instrument(skip(state, form))]
pub async fn add_order_line(
    State(state): State<WebState>,
    Path(order_id): Path<Uuid>,
    Form(form): Form<OrderLineForm>,
) -> Result<impl IntoResponse, WebError> {
    let line = validated(form.into_new_line()?)?;
    let created = state
        .client
        .add_order_line(order_id, &line)
        .await
        .during("creating the order line")?;

    info!(%order_id, order_line_id = %created.order_line_id, "order line created from web");
    Ok(redirect_with(
        &format!("/orders/{}", order_id),
        Notice::LineSaved,
    ))
}

#[instrument(skip_all)]
pub async fn list_order_lines(
    State(state): State<WebState>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, WebError> {
    let lines = state
        .client
        .get_order_lines()
        .await
        .during("retrieving the order lines")?;
    pages::order_line_list(&lines, query.notice)
}

#[instrument(skip(state, query))]
pub async fn order_line_details(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, WebError> {
    let line = state
        .client
        .get_order_line(id)
        .await
        .during("retrieving the order line")?
        .ok_or_else(|| WebError::NotFound(format!("Order line {}", id)))?;
    pages::order_line_detail(&line, query.notice)
}

#[instrument(skip(state, form))]
pub async fn edit_order_line(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
    Form(form): Form<EditOrderLineForm>,
) -> Result<impl IntoResponse, WebError> {
    let line = form.into_dto()?;
    if line.order_line_id != id {
        return Err(WebError::BadRequest(format!(
            "order line id {} does not match {}",
            line.order_line_id, id
        )));
    }
    let line = validated(line)?;

    state
        .client
        .update_order_line(&line)
        .await
        .during("updating the order line")?;

    info!(order_line_id = %id, "order line updated from web");
    Ok(redirect_with(
        &format!("/order-lines/{}", id),
        Notice::LineUpdated,
    ))
}

#[instrument(skip(state))]
pub async fn delete_order_line(
    State(state): State<WebState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, WebError> {
    state
        .client
        .get_order_line(id)
        .await
        .during("retrieving the order line")?
        .ok_or_else(|| WebError::NotFound(format!("Order line {}", id)))?;

    state
        .client
        .delete_order_line(id)
        .await
        .during("deleting the order line")?;

    info!(order_line_id = %id, "order line deleted from web");
    Ok(redirect_with("/order-lines", Notice::LineDeleted))
}
