use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::enums::{OrderStatus, OrderType};
use super::validate_not_blank;
use crate::entities::{order, order_line};

/// Body of `POST /api/Order`. The server assigns the id and creation time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    #[validate(custom = "validate_not_blank")]
    pub customer_name: String,
    #[validate(custom = "validate_not_blank")]
    pub order_number: String,
    pub order_type: OrderType,
    pub order_status: OrderStatus,
    /// Defaults to the creation time when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<DateTime<Utc>>,
}

impl NewOrder {
    /// Builds the row to insert, stamping a fresh id and `now` as the creation time.
    pub fn into_model(self, now: DateTime<Utc>) -> order::Model {
        order::Model {
            order_id: Uuid::new_v4(),
            customer_name: self.customer_name,
            order_number: self.order_number,
            order_type: self.order_type,
            order_status: self.order_status,
            order_date: self.order_date.unwrap_or(now),
            order_created_date: now,
        }
    }
}

/// Full order representation used by `PUT /api/Order/{id}`.
///
/// Every mutable column is replaced from this payload; `orderLines` is
/// accepted and echoed back but never written.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: Uuid,
    #[validate(custom = "validate_not_blank")]
    pub customer_name: String,
    #[validate(custom = "validate_not_blank")]
    pub order_number: String,
    pub order_type: OrderType,
    pub order_status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub order_created_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_lines: Option<Vec<order_line::Model>>,
}

impl From<OrderDto> for order::Model {
    fn from(dto: OrderDto) -> Self {
        order::Model {
            order_id: dto.order_id,
            customer_name: dto.customer_name,
            order_number: dto.order_number,
            order_type: dto.order_type,
            order_status: dto.order_status,
            order_date: dto.order_date,
            order_created_date: dto.order_created_date,
        }
    }
}

impl From<OrderWithLines> for OrderDto {
    fn from(value: OrderWithLines) -> Self {
        let OrderWithLines { order, order_lines } = value;
        OrderDto {
            order_id: order.order_id,
            customer_name: order.customer_name,
            order_number: order.order_number,
            order_type: order.order_type,
            order_status: order.order_status,
            order_date: order.order_date,
            order_created_date: order.order_created_date,
            order_lines: Some(order_lines),
        }
    }
}

/// An order together with its eagerly loaded lines, as returned by the read endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithLines {
    #[serde(flatten)]
    pub order: order::Model,
    #[serde(default)]
    pub order_lines: Vec<order_line::Model>,
}

impl From<(order::Model, Vec<order_line::Model>)> for OrderWithLines {
    fn from((order, order_lines): (order::Model, Vec<order_line::Model>)) -> Self {
        Self { order, order_lines }
    }
}
