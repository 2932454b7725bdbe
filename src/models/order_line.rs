use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::enums::ProductType;
use super::{validate_non_negative, validate_not_blank};
use crate::entities::order_line;

fn default_line_number() -> i32 {
    1
}

/// Body of `POST /api/OrderLine/{orderId}`; the owning order comes from the path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrderLine {
    #[serde(default = "default_line_number")]
    #[validate(range(min = 1))]
    pub line_number: i32,
    #[validate(custom = "validate_not_blank")]
    pub product_code: String,
    pub product_type: ProductType,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative")]
    pub product_cost_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative")]
    pub product_sales_price: Decimal,
    #[validate(range(min = 0))]
    pub quantity: i32,
}

impl NewOrderLine {
    pub fn into_model(self, order_id: Uuid) -> order_line::Model {
        order_line::Model {
            order_line_id: Uuid::new_v4(),
            line_number: self.line_number,
            product_code: self.product_code,
            product_type: self.product_type,
            product_cost_price: self.product_cost_price,
            product_sales_price: self.product_sales_price,
            quantity: self.quantity,
            order_id,
        }
    }
}

/// Full order line representation used by `PUT /api/OrderLine/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDto {
    pub order_line_id: Uuid,
    #[serde(default = "default_line_number")]
    #[validate(range(min = 1))]
    pub line_number: i32,
    #[validate(custom = "validate_not_blank")]
    pub product_code: String,
    pub product_type: ProductType,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative")]
    pub product_cost_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative")]
    pub product_sales_price: Decimal,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub order_id: Uuid,
}

impl From<OrderLineDto> for order_line::Model {
    fn from(dto: OrderLineDto) -> Self {
        order_line::Model {
            order_line_id: dto.order_line_id,
            line_number: dto.line_number,
            product_code: dto.product_code,
            product_type: dto.product_type,
            product_cost_price: dto.product_cost_price,
            product_sales_price: dto.product_sales_price,
            quantity: dto.quantity,
            order_id: dto.order_id,
        }
    }
}

impl From<order_line::Model> for OrderLineDto {
    fn from(model: order_line::Model) -> Self {
        OrderLineDto {
            order_line_id: model.order_line_id,
            line_number: model.line_number,
            product_code: model.product_code,
            product_type: model.product_type,
            product_cost_price: model.product_cost_price,
            product_sales_price: model.product_sales_price,
            quantity: model.quantity,
            order_id: model.order_id,
        }
    }
}
