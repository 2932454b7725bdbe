//! HTML form payloads and their conversion into API request bodies.
//!
//! Fields arrive as raw strings, and a missing field reads as empty, so that a
//! malformed or absent value becomes a 400 page naming the field rather than
//! an extractor rejection.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use super::error::WebError;
use crate::models::{
    NewOrder, NewOrderLine, OrderDto, OrderLineDto, OrderStatus, OrderType, ProductType,
};

/// Format produced by `<input type="datetime-local">`.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATETIME_LOCAL_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn parse_field<T: FromStr>(field: &str, raw: &str) -> Result<T, WebError> {
    raw.trim()
        .parse()
        .map_err(|_| WebError::BadRequest(format!("{} has an invalid value '{}'", field, raw)))
}

/// Accepts the browser's datetime-local value (taken as UTC) or an RFC 3339 timestamp.
pub fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, WebError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, DATETIME_LOCAL_SECONDS_FORMAT))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| WebError::BadRequest(format!("{} has an invalid value '{}'", field, raw)))
}

fn parse_optional_datetime(field: &str, raw: &str) -> Result<Option<DateTime<Utc>>, WebError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_datetime(field, raw).map(Some)
}

/// Create-order form on the order list page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderForm {
    pub customer_name: String,
    pub order_number: String,
    pub order_type: String,
    pub order_status: String,
    pub order_date: String,
}

impl OrderForm {
    pub fn into_new_order(self) -> Result<NewOrder, WebError> {
        Ok(NewOrder {
            order_type: parse_field::<OrderType>("order_type", &self.order_type)?,
            order_status: parse_field::<OrderStatus>("order_status", &self.order_status)?,
            order_date: parse_optional_datetime("order_date", &self.order_date)?,
            customer_name: self.customer_name,
            order_number: self.order_number,
        })
    }
}

/// Edit form on the order details page. The creation time travels in a hidden field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditOrderForm {
    pub order_id: String,
    pub customer_name: String,
    pub order_number: String,
    pub order_type: String,
    pub order_status: String,
    pub order_date: String,
    pub order_created_date: String,
}

impl EditOrderForm {
    pub fn into_dto(self) -> Result<OrderDto, WebError> {
        Ok(OrderDto {
            order_id: parse_field::<Uuid>("order_id", &self.order_id)?,
            order_type: parse_field::<OrderType>("order_type", &self.order_type)?,
            order_status: parse_field::<OrderStatus>("order_status", &self.order_status)?,
            order_date: parse_datetime("order_date", &self.order_date)?,
            order_created_date: parse_datetime("order_created_date", &self.order_created_date)?,
            customer_name: self.customer_name,
            order_number: self.order_number,
            order_lines: None,
        })
    }
}

/// Add-line form on the order details page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrderLineForm {
    pub line_number: String,
    pub product_code: String,
    pub product_type: String,
    pub product_cost_price: String,
    pub product_sales_price: String,
    pub quantity: String,
}

impl OrderLineForm {
    pub fn into_new_line(self) -> Result<NewOrderLine, WebError> {
        let line_number = if self.line_number.trim().is_empty() {
            1
        } else {
            parse_field::<i32>("line_number", &self.line_number)?
        };

        Ok(NewOrderLine {
            line_number,
            product_type: parse_field::<ProductType>("product_type", &self.product_type)?,
            product_cost_price: parse_field::<Decimal>(
                "product_cost_price",
                &self.product_cost_price,
            )?,
            product_sales_price: parse_field::<Decimal>(
                "product_sales_price",
                &self.product_sales_price,
            )?,
            quantity: parse_field::<i32>("quantity", &self.quantity)?,
            product_code: self.product_code,
        })
    }
}

/// Edit form on the order line details page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditOrderLineForm {
    pub order_line_id: String,
    pub order_id: String,
    pub line_number: String,
    pub product_code: String,
    pub product_type: String,
    pub product_cost_price: String,
    pub product_sales_price: String,
    pub quantity: String,
}

impl EditOrderLineForm {
    pub fn into_dto(self) -> Result<OrderLineDto, WebError> {
        Ok(OrderLineDto {
            order_line_id: parse_field::<Uuid>("order_line_id", &self.order_line_id)?,
            order_id: parse_field::<Uuid>("order_id", &self.order_id)?,
            line_number: parse_field::<i32>("line_number", &self.line_number)?,
            product_type: parse_field::<ProductType>("product_type", &self.product_type)?,
            product_cost_price: parse_field::<Decimal>(
                "product_cost_price",
                &self.product_cost_price,
            )?,
            product_sales_price: parse_field::<Decimal>(
                "product_sales_price",
                &self.product_sales_price,
            )?,
            quantity: parse_field::<i32>("quantity", &self.quantity)?,
            product_code: self.product_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Datelike, Timelike};

    fn line_form() -> OrderLineForm {
        OrderLineForm {
            line_number: String::new(),
            product_code: "SKU-1".into(),
            product_type: "Parts".into(),
            product_cost_price: "10.50".into(),
            product_sales_price: "15".into(),
            quantity: "2".into(),
        }
    }

    #[test]
    fn datetime_local_values_are_read_as_utc() {
        let parsed = parse_datetime("order_date", "2024-03-05T14:30").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 3, 5));
        assert_eq!((parsed.hour(), parsed.minute()), (14, 30));

        let rfc = parse_datetime("order_date", "2024-03-05T14:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 12);
    }

    #[test]
    fn empty_order_date_is_left_to_the_api() {
        let order = OrderForm {
            customer_name: "Acme".into(),
            order_number: "A-1".into(),
            order_type: "Normal".into(),
            order_status: "New".into(),
            order_date: "".into(),
        }
        .into_new_order()
        .unwrap();

        assert_eq!(order.order_date, None);
        assert_eq!(order.order_type, OrderType::Normal);
    }

    #[test]
    fn unknown_enum_value_names_the_field() {
        let err = OrderForm {
            customer_name: "Acme".into(),
            order_number: "A-1".into(),
            order_type: "Express".into(),
            order_status: "New".into(),
            order_date: "".into(),
        }
        .into_new_order()
        .unwrap_err();

        assert_matches!(err, WebError::BadRequest(msg) if msg.contains("order_type"));
    }

    #[test]
    fn line_form_defaults_line_number_and_parses_prices() {
        let line = line_form().into_new_line().unwrap();
        assert_eq!(line.line_number, 1);
        assert_eq!(line.product_type, ProductType::Parts);
        assert_eq!(line.product_cost_price, Decimal::new(105, 1));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn non_numeric_quantity_is_rejected() {
        let mut form = line_form();
        form.quantity = "two".into();
        assert_matches!(form.into_new_line(), Err(WebError::BadRequest(msg)) if msg.contains("quantity"));
    }
}
