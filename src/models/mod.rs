//! Wire types shared by the API service and the front-end call layer.

pub mod enums;
pub mod order;
pub mod order_line;

pub use enums::{OrderStatus, OrderType, ProductType};
pub use order::{NewOrder, OrderDto, OrderWithLines};
pub use order_line::{NewOrderLine, OrderLineDto};

use rust_decimal::Decimal;
use validator::ValidationError;

pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("must not be empty".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}
