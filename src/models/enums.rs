use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Classification of an order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum OrderType {
    #[sea_orm(string_value = "Normal")]
    Normal,
    #[sea_orm(string_value = "Staff")]
    Staff,
    #[sea_orm(string_value = "Mechanical")]
    Mechanical,
    #[sea_orm(string_value = "Perishable")]
    Perishable,
}

/// Enum representing the possible statuses of an order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum OrderStatus {
    #[sea_orm(string_value = "New")]
    New,
    #[sea_orm(string_value = "Processing")]
    Processing,
    #[sea_orm(string_value = "Complete")]
    Complete,
}

/// Kind of product carried on an order line.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ProductType {
    #[sea_orm(string_value = "Apparel")]
    Apparel,
    #[sea_orm(string_value = "Parts")]
    Parts,
    #[sea_orm(string_value = "Equipment")]
    Equipment,
    #[sea_orm(string_value = "Motor")]
    Motor,
}
