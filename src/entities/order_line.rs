use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::enums::ProductType;

/// The `order_lines` table. Every row belongs to exactly one order.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order_lines")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_line_id: Uuid,
    pub line_number: i32,
    pub product_code: String,
    pub product_type: ProductType,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub product_cost_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))")]
    #[serde(with = "rust_decimal::serde::float")]
    pub product_sales_price: Decimal,
    pub quantity: i32,
    pub order_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order::Entity",
        from = "Column::OrderId",
        to = "super::order::Column::OrderId",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert {
            if self.order_line_id.is_not_set() {
                self.order_line_id = Set(Uuid::new_v4());
            }
            if self.line_number.is_not_set() {
                self.line_number = Set(1);
            }
        }
        Ok(self)
    }
}
