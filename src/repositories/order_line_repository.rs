use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entities::order_line::{self, ActiveModel as OrderLineActiveModel, Entity as OrderLine};
use crate::errors::ServiceError;

use super::{BaseRepository, Repository};

#[derive(Debug)]
pub struct OrderLineRepository {
    base: BaseRepository<OrderLineActiveModel>,
}

impl OrderLineRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

fn insertable(model: order_line::Model) -> OrderLineActiveModel {
    OrderLineActiveModel {
        order_line_id: Set(model.order_line_id),
        line_number: Set(model.line_number),
        product_code: Set(model.product_code),
        product_type: Set(model.product_type),
        product_cost_price: Set(model.product_cost_price),
        product_sales_price: Set(model.product_sales_price),
        quantity: Set(model.quantity),
        order_id: Set(model.order_id),
    }
}

#[async_trait]
impl Repository for OrderLineRepository {
    type Record = order_line::Model;
    type Model = order_line::Model;

    async fn exists_matching(&self, condition: Condition) -> Result<bool, ServiceError> {
        self.base.exists_matching(condition).await
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<order_line::Model>, ServiceError> {
        Ok(OrderLine::find()
            .order_by_asc(order_line::Column::OrderId)
            .order_by_asc(order_line::Column::LineNumber)
            .all(self.base.db())
            .await?)
    }

    #[instrument(skip(self))]
    async fn load_by_id(&self, id: Uuid) -> Result<Option<order_line::Model>, ServiceError> {
        self.base.find_model_by_id(id).await
    }

    fn stage(&mut self, model: order_line::Model) {
        self.base.stage(insertable(model));
    }

    async fn save(&mut self) -> Result<u64, ServiceError> {
        Ok(self.base.commit_staged().await?.len() as u64)
    }

    /// Fails with a database error when `order_id` names no existing order.
    #[instrument(skip(self, model), fields(order_line_id = %model.order_line_id, order_id = %model.order_id))]
    async fn create(&mut self, model: order_line::Model) -> Result<order_line::Model, ServiceError> {
        self.stage(model);
        self.base
            .commit_staged()
            .await?
            .pop()
            .ok_or_else(|| ServiceError::InternalError("order line insert returned no row".into()))
    }

    #[instrument(skip(self, model), fields(order_line_id = %model.order_line_id))]
    async fn modify(
        &self,
        model: order_line::Model,
    ) -> Result<Option<order_line::Model>, ServiceError> {
        let Some(existing) = self.base.find_model_by_id(model.order_line_id).await? else {
            warn!("order line not found; nothing modified");
            return Ok(None);
        };

        let mut active: OrderLineActiveModel = existing.into();
        active.line_number = Set(model.line_number);
        active.product_code = Set(model.product_code);
        active.product_type = Set(model.product_type);
        active.product_cost_price = Set(model.product_cost_price);
        active.product_sales_price = Set(model.product_sales_price);
        active.quantity = Set(model.quantity);
        active.order_id = Set(model.order_id);

        Ok(Some(active.update(self.base.db()).await?))
    }

    /// Removes the line by its own id.
    #[instrument(skip(self))]
    async fn remove(&self, id: Uuid) -> Result<u64, ServiceError> {
        self.base.delete_by_id(id).await
    }
}
