use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, LoaderTrait, ModelTrait,
    QueryOrder, Set,
};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entities::order::{self, ActiveModel as OrderActiveModel, Entity as Order};
use crate::entities::order_line::{self, Entity as OrderLine};
use crate::errors::ServiceError;
use crate::models::OrderWithLines;

use super::{BaseRepository, Repository};

/// Repository for orders. Reads come back with their lines attached.
#[derive(Debug)]
pub struct OrderRepository {
    base: BaseRepository<OrderActiveModel>,
}

impl OrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.base.db()
    }
}

fn insertable(model: order::Model) -> OrderActiveModel {
    OrderActiveModel {
        order_id: Set(model.order_id),
        customer_name: Set(model.customer_name),
        order_number: Set(model.order_number),
        order_type: Set(model.order_type),
        order_status: Set(model.order_status),
        order_date: Set(model.order_date),
        order_created_date: Set(model.order_created_date),
    }
}

#[async_trait]
impl Repository for OrderRepository {
    type Record = OrderWithLines;
    type Model = order::Model;

    async fn exists_matching(&self, condition: Condition) -> Result<bool, ServiceError> {
        self.base.exists_matching(condition).await
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<OrderWithLines>, ServiceError> {
        let orders = Order::find()
            .order_by_asc(order::Column::OrderCreatedDate)
            .all(self.db())
            .await?;

        let lines = orders
            .load_many(
                OrderLine::find().order_by_asc(order_line::Column::LineNumber),
                self.db(),
            )
            .await?;

        Ok(orders
            .into_iter()
            .zip(lines)
            .map(OrderWithLines::from)
            .collect())
    }

    #[instrument(skip(self))]
    async fn load_by_id(&self, id: Uuid) -> Result<Option<OrderWithLines>, ServiceError> {
        let Some(order) = self.base.find_model_by_id(id).await? else {
            return Ok(None);
        };

        let lines = order
            .find_related(OrderLine)
            .order_by_asc(order_line::Column::LineNumber)
            .all(self.db())
            .await?;

        Ok(Some(OrderWithLines::from((order, lines))))
    }

    fn stage(&mut self, model: order::Model) {
        self.base.stage(insertable(model));
    }

    async fn save(&mut self) -> Result<u64, ServiceError> {
        Ok(self.base.commit_staged().await?.len() as u64)
    }

    #[instrument(skip(self, model), fields(order_id = %model.order_id))]
    async fn create(&mut self, model: order::Model) -> Result<order::Model, ServiceError> {
        self.stage(model);
        self.base
            .commit_staged()
            .await?
            .pop()
            .ok_or_else(|| ServiceError::InternalError("order insert returned no row".into()))
    }

    #[instrument(skip(self, model), fields(order_id = %model.order_id))]
    async fn modify(&self, model: order::Model) -> Result<Option<order::Model>, ServiceError> {
        let Some(existing) = self.base.find_model_by_id(model.order_id).await? else {
            warn!("order not found; nothing modified");
            return Ok(None);
        };

        let mut active: OrderActiveModel = existing.into();
        active.customer_name = Set(model.customer_name);
        active.order_number = Set(model.order_number);
        active.order_type = Set(model.order_type);
        active.order_status = Set(model.order_status);
        active.order_date = Set(model.order_date);
        active.order_created_date = Set(model.order_created_date);

        Ok(Some(active.update(self.db()).await?))
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: Uuid) -> Result<u64, ServiceError> {
        self.base.delete_by_id(id).await
    }
}
