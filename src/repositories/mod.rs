use async_trait::async_trait;
use metrics::{counter, histogram};
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, DatabaseConnection, EntityName, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter, TransactionTrait,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;

pub mod order_line_repository;
pub mod order_repository;

pub use order_line_repository::OrderLineRepository;
pub use order_repository::OrderRepository;

/// Data-access contract shared by every persisted entity.
///
/// Reads never fail on a missing row: `load_all` yields an empty vector and
/// `load_by_id` yields `None`.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Shape returned by reads.
    type Record: Send;
    /// Shape accepted by writes.
    type Model: Send;

    async fn exists_matching(&self, condition: Condition) -> Result<bool, ServiceError>;

    async fn load_all(&self) -> Result<Vec<Self::Record>, ServiceError>;

    async fn load_by_id(&self, id: Uuid) -> Result<Option<Self::Record>, ServiceError>;

    /// Queues a new row; nothing reaches the store until [`Repository::save`].
    fn stage(&mut self, model: Self::Model);

    /// Commits every staged row in one transaction and returns how many were written.
    async fn save(&mut self) -> Result<u64, ServiceError>;

    /// Stages and commits a single row.
    async fn create(&mut self, model: Self::Model) -> Result<Self::Model, ServiceError>;

    /// Overwrites every mutable column of the row with the same id and commits.
    /// Returns `None` when no such row exists.
    async fn modify(&self, model: Self::Model) -> Result<Option<Self::Model>, ServiceError>;

    /// Deletes the row with this id; returns the number of rows removed.
    async fn remove(&self, id: Uuid) -> Result<u64, ServiceError>;
}

type ModelOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Model;
type PrimaryKeyValueOf<A> =
    <<<A as ActiveModelTrait>::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Connection handle plus the rows staged for the next commit.
///
/// Instances are built per request, so staged rows are never shared.
#[derive(Debug)]
pub struct BaseRepository<A>
where
    A: ActiveModelTrait,
{
    db: Arc<DatabaseConnection>,
    staged: Vec<A>,
}

impl<A> BaseRepository<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Send + Sync,
{
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            staged: Vec::new(),
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    fn table(&self) -> String {
        <A::Entity as Default>::default().table_name().to_string()
    }

    pub async fn exists_matching(&self, condition: Condition) -> Result<bool, ServiceError> {
        let found = <A::Entity as EntityTrait>::find()
            .filter(condition)
            .one(self.db())
            .await?;
        Ok(found.is_some())
    }

    pub async fn find_model_by_id(&self, id: Uuid) -> Result<Option<ModelOf<A>>, ServiceError>
    where
        Uuid: Into<PrimaryKeyValueOf<A>>,
    {
        Ok(<A::Entity as EntityTrait>::find_by_id(id)
            .one(self.db())
            .await?)
    }

    pub async fn delete_by_id(&self, id: Uuid) -> Result<u64, ServiceError>
    where
        Uuid: Into<PrimaryKeyValueOf<A>>,
    {
        let result = <A::Entity as EntityTrait>::delete_by_id(id)
            .exec(self.db())
            .await?;
        debug!(table = %self.table(), rows = result.rows_affected, "delete executed");
        Ok(result.rows_affected)
    }

    pub fn stage(&mut self, model: A) {
        self.staged.push(model);
    }

    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Inserts every staged row inside one transaction. On failure the
    /// transaction is rolled back and the staged rows are discarded.
    pub async fn commit_staged(&mut self) -> Result<Vec<ModelOf<A>>, ServiceError> {
        let staged = std::mem::take(&mut self.staged);
        if staged.is_empty() {
            return Ok(Vec::new());
        }

        let table = self.table();
        let start = Instant::now();
        let txn = self.db.begin().await?;

        let mut saved = Vec::with_capacity(staged.len());
        for model in staged {
            saved.push(model.insert(&txn).await.map_err(|e| {
                counter!("smarthub_repository.commit_failures", 1, "table" => table.clone());
                e
            })?);
        }

        txn.commit().await?;

        histogram!("smarthub_repository.commit_duration", start.elapsed(), "table" => table.clone());
        counter!("smarthub_repository.rows_committed", saved.len() as u64, "table" => table.clone());
        debug!(table = %table, rows = saved.len(), "staged rows committed");

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::order;
    use crate::models::{OrderStatus, OrderType};
    use chrono::Utc;
    use sea_orm::{ColumnTrait, Set};

    async fn pool() -> Arc<DatabaseConnection> {
        let config = crate::db::DbConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let db = crate::db::establish_connection_with_config(&config)
            .await
            .unwrap();
        crate::db::run_migrations(&db).await.unwrap();
        Arc::new(db)
    }

    fn order_row(number: &str) -> order::ActiveModel {
        order::ActiveModel {
            customer_name: Set("Acme".into()),
            order_number: Set(number.into()),
            order_type: Set(OrderType::Normal),
            order_status: Set(OrderStatus::New),
            order_date: Set(Utc::now()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn staged_rows_are_invisible_until_committed() {
        let db = pool().await;
        let mut base = BaseRepository::<order::ActiveModel>::new(db.clone());

        base.stage(order_row("O-1"));
        base.stage(order_row("O-2"));
        assert_eq!(base.staged_len(), 2);

        let by_number = Condition::all().add(order::Column::OrderNumber.eq("O-1"));
        assert!(!base.exists_matching(by_number.clone()).await.unwrap());

        let saved = base.commit_staged().await.unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(base.staged_len(), 0);
        assert!(base.exists_matching(by_number).await.unwrap());

        // Ids and creation time come from the entity defaults.
        assert_ne!(saved[0].order_id, saved[1].order_id);
    }

    #[tokio::test]
    async fn commit_with_nothing_staged_is_a_no_op() {
        let db = pool().await;
        let mut base = BaseRepository::<order::ActiveModel>::new(db);
        assert!(base.commit_staged().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_by_id_reports_rows_affected() {
        let db = pool().await;
        let mut base = BaseRepository::<order::ActiveModel>::new(db);
        base.stage(order_row("O-9"));
        let saved = base.commit_staged().await.unwrap();
        let id = saved[0].order_id;

        assert_eq!(base.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(base.delete_by_id(id).await.unwrap(), 0);
        assert!(base.find_model_by_id(id).await.unwrap().is_none());
    }
}
