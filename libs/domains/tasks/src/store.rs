use async_trait::async_trait;
use sea_orm::sea_query::{NullOrdering, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use crate::{
    entity,
    error::TaskResult,
    models::{self, CreateTask, Task, TaskFilter, UpdateTask},
    repository::TaskRepository,
};

/// SQL-backed task store (SQLite or PostgreSQL through SeaORM).
///
/// Every write runs in its own transaction; an error before commit drops the
/// transaction, which rolls it back.
#[derive(Clone)]
pub struct TaskStore {
    db: DatabaseConnection,
}

impl TaskStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl TaskRepository for TaskStore {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let active_model: entity::ActiveModel = input.into();

        let txn = self.db.begin().await?;
        let model = active_model.insert(&txn).await?;
        txn.commit().await?;

        tracing::info!(task_id = model.id, "Created task");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;

        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let mut query = entity::Entity::find();

        if let Some(completed) = filter.completed {
            query = query.filter(entity::Column::Completed.eq(completed));
        }

        let models = query
            .order_by_desc(entity::Column::CreatedAt)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn list_completed(&self) -> TaskResult<Vec<Task>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Completed.eq(true))
            .order_by_with_nulls(entity::Column::CompletedAt, Order::Desc, NullOrdering::Last)
            .order_by_desc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: i32, input: UpdateTask) -> TaskResult<Option<Task>> {
        if input.is_empty() {
            return self.get_by_id(id).await;
        }

        let changes = entity::ActiveModel::from_patch(input, models::now());

        // Write before reading: SQLite writers then queue on busy_timeout
        // instead of failing a read-to-write lock upgrade.
        let txn = self.db.begin().await?;
        let result = entity::Entity::update_many()
            .set(changes)
            .filter(entity::Column::Id.eq(id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let updated = entity::Entity::find_by_id(id).one(&txn).await?;
        txn.commit().await?;

        if let Some(model) = &updated {
            tracing::info!(task_id = id, completed = model.completed, "Updated task");
        }
        Ok(updated.map(Into::into))
    }

    async fn delete(&self, id: i32) -> TaskResult<bool> {
        let txn = self.db.begin().await?;
        let result = entity::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        if result.rows_affected > 0 {
            tracing::info!(task_id = id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
