use std::sync::Arc;
use tracing::instrument;

use crate::error::{TaskError, TaskResult};
use crate::models::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::repository::TaskRepository;

/// Service layer for Task business logic
///
/// Input is expected to be validated already (see `ValidatedJson` in the
/// handlers). Absence coming back from the repository becomes
/// [`TaskError::NotFound`] here.
#[derive(Clone)]
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new task
    #[instrument(skip(self, input), fields(task_name = %input.name))]
    pub async fn create_task(&self, input: CreateTask) -> TaskResult<Task> {
        self.repository.create(input).await
    }

    /// Get a task by ID
    #[instrument(skip(self), fields(task_id = id))]
    pub async fn get_task(&self, id: i32) -> TaskResult<Task> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// List tasks with filters, newest first
    pub async fn list_tasks(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        self.repository.list(filter).await
    }

    /// List completed tasks, most recently completed first
    pub async fn list_completed_tasks(&self) -> TaskResult<Vec<Task>> {
        self.repository.list_completed().await
    }

    /// Update a task
    #[instrument(skip(self, input), fields(task_id = id))]
    pub async fn update_task(&self, id: i32, input: UpdateTask) -> TaskResult<Task> {
        self.repository
            .update(id, input)
            .await?
            .ok_or(TaskError::NotFound(id))
    }

    /// Delete a task
    #[instrument(skip(self), fields(task_id = id))]
    pub async fn delete_task(&self, id: i32) -> TaskResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TaskError::NotFound(id));
        }

        Ok(())
    }
}
