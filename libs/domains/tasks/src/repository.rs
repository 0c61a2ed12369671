use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::TaskResult;
use crate::models::{self, CreateTask, Task, TaskFilter, UpdateTask};

/// Repository trait for Task persistence
///
/// Absence is an ordinary value here: lookups and updates of an unknown id
/// return `None`, deletes return `false`. Only storage failures are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, input: CreateTask) -> TaskResult<Task>;

    /// Get a task by ID
    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>>;

    /// List tasks, newest first, optionally filtered by completion
    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>>;

    /// List completed tasks, most recently completed first
    async fn list_completed(&self) -> TaskResult<Vec<Task>>;

    /// Merge a patch into an existing task
    async fn update(&self, id: i32, input: UpdateTask) -> TaskResult<Option<Task>>;

    /// Delete a task by ID
    async fn delete(&self, id: i32) -> TaskResult<bool>;
}

#[derive(Debug, Default)]
struct Tasks {
    rows: HashMap<i32, Task>,
    last_id: i32,
}

/// In-memory implementation of TaskRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<Tasks>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create(&self, input: CreateTask) -> TaskResult<Task> {
        let mut tasks = self.tasks.write().await;

        tasks.last_id += 1;
        let task = Task::new(tasks.last_id, input, models::now());
        tasks.rows.insert(task.id, task.clone());

        tracing::info!(task_id = task.id, "Created task");
        Ok(task)
    }

    async fn get_by_id(&self, id: i32) -> TaskResult<Option<Task>> {
        let tasks = self.tasks.read().await;
        Ok(tasks.rows.get(&id).cloned())
    }

    async fn list(&self, filter: TaskFilter) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .rows
            .values()
            .filter(|t| filter.completed.is_none_or(|completed| t.completed == completed))
            .cloned()
            .collect();

        // Newest first; ids break ties between equal timestamps
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(result)
    }

    async fn list_completed(&self) -> TaskResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut result: Vec<Task> = tasks
            .rows
            .values()
            .filter(|t| t.completed)
            .cloned()
            .collect();

        // `Some` orders above `None`, so descending puts missing timestamps last
        result.sort_by(|a, b| b.completed_at.cmp(&a.completed_at).then(b.id.cmp(&a.id)));

        Ok(result)
    }

    async fn update(&self, id: i32, input: UpdateTask) -> TaskResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;

        let Some(task) = tasks.rows.get_mut(&id) else {
            return Ok(None);
        };

        if !input.is_empty() {
            task.apply_update(input, models::now());
            tracing::info!(task_id = id, "Updated task");
        }

        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: i32) -> TaskResult<bool> {
        let mut tasks = self.tasks.write().await;

        if tasks.rows.remove(&id).is_some() {
            tracing::info!(task_id = id, "Deleted task");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn input(name: &str) -> CreateTask {
        CreateTask {
            name: name.to_string(),
            deadline: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_task() {
        let repo = InMemoryTaskRepository::new();

        let task = repo.create(input("Write spec")).await.unwrap();
        assert_eq!(task.id, 1);
        assert!(!task.completed);

        let fetched = repo.get_by_id(task.id).await.unwrap();
        assert_eq!(fetched, Some(task));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryTaskRepository::new();

        let first = repo.create(input("a")).await.unwrap();
        let second = repo.create(input("b")).await.unwrap();
        assert!(repo.delete(second.id).await.unwrap());

        let third = repo.create(input("c")).await.unwrap();
        assert!(third.id > second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_update_missing_task_returns_none() {
        let repo = InMemoryTaskRepository::new();
        let result = repo
            .update(
                42,
                UpdateTask {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(input("a")).await.unwrap();

        assert!(repo.delete(task.id).await.unwrap());
        assert!(!repo.delete(task.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_completed_orders_by_completion_time() {
        let repo = InMemoryTaskRepository::new();
        let a = repo.create(input("a")).await.unwrap();
        let b = repo.create(input("b")).await.unwrap();
        repo.create(input("c")).await.unwrap();

        // Complete b first, then a
        let complete = UpdateTask {
            completed: Some(true),
            ..Default::default()
        };
        repo.update(b.id, complete.clone()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        repo.update(a.id, complete).await.unwrap();

        let completed = repo.list_completed().await.unwrap();
        let ids: Vec<i32> = completed.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        let by_creation = repo
            .list(TaskFilter {
                completed: Some(true),
            })
            .await
            .unwrap();
        let ids: Vec<i32> = by_creation.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn test_list_filters_by_completion() {
        let repo = InMemoryTaskRepository::new();
        let a = repo.create(input("a")).await.unwrap();
        repo.create(input("b")).await.unwrap();
        repo.update(
            a.id,
            UpdateTask {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let open = repo
            .list(TaskFilter {
                completed: Some(false),
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert!(open.iter().all(|t| !t.completed && t.completed_at.is_none()));

        let all = repo.list(TaskFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_update_leaves_task_unchanged() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(input("a")).await.unwrap();

        let updated = repo
            .update(task.id, UpdateTask::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated, task);
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let repo = InMemoryTaskRepository::new();
        let task = repo.create(input("a")).await.unwrap();
        let new_deadline = task.deadline + Duration::days(7);

        let updated = repo
            .update(
                task.id,
                UpdateTask {
                    deadline: Some(new_deadline),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.deadline, new_deadline);
        assert_eq!(updated.name, task.name);
        assert_eq!(updated.created_at, task.created_at);
    }
}
