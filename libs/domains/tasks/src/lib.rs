//! Tasks Domain
//!
//! To-do items with a name, an optional description, a deadline and a
//! completion flag.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← axum routes under /api/tasks, request validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← absence becomes NotFound
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← TaskStore (SQL) or InMemoryTaskRepository
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Task, CreateTask, UpdateTask, TaskFilter
//! └─────────────┘
//! ```
//!
//! `completed_at` is never written by callers: every update that carries
//! `completed` sets it to the current time (`true`) or clears it (`false`).
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{TaskService, TaskStore};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("sqlite://todo.db?mode=rwc").await?;
//!
//! let service = TaskService::new(TaskStore::new(db));
//! let app = domain_tasks::handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod store;

pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use models::{CreateTask, Task, TaskFilter, TaskList, UpdateTask};
pub use repository::{InMemoryTaskRepository, TaskRepository};
pub use service::TaskService;
pub use store::TaskStore;
