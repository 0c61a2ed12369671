use axum::Router;
use domain_tasks::{TaskService, TaskStore, handlers};

use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let store = TaskStore::new(state.db.clone());
    handlers::router(TaskService::new(store))
}
