//! Shared application state handed to the routers.

use database::DatabaseConnection;

/// Cloned per router; `DatabaseConnection` is a pool handle, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded from environment variables
    pub config: crate::config::Config,
    /// SQLite or PostgreSQL connection pool
    pub db: DatabaseConnection,
}
