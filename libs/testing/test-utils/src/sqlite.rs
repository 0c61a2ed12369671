//! SQLite test infrastructure
//!
//! Every `TestDatabase` is a private in-memory SQLite database with the
//! workspace migrations applied. Nothing outlives the struct.

use database::sql::{self, SqlConfig};
use migration::Migrator;
use sea_orm::DatabaseConnection;

/// Isolated, migrated test database
pub struct TestDatabase {
    pub connection: DatabaseConnection,
}

impl TestDatabase {
    /// Create a new test database with migrations applied
    ///
    /// ```no_run
    /// use test_utils::TestDatabase;
    ///
    /// # async fn example() {
    /// let db = TestDatabase::new().await;
    /// let conn = db.connection();
    /// # }
    /// ```
    pub async fn new() -> Self {
        // Pinned to a single connection by SqlConfig, so the schema and data
        // stay visible to every query
        let connection = sql::connect_from_config(SqlConfig::new("sqlite::memory:"))
            .await
            .expect("Failed to open in-memory SQLite database");

        sql::run_migrations::<Migrator>(&connection, "test")
            .await
            .expect("Failed to run migrations");

        tracing::debug!("Test database ready (in-memory SQLite)");

        Self { connection }
    }

    /// Get a clone of the connection (shares the underlying pool)
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }
}
