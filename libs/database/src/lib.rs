//! Database connectivity for SeaORM-backed services.
//!
//! The `sql` module speaks to SQLite and PostgreSQL through the same
//! `DatabaseConnection`; the backend is picked from the URL scheme.
//!
//! ```ignore
//! use database::sql::{self, SqlConfig};
//! use core_config::FromEnv;
//!
//! let config = SqlConfig::from_env()?;
//! let db = sql::connect_from_config_with_retry(config, None).await?;
//! sql::run_migrations::<migration::Migrator>(&db, "todo_api").await?;
//! ```

pub mod common;
pub mod sql;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
pub use sql::{DatabaseConnection, SqlConfig};
