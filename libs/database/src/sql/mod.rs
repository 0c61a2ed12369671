//! SeaORM connector for SQLite and PostgreSQL
//!
//! Connection management, migration running and health checks.

mod config;
mod connector;
mod health;

pub use config::{DEFAULT_DATABASE_URL, SqlConfig};
pub use connector::{connect, connect_from_config, connect_from_config_with_retry, run_migrations};
pub use health::check_health;

pub use sea_orm::{ConnectOptions, DatabaseBackend, DatabaseConnection, DbErr};
