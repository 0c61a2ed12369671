/// Error type for connection management, migrations and health checks
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("SQL error: {0}")]
    Sql(#[from] sea_orm::DbErr),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Unsupported or malformed connection settings
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
