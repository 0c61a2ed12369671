use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use tracing::debug;

use crate::common::DatabaseError;

/// Run `SELECT 1` against the connection's backend.
///
/// Used by the readiness endpoint.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    let backend = db.get_database_backend();
    debug!(?backend, "Running database health check");

    let stmt = Statement::from_string(backend, "SELECT 1");
    db.query_one_raw(stmt)
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(e.to_string()))?;

    debug!("Database health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{Database, DatabaseBackend, DbErr, MockDatabase};

    #[tokio::test]
    async fn test_sqlite_is_healthy() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        assert!(check_health(&db).await.is_ok());
    }

    #[tokio::test]
    async fn test_query_failure_is_reported() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())])
            .into_connection();

        let err = check_health(&db).await.unwrap_err();
        assert!(matches!(err, DatabaseError::HealthCheckFailed(ref msg) if msg.contains("connection refused")));
    }

    #[tokio::test]
    async fn test_closed_pool_is_unhealthy() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let probe = db.clone();
        db.close().await.unwrap();

        assert!(check_health(&probe).await.is_err());
    }
}
