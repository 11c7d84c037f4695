use sea_orm::DatabaseConnection;
use tracing::debug;

use crate::common::DatabaseError;

/// Round-trip to the database, used by the readiness probe.
pub async fn check_health(db: &DatabaseConnection) -> Result<(), DatabaseError> {
    db.ping()
        .await
        .map_err(|e| DatabaseError::HealthCheckFailed(format!("PostgreSQL ping failed: {e}")))?;

    debug!("PostgreSQL health check passed");
    Ok(())
}
