//! MySQL connection pool setup.

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::InfrastructureError;

/// Creates a MySQL connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<MySqlPool, InfrastructureError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|e| InfrastructureError::Database(format!("Failed to connect: {}", e)))?;

    info!("Database connection pool established");
    Ok(pool)
}
