use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{Result, TimelineError};

/// Owned pool for the dbt_artifacts store
#[derive(Debug, Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect(&database_url)
            .await
            .map_err(|e| TimelineError::upstream("connect", e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            schema = %config.schema,
            "Database pool established"
        );

        Ok(Self { pool })
    }

    /// Build the pool without connecting; connection failures surface on first use
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        let database_url = config.database_url()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy(&database_url)
            .map_err(|e| TimelineError::upstream("connect", e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<bool> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| TimelineError::upstream("health_check", e.to_string()))?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
