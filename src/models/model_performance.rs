//! # Model Performance History
//!
//! **Computed view**: aggregates the most recent invocations from the
//! dbt_artifacts `model_executions` table. Nothing here is stored.
//!
//! Exposes raw historical samples per model (latest, average, min, max and up to
//! five dated samples) plus a coarse performance status. The status is derived
//! from the latest run only and does not feed the timeline's duration
//! classification.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

use crate::constants::{PerformanceStatus, PipelineLayer, MAX_HISTORICAL_SAMPLES};

/// Aggregated row as returned by the history query
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ModelPerformanceRow {
    pub name: String,
    pub schema: String,
    pub avg_execution_time: Option<f64>,
    pub max_execution_time: Option<f64>,
    pub min_execution_time: Option<f64>,
    pub run_count: i64,
    pub historical_times: Vec<f64>,
    pub historical_dates: Vec<NaiveDateTime>,
    pub latest_execution_time: Option<f64>,
    pub latest_status: Option<String>,
}

impl ModelPerformanceRow {
    /// Aggregate executions from the latest `run_limit` invocations, slowest average first
    pub async fn fetch_recent(
        conn: &mut PgConnection,
        artifacts_schema: &str,
        run_limit: i64,
    ) -> Result<Vec<ModelPerformanceRow>, sqlx::Error> {
        let sql = format!(
            r#"
            WITH latest_runs AS (
                SELECT invocation_id, MAX(run_started_at::timestamp) AS run_time
                FROM {artifacts_schema}.model_executions
                GROUP BY invocation_id
                ORDER BY run_time DESC
                LIMIT $1
            ),
            model_performance AS (
                SELECT
                    me.name,
                    me.schema,
                    me.execution_time::float8 AS execution_time,
                    me.status,
                    lr.run_time,
                    ROW_NUMBER() OVER (PARTITION BY me.name ORDER BY lr.run_time DESC) AS run_rank
                FROM {artifacts_schema}.model_executions me
                JOIN latest_runs lr ON me.invocation_id = lr.invocation_id
                WHERE me.execution_time IS NOT NULL
            )
            SELECT
                name,
                schema,
                AVG(execution_time)::float8 AS avg_execution_time,
                MAX(execution_time)::float8 AS max_execution_time,
                MIN(execution_time)::float8 AS min_execution_time,
                COUNT(*) AS run_count,
                ARRAY_AGG(execution_time ORDER BY run_time DESC) AS historical_times,
                ARRAY_AGG(run_time ORDER BY run_time DESC) AS historical_dates,
                MAX(CASE WHEN run_rank = 1 THEN execution_time END)::float8 AS latest_execution_time,
                MAX(CASE WHEN run_rank = 1 THEN status END)::text AS latest_status
            FROM model_performance
            GROUP BY name, schema
            ORDER BY avg_execution_time DESC
            "#
        );

        sqlx::query_as::<_, ModelPerformanceRow>(&sql)
            .bind(run_limit)
            .fetch_all(conn)
            .await
    }
}

/// Per-model performance summary exposed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub name: String,
    pub schema: String,
    pub layer: PipelineLayer,
    pub execution_time: f64,
    pub avg_execution_time: f64,
    pub max_execution_time: f64,
    pub min_execution_time: f64,
    pub run_count: i64,
    pub historical_times: Vec<f64>,
    pub historical_dates: Vec<NaiveDateTime>,
    pub status: String,
    pub performance_status: PerformanceStatus,
}

impl From<ModelPerformanceRow> for ModelPerformance {
    fn from(row: ModelPerformanceRow) -> Self {
        let latest = row.latest_execution_time.unwrap_or(0.0);
        let average = row.avg_execution_time.unwrap_or(0.0);

        let mut historical_times = row.historical_times;
        historical_times.truncate(MAX_HISTORICAL_SAMPLES);
        let mut historical_dates = row.historical_dates;
        historical_dates.truncate(MAX_HISTORICAL_SAMPLES);

        Self {
            layer: PipelineLayer::classify(&row.schema, &row.name),
            performance_status: PerformanceStatus::classify(latest, average),
            name: row.name,
            schema: row.schema,
            execution_time: latest,
            avg_execution_time: average,
            max_execution_time: row.max_execution_time.unwrap_or(0.0),
            min_execution_time: row.min_execution_time.unwrap_or(0.0),
            run_count: row.run_count,
            historical_times,
            historical_dates,
            status: row.latest_status.unwrap_or_else(|| "success".to_string()),
        }
    }
}
