//! # Execution Records
//!
//! One completed run of one model within one invocation, joined with the
//! model dimension so the timeline carries schema and dependency details.
//! Rows are owned by the dbt_artifacts marts; this crate only reads them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ExecutionRecord {
    pub unit_id: String,
    pub unit_name: String,
    /// Target database the model was built in
    pub namespace: String,
    pub schema: String,
    pub dependency_list: Vec<String>,
    pub run_started_at: NaiveDateTime,
    pub total_runtime_seconds: f64,
}

impl ExecutionRecord {
    /// Fetch executions for one project whose start falls in `[day_start, day_end]`,
    /// ordered by start time ascending.
    pub async fn fetch_for_project_range(
        conn: &mut PgConnection,
        schema: &str,
        project_id: i32,
        day_start: NaiveDateTime,
        day_end: NaiveDateTime,
    ) -> Result<Vec<ExecutionRecord>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT
                m.model_execution_id AS unit_id,
                m.name AS unit_name,
                m.database AS namespace,
                m.schema AS schema,
                COALESCE(m.depends_on_nodes::text[], ARRAY[]::text[]) AS dependency_list,
                e.run_started_at::timestamp AS run_started_at,
                COALESCE(e.total_node_runtime, 0)::float8 AS total_runtime_seconds
            FROM {schema}.dim_dbt__models m
            INNER JOIN {schema}.fct_dbt__model_executions e
                ON m.model_execution_id = e.model_execution_id
            WHERE m.project_id = $1
              AND e.run_started_at >= $2
              AND e.run_started_at <= $3
            ORDER BY e.run_started_at
            "#
        );

        sqlx::query_as::<_, ExecutionRecord>(&sql)
            .bind(project_id)
            .bind(day_start)
            .bind(day_end)
            .fetch_all(conn)
            .await
    }
}
