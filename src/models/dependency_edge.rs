use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

/// Directed dependency between two models: `source_model` feeds `target_model`.
/// Names are schema-qualified (`staging.stg_orders`) when read from the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct DependencyEdge {
    pub source_model: String,
    pub target_model: String,
}

impl DependencyEdge {
    pub fn new(source_model: impl Into<String>, target_model: impl Into<String>) -> Self {
        Self {
            source_model: source_model.into(),
            target_model: target_model.into(),
        }
    }

    pub fn is_self_edge(&self) -> bool {
        self.source_model == self.target_model
    }

    /// Read all recorded edges from the artifacts dependency table
    pub async fn list_all(
        conn: &mut PgConnection,
        artifacts_schema: &str,
    ) -> Result<Vec<DependencyEdge>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT source_model, target_model
            FROM (
                SELECT unnest(md.depends_on)::text AS source_model, md.model::text AS target_model
                FROM {artifacts_schema}.dbt_model_dependencies md
            ) edges
            ORDER BY target_model, source_model
            "#
        );

        sqlx::query_as::<_, DependencyEdge>(&sql)
            .fetch_all(conn)
            .await
    }
}
