use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};

/// A dbt project available for timeline queries
/// Maps to the `dbt_projects` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

impl ProjectRef {
    /// Find a project by id
    pub async fn find_by_id(
        conn: &mut PgConnection,
        schema: &str,
        id: i32,
    ) -> Result<Option<ProjectRef>, sqlx::Error> {
        let sql = format!(
            "SELECT id, name, description, created_at::timestamp AS created_at \
             FROM {schema}.dbt_projects WHERE id = $1"
        );

        sqlx::query_as::<_, ProjectRef>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// List all projects ordered by id
    pub async fn list_all(
        conn: &mut PgConnection,
        schema: &str,
    ) -> Result<Vec<ProjectRef>, sqlx::Error> {
        let sql = format!(
            "SELECT id, name, description, created_at::timestamp AS created_at \
             FROM {schema}.dbt_projects ORDER BY id"
        );

        sqlx::query_as::<_, ProjectRef>(&sql).fetch_all(conn).await
    }
}
