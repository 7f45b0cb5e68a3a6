use std::str::FromStr;

use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::projects::models::{Project, ProjectStage};

pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            SELECT id, project_code, name, customer_id, biz_model_id,
                   status, stage, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProjectRow::into_project).transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: i32,
    project_code: String,
    name: String,
    customer_id: Option<i32>,
    biz_model_id: i32,
    status: String,
    stage: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ProjectRow {
    fn into_project(self) -> Result<Project> {
        let stage = ProjectStage::from_str(&self.stage)
            .map_err(|e| AppError::internal(format!("Invalid stage in database: {}", e)))?;

        Ok(Project {
            id: self.id,
            project_code: self.project_code,
            name: self.name,
            customer_id: self.customer_id,
            biz_model_id: self.biz_model_id,
            status: self.status,
            stage,
            created_at: self.created_at,
        })
    }
}
