// Business model and milestone reads.
//
// `category_rates` and `category_percentages` live in JSONB columns; rows
// are fetched with the raw JSON and parsed into typed structs here so the
// rest of the system never touches serde_json::Value.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::bizmodels::models::{
    BizModel, BizModelStatus, CategoryRates, Milestone, MilestoneDirection,
};

pub struct BizModelRepository {
    pool: PgPool,
}

impl BizModelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a business model with its parsed category configuration
    pub async fn find_by_id(&self, id: i32) -> Result<Option<BizModel>> {
        let row = sqlx::query_as::<_, BizModelRow>(
            r#"
            SELECT id, code, name, description, status, is_active,
                   gst_percentage, category_rates, created_at
            FROM biz_models
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BizModelRow::into_biz_model).transpose()
    }

    /// List active business models, newest first
    pub async fn list_active(&self) -> Result<Vec<BizModel>> {
        let rows = sqlx::query_as::<_, BizModelRow>(
            r#"
            SELECT id, code, name, description, status, is_active,
                   gst_percentage, category_rates, created_at
            FROM biz_models
            WHERE is_active = true
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BizModelRow::into_biz_model).collect()
    }

    /// Fetch one milestone by id
    pub async fn find_milestone(&self, milestone_id: i32) -> Result<Option<Milestone>> {
        let row = sqlx::query_as::<_, MilestoneRow>(
            r#"
            SELECT id, biz_model_id, milestone_code, milestone_name,
                   direction, stage_code, sequence_order, category_percentages
            FROM biz_model_milestones
            WHERE id = $1
            "#,
        )
        .bind(milestone_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(MilestoneRow::into_milestone).transpose()
    }

    /// List a business model's milestones in sequence order
    pub async fn list_milestones(
        &self,
        biz_model_id: i32,
        direction: Option<MilestoneDirection>,
    ) -> Result<Vec<Milestone>> {
        let rows = match direction {
            Some(direction) => {
                sqlx::query_as::<_, MilestoneRow>(
                    r#"
                    SELECT id, biz_model_id, milestone_code, milestone_name,
                           direction, stage_code, sequence_order, category_percentages
                    FROM biz_model_milestones
                    WHERE biz_model_id = $1 AND direction = $2
                    ORDER BY sequence_order
                    "#,
                )
                .bind(biz_model_id)
                .bind(direction.to_string())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, MilestoneRow>(
                    r#"
                    SELECT id, biz_model_id, milestone_code, milestone_name,
                           direction, stage_code, sequence_order, category_percentages
                    FROM biz_model_milestones
                    WHERE biz_model_id = $1
                    ORDER BY sequence_order
                    "#,
                )
                .bind(biz_model_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(MilestoneRow::into_milestone).collect()
    }
}

// Helper structs for database mapping

#[derive(Debug, sqlx::FromRow)]
struct BizModelRow {
    id: i32,
    code: String,
    name: String,
    description: Option<String>,
    status: String,
    is_active: bool,
    gst_percentage: Decimal,
    category_rates: serde_json::Value,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl BizModelRow {
    fn into_biz_model(self) -> Result<BizModel> {
        let status = BizModelStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))?;

        let category_rates: CategoryRates = serde_json::from_value(self.category_rates)?;

        Ok(BizModel {
            id: self.id,
            code: self.code,
            name: self.name,
            description: self.description,
            status,
            is_active: self.is_active,
            gst_percentage: self.gst_percentage,
            category_rates,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MilestoneRow {
    id: i32,
    biz_model_id: i32,
    milestone_code: String,
    milestone_name: String,
    direction: String,
    stage_code: String,
    sequence_order: i32,
    category_percentages: serde_json::Value,
}

impl MilestoneRow {
    fn into_milestone(self) -> Result<Milestone> {
        let direction = MilestoneDirection::from_str(&self.direction)
            .map_err(|e| AppError::internal(format!("Invalid direction in database: {}", e)))?;

        let category_percentages: HashMap<String, Decimal> =
            serde_json::from_value(self.category_percentages)?;

        Ok(Milestone {
            id: self.id,
            biz_model_id: self.biz_model_id,
            milestone_code: self.milestone_code,
            milestone_name: self.milestone_name,
            direction,
            stage_code: self.stage_code,
            sequence_order: self.sequence_order,
            category_percentages,
        })
    }
}
