// Estimation persistence.
//
// Creates are transactional: the estimation row and its line items land
// together or not at all. The `category_breakdown` JSONB document is the
// read path for payment-target calculation, so it is written from the same
// aggregation that produced the stored totals.

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::estimations::models::{
    CategoryBreakdown, Estimation, EstimationItem, EstimationStatus,
};

/// Fields of an estimation not yet assigned by the database
pub struct NewEstimation {
    pub project_id: i32,
    pub version: i32,
    pub status: EstimationStatus,
    pub items_value: Decimal,
    pub kg_charges: Decimal,
    pub items_discount: Decimal,
    pub kg_discount: Decimal,
    pub gst_amount: Decimal,
    pub final_value: Decimal,
    pub category_breakdown: CategoryBreakdown,
}

pub struct EstimationRepository {
    pool: PgPool,
}

impl EstimationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Next version number for a project's estimations, starting at 1
    pub async fn next_version(&self, project_id: i32) -> Result<i32> {
        let next: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(version), 0) + 1
            FROM project_estimations
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }

    /// Latest finalized (or approved) estimation for a project
    pub async fn latest_finalized(&self, project_id: i32) -> Result<Option<Estimation>> {
        let row = sqlx::query_as::<_, EstimationRow>(
            r#"
            SELECT id, project_id, version, status, items_value, kg_charges,
                   items_discount, kg_discount, gst_amount, final_value,
                   category_breakdown, created_at
            FROM project_estimations
            WHERE project_id = $1 AND status IN ('finalized', 'approved')
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EstimationRow::into_estimation).transpose()
    }

    /// Latest estimation of any status for a project
    pub async fn latest(&self, project_id: i32) -> Result<Option<Estimation>> {
        let row = sqlx::query_as::<_, EstimationRow>(
            r#"
            SELECT id, project_id, version, status, items_value, kg_charges,
                   items_discount, kg_discount, gst_amount, final_value,
                   category_breakdown, created_at
            FROM project_estimations
            WHERE project_id = $1
            ORDER BY version DESC
            LIMIT 1
            "#,
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EstimationRow::into_estimation).transpose()
    }

    /// All estimation versions for a project, newest first
    pub async fn list_for_project(&self, project_id: i32) -> Result<Vec<Estimation>> {
        let rows = sqlx::query_as::<_, EstimationRow>(
            r#"
            SELECT id, project_id, version, status, items_value, kg_charges,
                   items_discount, kg_discount, gst_amount, final_value,
                   category_breakdown, created_at
            FROM project_estimations
            WHERE project_id = $1
            ORDER BY version DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EstimationRow::into_estimation).collect()
    }

    /// Create an estimation with its line items in one transaction
    pub async fn create(
        &self,
        estimation: NewEstimation,
        items: &[EstimationItem],
    ) -> Result<Estimation> {
        let mut tx = self.pool.begin().await?;

        let breakdown_json = serde_json::to_value(&estimation.category_breakdown)?;

        let (id, created_at): (i32, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
            r#"
            INSERT INTO project_estimations (
                project_id, version, status, items_value, kg_charges,
                items_discount, kg_discount, gst_amount, final_value,
                category_breakdown, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING id, created_at
            "#,
        )
        .bind(estimation.project_id)
        .bind(estimation.version)
        .bind(estimation.status.to_string())
        .bind(estimation.items_value)
        .bind(estimation.kg_charges)
        .bind(estimation.items_discount)
        .bind(estimation.kg_discount)
        .bind(estimation.gst_amount)
        .bind(estimation.final_value)
        .bind(breakdown_json)
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO estimation_items (
                    estimation_id, stable_item_id, category, room_name,
                    item_name, quantity, unit, unit_price, status,
                    subtotal, kg_charges_percentage, kg_charges_amount,
                    item_discount_percentage, item_discount_amount,
                    kg_discount_percentage, kg_discount_amount,
                    gst_percentage, gst_amount, amount_before_gst, item_total,
                    created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                          $13, $14, $15, $16, $17, $18, $19, $20, NOW())
                "#,
            )
            .bind(id)
            .bind(&item.stable_item_id)
            .bind(&item.category)
            .bind(&item.room_name)
            .bind(&item.item_name)
            .bind(item.totals.quantity)
            .bind(&item.unit)
            .bind(item.unit_price)
            .bind(item.status.to_string())
            .bind(item.totals.subtotal)
            .bind(item.totals.kg_charges_percentage)
            .bind(item.totals.kg_charges_amount)
            .bind(item.totals.item_discount_percentage)
            .bind(item.totals.item_discount_amount)
            .bind(item.totals.kg_discount_percentage)
            .bind(item.totals.kg_discount_amount)
            .bind(item.totals.gst_percentage)
            .bind(item.totals.gst_amount)
            .bind(item.totals.amount_before_gst)
            .bind(item.totals.item_total)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Estimation {
            id,
            project_id: estimation.project_id,
            version: estimation.version,
            status: estimation.status,
            items_value: estimation.items_value,
            kg_charges: estimation.kg_charges,
            items_discount: estimation.items_discount,
            kg_discount: estimation.kg_discount,
            gst_amount: estimation.gst_amount,
            final_value: estimation.final_value,
            category_breakdown: estimation.category_breakdown,
            created_at: Some(created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct EstimationRow {
    id: i32,
    project_id: i32,
    version: i32,
    status: String,
    items_value: Decimal,
    kg_charges: Decimal,
    items_discount: Decimal,
    kg_discount: Decimal,
    gst_amount: Decimal,
    final_value: Decimal,
    category_breakdown: serde_json::Value,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl EstimationRow {
    fn into_estimation(self) -> Result<Estimation> {
        let status = EstimationStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))?;

        let category_breakdown: CategoryBreakdown =
            serde_json::from_value(self.category_breakdown)?;

        Ok(Estimation {
            id: self.id,
            project_id: self.project_id,
            version: self.version,
            status,
            items_value: self.items_value,
            kg_charges: self.kg_charges,
            items_discount: self.items_discount,
            kg_discount: self.kg_discount,
            gst_amount: self.gst_amount,
            final_value: self.final_value,
            category_breakdown,
            created_at: self.created_at,
        })
    }
}
