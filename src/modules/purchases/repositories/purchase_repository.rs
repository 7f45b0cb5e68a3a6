// Purchase request persistence and allocation queries.
//
// Allocation aggregates split component links (weightage < 1.0) from
// full-unit links (weightage = 1.0) so the validator can apply the right
// rule to each, and always exclude the request being edited.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::estimations::models::ItemStatus;
use crate::modules::purchases::models::{
    AllocationSummary, EstimationLink, ItemAllocation, PurchaseRequest, PurchaseRequestStatus,
};

/// Estimation item fields needed to raise a purchase request
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PurchasableItem {
    pub id: i32,
    pub stable_item_id: String,
    pub status: String,
    pub category: String,
    pub room_name: String,
    pub item_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
    pub gst_amount: Decimal,
    pub item_total: Decimal,
}

impl PurchasableItem {
    pub fn item_status(&self) -> Result<ItemStatus> {
        ItemStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))
    }
}

/// Fields of a purchase request not yet assigned by the database
pub struct NewPurchaseRequest {
    pub pr_number: String,
    pub project_id: i32,
    pub vendor_id: Option<i32>,
    pub expected_delivery_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    pub gst_amount: Decimal,
    pub final_amount: Decimal,
    pub remarks: Option<String>,
    pub payment_terms: Option<String>,
}

pub struct PurchaseRepository {
    pool: PgPool,
}

impl PurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Purchase requests for a project, newest first
    pub async fn list_for_project(&self, project_id: i32) -> Result<Vec<PurchaseRequest>> {
        let rows = sqlx::query_as::<_, PurchaseRequestRow>(
            r#"
            SELECT pr.id, pr.pr_number, pr.project_id, pr.vendor_id, pr.status,
                   pr.expected_delivery_date, pr.total_amount, pr.gst_amount,
                   pr.final_amount, pr.remarks, pr.payment_terms, pr.created_at,
                   (SELECT COUNT(*) FROM purchase_request_items
                    WHERE purchase_request_id = pr.id) as items_count
            FROM purchase_requests pr
            WHERE pr.project_id = $1
            ORDER BY pr.created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(PurchaseRequestRow::into_purchase_request)
            .collect()
    }

    /// Estimation items by row id
    pub async fn items_by_ids(&self, item_ids: &[i32]) -> Result<Vec<PurchasableItem>> {
        let items = sqlx::query_as::<_, PurchasableItem>(
            r#"
            SELECT id, stable_item_id, status, category, room_name, item_name,
                   quantity, unit, unit_price, subtotal, gst_amount, item_total
            FROM estimation_items
            WHERE id = ANY($1)
            "#,
        )
        .bind(item_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Current allocations for every item of an estimation, keyed by the
    /// item's stable id. `exclude_pr_id` leaves one draft request out of the
    /// draft aggregates when it is being re-validated after an edit.
    pub async fn allocations(
        &self,
        project_id: i32,
        estimation_id: i32,
        exclude_pr_id: Option<i32>,
    ) -> Result<HashMap<String, ItemAllocation>> {
        let rows = sqlx::query_as::<_, AllocationRow>(
            r#"
            SELECT
                ei.stable_item_id,
                ei.item_name,
                ei.category,
                ei.room_name,
                ei.unit,
                ei.quantity as total_qty,
                COALESCE(
                    SUM(prel.weightage)
                    FILTER (WHERE pr.status = 'confirmed' AND prel.weightage < 1.0),
                    0
                ) as confirmed_weightage,
                COALESCE(
                    SUM(prel.weightage)
                    FILTER (WHERE pr.status = 'draft' AND prel.weightage < 1.0
                            AND ($3::INTEGER IS NULL OR pr.id != $3)),
                    0
                ) as draft_weightage,
                COALESCE(
                    SUM(prel.linked_qty)
                    FILTER (WHERE pr.status = 'confirmed' AND prel.weightage = 1.0),
                    0
                ) as confirmed_qty,
                COALESCE(
                    SUM(prel.linked_qty)
                    FILTER (WHERE pr.status = 'draft' AND prel.weightage = 1.0
                            AND ($3::INTEGER IS NULL OR pr.id != $3)),
                    0
                ) as draft_qty
            FROM estimation_items ei
            LEFT JOIN purchase_request_estimation_links prel
                ON ei.stable_item_id = prel.stable_estimation_item_id
            LEFT JOIN purchase_request_items pri
                ON prel.stable_item_id = pri.stable_item_id
            LEFT JOIN purchase_requests pr
                ON pri.purchase_request_id = pr.id AND pr.project_id = $2
            WHERE ei.estimation_id = $1
            GROUP BY ei.stable_item_id, ei.item_name, ei.category, ei.room_name,
                     ei.unit, ei.quantity
            "#,
        )
        .bind(estimation_id)
        .bind(project_id)
        .bind(exclude_pr_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.stable_item_id.clone(), row.into_allocation()))
            .collect())
    }

    /// Availability rows for the item picker, blending both link kinds into
    /// one allocated figure per item
    pub async fn available_items(
        &self,
        project_id: i32,
        estimation_id: i32,
        exclude_pr_id: Option<i32>,
    ) -> Result<Vec<AllocationSummary>> {
        let rows = sqlx::query_as::<_, AvailabilityRow>(
            r#"
            SELECT
                ei.stable_item_id,
                ei.item_name,
                ei.category,
                ei.room_name,
                ei.unit,
                ei.quantity as total_qty,
                COALESCE(
                    SUM(prel.linked_qty * prel.weightage)
                    FILTER (WHERE pr.status = 'confirmed'),
                    0
                ) as confirmed_allocated,
                COALESCE(
                    SUM(prel.linked_qty * prel.weightage)
                    FILTER (WHERE pr.status = 'draft'
                            AND ($3::INTEGER IS NULL OR pr.id != $3)),
                    0
                ) as draft_allocated
            FROM estimation_items ei
            LEFT JOIN purchase_request_estimation_links prel
                ON ei.stable_item_id = prel.stable_estimation_item_id
            LEFT JOIN purchase_request_items pri
                ON prel.stable_item_id = pri.stable_item_id
            LEFT JOIN purchase_requests pr
                ON pri.purchase_request_id = pr.id AND pr.project_id = $2
            WHERE ei.estimation_id = $1
            GROUP BY ei.stable_item_id, ei.item_name, ei.category, ei.room_name,
                     ei.unit, ei.quantity
            ORDER BY ei.category, ei.room_name, ei.item_name
            "#,
        )
        .bind(estimation_id)
        .bind(project_id)
        .bind(exclude_pr_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AvailabilityRow::into_summary).collect())
    }

    /// Next PR sequence number within a project
    pub async fn next_sequence(&self, project_id: i32) -> Result<i32> {
        let next: i32 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(CAST(split_part(pr_number, '-', 3) AS INTEGER)), 0) + 1
            FROM purchase_requests
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(next)
    }

    /// Create a purchase request with its items and estimation links, and
    /// mark the source estimation items, in one transaction
    pub async fn create(
        &self,
        request: NewPurchaseRequest,
        items: &[PurchasableItem],
        links: &[EstimationLink],
    ) -> Result<PurchaseRequest> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at): (i32, chrono::DateTime<chrono::Utc>) = sqlx::query_as(
            r#"
            INSERT INTO purchase_requests (
                pr_number, project_id, vendor_id, status,
                expected_delivery_date, total_amount, gst_amount, final_amount,
                remarks, payment_terms, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW())
            RETURNING id, created_at
            "#,
        )
        .bind(&request.pr_number)
        .bind(request.project_id)
        .bind(request.vendor_id)
        .bind(PurchaseRequestStatus::Draft.to_string())
        .bind(request.expected_delivery_date)
        .bind(request.total_amount)
        .bind(request.gst_amount)
        .bind(request.final_amount)
        .bind(&request.remarks)
        .bind(&request.payment_terms)
        .fetch_one(&mut *tx)
        .await?;

        for (item, link) in items.iter().zip(links) {
            let pr_item_stable_id = Uuid::new_v4().to_string();

            sqlx::query(
                r#"
                INSERT INTO purchase_request_items (
                    purchase_request_id, stable_item_id, estimation_item_id,
                    category, room_name, item_name, quantity, unit, unit_price,
                    subtotal, gst_amount, item_total,
                    quoted_price, final_price, pending_quantity,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                          $13, $14, $15, NOW(), NOW())
                "#,
            )
            .bind(id)
            .bind(&pr_item_stable_id)
            .bind(item.id)
            .bind(&item.category)
            .bind(&item.room_name)
            .bind(&item.item_name)
            .bind(item.quantity)
            .bind(&item.unit)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .bind(item.gst_amount)
            .bind(item.item_total)
            .bind(item.unit_price) // quoted defaults to the estimated price
            .bind(item.unit_price)
            .bind(item.quantity) // everything is pending initially
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO purchase_request_estimation_links (
                    stable_item_id, stable_estimation_item_id,
                    linked_qty, weightage, created_at
                ) VALUES ($1, $2, $3, $4, NOW())
                "#,
            )
            .bind(&pr_item_stable_id)
            .bind(&link.stable_estimation_item_id)
            .bind(link.linked_qty)
            .bind(link.weightage)
            .execute(&mut *tx)
            .await?;
        }

        let item_ids: Vec<i32> = items.iter().map(|item| item.id).collect();
        sqlx::query(
            r#"
            UPDATE estimation_items
            SET status = $1, updated_at = NOW()
            WHERE id = ANY($2)
            "#,
        )
        .bind(ItemStatus::PrRaised.to_string())
        .bind(&item_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PurchaseRequest {
            id,
            pr_number: request.pr_number,
            project_id: request.project_id,
            vendor_id: request.vendor_id,
            status: PurchaseRequestStatus::Draft,
            expected_delivery_date: request.expected_delivery_date,
            total_amount: request.total_amount,
            gst_amount: request.gst_amount,
            final_amount: request.final_amount,
            remarks: request.remarks,
            payment_terms: request.payment_terms,
            items_count: items.len() as i64,
            created_at: Some(created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRequestRow {
    id: i32,
    pr_number: String,
    project_id: i32,
    vendor_id: Option<i32>,
    status: String,
    expected_delivery_date: Option<NaiveDate>,
    total_amount: Decimal,
    gst_amount: Decimal,
    final_amount: Decimal,
    remarks: Option<String>,
    payment_terms: Option<String>,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    items_count: i64,
}

impl PurchaseRequestRow {
    fn into_purchase_request(self) -> Result<PurchaseRequest> {
        let status = PurchaseRequestStatus::from_str(&self.status)
            .map_err(|e| AppError::internal(format!("Invalid status in database: {}", e)))?;

        Ok(PurchaseRequest {
            id: self.id,
            pr_number: self.pr_number,
            project_id: self.project_id,
            vendor_id: self.vendor_id,
            status,
            expected_delivery_date: self.expected_delivery_date,
            total_amount: self.total_amount,
            gst_amount: self.gst_amount,
            final_amount: self.final_amount,
            remarks: self.remarks,
            payment_terms: self.payment_terms,
            items_count: self.items_count,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AllocationRow {
    stable_item_id: String,
    item_name: String,
    category: String,
    room_name: String,
    unit: String,
    total_qty: Decimal,
    confirmed_weightage: Decimal,
    draft_weightage: Decimal,
    confirmed_qty: Decimal,
    draft_qty: Decimal,
}

impl AllocationRow {
    fn into_allocation(self) -> ItemAllocation {
        ItemAllocation {
            stable_item_id: self.stable_item_id,
            item_name: self.item_name,
            category: self.category,
            room_name: self.room_name,
            unit: self.unit,
            total_qty: self.total_qty,
            confirmed_weightage: self.confirmed_weightage,
            draft_weightage: self.draft_weightage,
            confirmed_qty: self.confirmed_qty,
            draft_qty: self.draft_qty,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AvailabilityRow {
    stable_item_id: String,
    item_name: String,
    category: String,
    room_name: String,
    unit: String,
    total_qty: Decimal,
    confirmed_allocated: Decimal,
    draft_allocated: Decimal,
}

impl AvailabilityRow {
    fn into_summary(self) -> AllocationSummary {
        let available_qty = self.total_qty - self.confirmed_allocated - self.draft_allocated;
        AllocationSummary {
            stable_item_id: self.stable_item_id,
            item_name: self.item_name,
            category: self.category,
            room_name: self.room_name,
            unit: self.unit,
            total_qty: self.total_qty,
            confirmed_allocated: self.confirmed_allocated,
            draft_allocated: self.draft_allocated,
            available_qty,
        }
    }
}
