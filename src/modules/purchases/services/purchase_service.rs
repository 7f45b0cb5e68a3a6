use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::estimations::models::ItemStatus;
use crate::modules::estimations::repositories::EstimationRepository;
use crate::modules::projects::repositories::ProjectRepository;
use crate::modules::purchases::models::{
    AllocationSummary, EstimationLink, LinkedItem, PurchaseRequest,
};
use crate::modules::purchases::repositories::{
    NewPurchaseRequest, PurchaseRepository,
};
use crate::modules::purchases::services::allocation_validator::AllocationValidator;

/// Request body for raising a purchase request from estimation items
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    #[serde(default)]
    pub vendor_id: Option<i32>,
    #[serde(default)]
    pub expected_delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub payment_terms: Option<String>,
    pub estimation_item_ids: Vec<i32>,
}

/// Service for raising and listing purchase requests
pub struct PurchaseService {
    projects: ProjectRepository,
    estimations: EstimationRepository,
    purchases: PurchaseRepository,
}

impl PurchaseService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            estimations: EstimationRepository::new(pool.clone()),
            purchases: PurchaseRepository::new(pool),
        }
    }

    /// Raise a purchase request over full units of the given estimation
    /// items.
    ///
    /// Items must be queued, and the requested units must fit what earlier
    /// confirmed and draft requests left unallocated. Totals are summed from
    /// the estimation items. Everything lands in one transaction, with the
    /// items moved to `pr_raised`.
    pub async fn create_purchase_request(
        &self,
        project_id: i32,
        request: CreatePurchaseRequest,
    ) -> Result<PurchaseRequest> {
        self.projects.find_by_id(project_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Project with id '{}' not found", project_id))
        })?;

        if request.estimation_item_ids.is_empty() {
            return Err(AppError::validation(
                "Purchase request must reference at least one estimation item",
            ));
        }

        let estimation = self
            .estimations
            .latest(project_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No estimation for project '{}'", project_id))
            })?;

        let items = self
            .purchases
            .items_by_ids(&request.estimation_item_ids)
            .await?;

        if items.len() != request.estimation_item_ids.len() {
            return Err(AppError::not_found(
                "One or more estimation items not found",
            ));
        }

        let mut non_queued = Vec::new();
        for item in &items {
            if item.item_status()? != ItemStatus::Queued {
                non_queued.push(format!("{} ({})", item.item_name, item.status));
            }
        }
        if !non_queued.is_empty() {
            return Err(AppError::validation(format!(
                "Items must be in \"queued\" status: {}",
                non_queued.join(", ")
            )));
        }

        // Full-unit links: one per item, consuming its entire quantity
        let links: Vec<EstimationLink> = items
            .iter()
            .map(|item| EstimationLink {
                stable_estimation_item_id: item.stable_item_id.clone(),
                linked_qty: item.quantity,
                weightage: Decimal::ONE,
            })
            .collect();

        let linked_items: Vec<LinkedItem> = items
            .iter()
            .zip(&links)
            .map(|(item, link)| LinkedItem {
                item_name: item.item_name.clone(),
                links: vec![link.clone()],
            })
            .collect();

        let allocations = self
            .purchases
            .allocations(project_id, estimation.id, None)
            .await?;

        let errors = AllocationValidator::validate(&linked_items, &allocations);
        if !errors.is_empty() {
            return Err(AppError::validation(errors.join("; ")));
        }

        let mut total_amount = Decimal::ZERO;
        let mut gst_amount = Decimal::ZERO;
        for item in &items {
            total_amount += item.subtotal;
            gst_amount += item.gst_amount;
        }
        let final_amount = total_amount + gst_amount;

        let sequence = self.purchases.next_sequence(project_id).await?;
        let pr_number = format!("PR-{}-{:03}", project_id, sequence);

        info!(
            project_id,
            pr_number = %pr_number,
            items = items.len(),
            %final_amount,
            "Raising purchase request"
        );

        self.purchases
            .create(
                NewPurchaseRequest {
                    pr_number,
                    project_id,
                    vendor_id: request.vendor_id,
                    expected_delivery_date: request.expected_delivery_date,
                    total_amount,
                    gst_amount,
                    final_amount,
                    remarks: request.remarks,
                    payment_terms: request.payment_terms,
                },
                &items,
                &links,
            )
            .await
    }

    /// Purchase requests for a project
    pub async fn list_purchase_requests(&self, project_id: i32) -> Result<Vec<PurchaseRequest>> {
        self.purchases.list_for_project(project_id).await
    }

    /// Availability of the latest estimation's items for new requests
    pub async fn available_items(&self, project_id: i32) -> Result<Vec<AllocationSummary>> {
        let estimation = self
            .estimations
            .latest(project_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("No estimation for project '{}'", project_id))
            })?;

        self.purchases
            .available_items(project_id, estimation.id, None)
            .await
    }
}
