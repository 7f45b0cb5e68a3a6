use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::bizmodels::repositories::BizModelRepository;
use crate::modules::estimations::models::{
    Estimation, EstimationItem, EstimationItemInput, EstimationStatus, ItemStatus,
};
use crate::modules::estimations::repositories::{EstimationRepository, NewEstimation};
use crate::modules::estimations::services::item_calculator::ItemCalculator;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::projects::repositories::ProjectRepository;

/// Request body for creating an estimation version
#[derive(Debug, Deserialize)]
pub struct CreateEstimationRequest {
    #[serde(default)]
    pub status: Option<EstimationStatus>,
    pub items: Vec<EstimationItemInput>,
}

/// Result of checking a proposed revision against collected payments
#[derive(Debug, Serialize)]
pub struct OverpaymentReport {
    pub has_overpayment: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overpayment_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_collected: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_estimation_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version: Option<i32>,
}

impl OverpaymentReport {
    fn none() -> Self {
        Self {
            has_overpayment: false,
            overpayment_amount: None,
            total_collected: None,
            new_estimation_total: None,
            next_version: None,
        }
    }
}

/// Service for estimation versioning and totals
pub struct EstimationService {
    projects: ProjectRepository,
    biz_models: BizModelRepository,
    estimations: EstimationRepository,
    payments: PaymentRepository,
}

impl EstimationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            biz_models: BizModelRepository::new(pool.clone()),
            estimations: EstimationRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool),
        }
    }

    /// Create the next estimation version for a project.
    ///
    /// Items are validated against the project's business model (known
    /// category, discount limits), computed, and rolled up into the stored
    /// category breakdown.
    pub async fn create_estimation(
        &self,
        project_id: i32,
        request: CreateEstimationRequest,
    ) -> Result<Estimation> {
        let project = self.projects.find_by_id(project_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Project with id '{}' not found", project_id))
        })?;

        let biz_model = self
            .biz_models
            .find_by_id(project.biz_model_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Biz model with id '{}' not found",
                    project.biz_model_id
                ))
            })?;

        if request.items.is_empty() {
            return Err(AppError::validation(
                "Estimation must have at least one item",
            ));
        }

        let status = request.status.unwrap_or_default();
        if status == EstimationStatus::Approved {
            return Err(AppError::validation(
                "Estimations cannot be created as approved",
            ));
        }

        let mut errors = Vec::new();
        let mut items = Vec::with_capacity(request.items.len());

        for input in &request.items {
            let Some(category) = biz_model.category_rates.find(&input.category) else {
                errors.push(format!(
                    "Category '{}' not found in business model '{}'",
                    input.category, biz_model.code
                ));
                continue;
            };

            let check = ItemCalculator::validate_discounts(input, category);
            for warning in &check.warnings {
                warn!(item = %input.item_name, "{}", warning);
            }
            if !check.is_valid() {
                errors.extend(check.errors);
                continue;
            }

            let totals =
                ItemCalculator::calculate_item(input, category, biz_model.gst_percentage)?;

            items.push(EstimationItem {
                id: None,
                estimation_id: None,
                stable_item_id: Uuid::new_v4().to_string(),
                category: input.category.clone(),
                room_name: input.room_name.clone(),
                item_name: input.item_name.clone(),
                unit: input.unit.clone(),
                unit_price: input.unit_price,
                status: ItemStatus::Queued,
                totals,
                created_at: None,
            });
        }

        if !errors.is_empty() {
            return Err(AppError::validation(errors.join("; ")));
        }

        let totals = ItemCalculator::aggregate(&items, &biz_model.category_rates.categories);
        let version = self.estimations.next_version(project_id).await?;

        info!(
            project_id,
            version,
            items = items.len(),
            final_value = %totals.final_value,
            gst_amount = %totals.gst_amount,
            "Creating estimation"
        );

        self.estimations
            .create(
                NewEstimation {
                    project_id,
                    version,
                    status,
                    items_value: totals.items_value,
                    kg_charges: totals.kg_charges,
                    items_discount: totals.items_discount,
                    kg_discount: totals.kg_discount,
                    gst_amount: totals.gst_amount,
                    final_value: totals.final_value,
                    category_breakdown: totals.category_breakdown,
                },
                &items,
            )
            .await
    }

    /// All estimation versions for a project
    pub async fn list_estimations(&self, project_id: i32) -> Result<Vec<Estimation>> {
        self.projects.find_by_id(project_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Project with id '{}' not found", project_id))
        })?;

        self.estimations.list_for_project(project_id).await
    }

    /// Check whether a proposed revision would leave the project overpaid.
    ///
    /// Only revisions (next version > 1) can be overpaid; the comparison is
    /// against the GST-inclusive grand total of the proposed numbers.
    pub async fn check_overpayment(
        &self,
        project_id: i32,
        final_value: Decimal,
        gst_amount: Decimal,
    ) -> Result<OverpaymentReport> {
        let next_version = self.estimations.next_version(project_id).await?;
        if next_version <= 1 {
            return Ok(OverpaymentReport::none());
        }

        let total_collected = self.payments.collected_total(project_id).await?;
        let grand_total = final_value + gst_amount;

        if total_collected > grand_total {
            let overpayment_amount = total_collected - grand_total;
            warn!(
                project_id,
                %overpayment_amount,
                %total_collected,
                %grand_total,
                "Revision would leave project overpaid"
            );
            return Ok(OverpaymentReport {
                has_overpayment: true,
                overpayment_amount: Some(overpayment_amount),
                total_collected: Some(total_collected),
                new_estimation_total: Some(grand_total),
                next_version: Some(next_version),
            });
        }

        Ok(OverpaymentReport::none())
    }
}
