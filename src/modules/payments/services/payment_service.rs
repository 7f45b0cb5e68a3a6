use sqlx::PgPool;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::bizmodels::models::MilestoneDirection;
use crate::modules::payments::models::PaymentTargetReport;
use crate::modules::payments::repositories::{PgTargetDataSource, TargetDataSource};
use crate::modules::payments::services::target_calculator::PaymentTargetCalculator;

/// Service orchestrating payment-target calculation.
///
/// Fetches the project, its business model's category list, the latest
/// finalized estimation breakdown, the milestone's percentage map, and the
/// collected sum through the data source, then hands everything to the pure
/// calculator.
pub struct PaymentService<D: TargetDataSource> {
    data: D,
}

impl PaymentService<PgTargetDataSource> {
    pub fn new(pool: PgPool) -> Self {
        Self::with_source(PgTargetDataSource::new(pool))
    }
}

impl<D: TargetDataSource> PaymentService<D> {
    pub fn with_source(data: D) -> Self {
        Self { data }
    }

    /// Amount due at a milestone for a project, per category and in total
    pub async fn calculate_target(
        &self,
        project_id: i32,
        milestone_id: i32,
    ) -> Result<PaymentTargetReport> {
        let project = self.data.project(project_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Project with id '{}' not found", project_id))
        })?;

        let biz_model = self
            .data
            .biz_model(project.biz_model_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Biz model with id '{}' not found",
                    project.biz_model_id
                ))
            })?;

        let estimation = self
            .data
            .latest_finalized_estimation(project_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "No finalized estimation for project '{}'",
                    project.project_code
                ))
            })?;

        let milestone = self.data.milestone(milestone_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Milestone with id '{}' not found", milestone_id))
        })?;

        if milestone.biz_model_id != project.biz_model_id {
            return Err(AppError::validation(format!(
                "Milestone '{}' belongs to a different business model than project '{}'",
                milestone.milestone_code, project.project_code
            )));
        }

        if milestone.direction != MilestoneDirection::Inflow {
            return Err(AppError::validation(format!(
                "Milestone '{}' is not a collection milestone",
                milestone.milestone_code
            )));
        }

        let collected_total = self.data.collected_total(project_id).await?;

        info!(
            project_id,
            milestone = %milestone.milestone_code,
            estimation_version = estimation.version,
            %collected_total,
            "Calculating payment target"
        );

        PaymentTargetCalculator::calculate(
            &biz_model.category_rates.categories,
            &estimation.category_breakdown,
            &milestone,
            collected_total,
        )
    }
}
