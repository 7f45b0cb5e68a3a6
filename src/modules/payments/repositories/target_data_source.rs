// Data-access seam for payment-target calculation.
//
// The calculator never opens connections or issues queries; everything it
// reads comes through this trait, supplied by the Postgres implementation in
// production and by fixtures in tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::bizmodels::models::{BizModel, Milestone};
use crate::modules::bizmodels::repositories::BizModelRepository;
use crate::modules::estimations::models::Estimation;
use crate::modules::estimations::repositories::EstimationRepository;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::projects::models::Project;
use crate::modules::projects::repositories::ProjectRepository;

/// Everything target calculation needs to read
#[async_trait]
pub trait TargetDataSource: Send + Sync {
    async fn project(&self, project_id: i32) -> Result<Option<Project>>;

    async fn biz_model(&self, biz_model_id: i32) -> Result<Option<BizModel>>;

    async fn latest_finalized_estimation(&self, project_id: i32) -> Result<Option<Estimation>>;

    async fn milestone(&self, milestone_id: i32) -> Result<Option<Milestone>>;

    /// Sum of approved collections for a project
    async fn collected_total(&self, project_id: i32) -> Result<Decimal>;
}

/// Postgres-backed data source composed from the module repositories
pub struct PgTargetDataSource {
    projects: ProjectRepository,
    biz_models: BizModelRepository,
    estimations: EstimationRepository,
    payments: PaymentRepository,
}

impl PgTargetDataSource {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool.clone()),
            biz_models: BizModelRepository::new(pool.clone()),
            estimations: EstimationRepository::new(pool.clone()),
            payments: PaymentRepository::new(pool),
        }
    }
}

#[async_trait]
impl TargetDataSource for PgTargetDataSource {
    async fn project(&self, project_id: i32) -> Result<Option<Project>> {
        self.projects.find_by_id(project_id).await
    }

    async fn biz_model(&self, biz_model_id: i32) -> Result<Option<BizModel>> {
        self.biz_models.find_by_id(biz_model_id).await
    }

    async fn latest_finalized_estimation(&self, project_id: i32) -> Result<Option<Estimation>> {
        self.estimations.latest_finalized(project_id).await
    }

    async fn milestone(&self, milestone_id: i32) -> Result<Option<Milestone>> {
        self.biz_models.find_milestone(milestone_id).await
    }

    async fn collected_total(&self, project_id: i32) -> Result<Decimal> {
        self.payments.collected_total(project_id).await
    }
}
