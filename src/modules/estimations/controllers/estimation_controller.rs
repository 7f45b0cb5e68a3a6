//! Estimation HTTP endpoints

use actix_web::{web, HttpResponse};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::estimations::services::{CreateEstimationRequest, EstimationService};

/// Request body for the overpayment check on a proposed revision
#[derive(Debug, Deserialize)]
pub struct CheckOverpaymentRequest {
    pub final_value: Decimal,
    pub gst_amount: Decimal,
}

/// List a project's estimation versions
///
/// GET /projects/{id}/estimations
pub async fn list_estimations(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let service = EstimationService::new(pool.get_ref().clone());
    let estimations = service.list_estimations(project_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "estimations": estimations })))
}

/// Create the next estimation version from raw items
///
/// POST /projects/{id}/estimations
pub async fn create_estimation(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
    request: web::Json<CreateEstimationRequest>,
) -> Result<HttpResponse> {
    let service = EstimationService::new(pool.get_ref().clone());
    let estimation = service
        .create_estimation(project_id.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "estimation": estimation })))
}

/// Check whether proposed revision totals would leave the project overpaid
///
/// POST /projects/{id}/check-overpayment
pub async fn check_overpayment(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
    request: web::Json<CheckOverpaymentRequest>,
) -> Result<HttpResponse> {
    let service = EstimationService::new(pool.get_ref().clone());
    let report = service
        .check_overpayment(
            project_id.into_inner(),
            request.final_value,
            request.gst_amount,
        )
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// Configure estimation routes
pub fn configure_estimation_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/projects/{id}/estimations",
        web::get().to(list_estimations),
    )
    .route(
        "/projects/{id}/estimations",
        web::post().to(create_estimation),
    )
    .route(
        "/projects/{id}/check-overpayment",
        web::post().to(check_overpayment),
    );
}
