//! Customer payment HTTP endpoints

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::payments::services::PaymentService;

#[derive(Debug, Deserialize)]
pub struct CalculatePaymentQuery {
    pub milestone_id: i32,
}

/// Amount due at a milestone for a project
///
/// GET /projects/{id}/calculate-payment?milestone_id={milestone_id}
pub async fn calculate_payment(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
    query: web::Query<CalculatePaymentQuery>,
) -> Result<HttpResponse> {
    let service = PaymentService::new(pool.get_ref().clone());
    let report = service
        .calculate_target(project_id.into_inner(), query.milestone_id)
        .await?;

    Ok(HttpResponse::Ok().json(report))
}

/// List a project's customer payments
///
/// GET /projects/{id}/customer-payments
pub async fn list_customer_payments(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let repository = PaymentRepository::new(pool.get_ref().clone());
    let payments = repository.list_for_project(project_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "payments": payments })))
}

/// Configure payment routes
pub fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/projects/{id}/calculate-payment",
        web::get().to(calculate_payment),
    )
    .route(
        "/projects/{id}/customer-payments",
        web::get().to(list_customer_payments),
    );
}
