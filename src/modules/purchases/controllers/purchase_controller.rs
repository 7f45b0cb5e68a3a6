//! Purchase request HTTP endpoints

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::core::Result;
use crate::modules::purchases::services::{CreatePurchaseRequest, PurchaseService};

/// List a project's purchase requests
///
/// GET /projects/{id}/purchase-requests
pub async fn list_purchase_requests(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let service = PurchaseService::new(pool.get_ref().clone());
    let purchase_requests = service
        .list_purchase_requests(project_id.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "purchase_requests": purchase_requests,
    })))
}

/// Availability of estimation items for new purchase requests
///
/// GET /projects/{id}/purchase-requests/available-items
pub async fn available_items(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let service = PurchaseService::new(pool.get_ref().clone());
    let items = service.available_items(project_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "items": items })))
}

/// Raise a purchase request from queued estimation items
///
/// POST /projects/{id}/purchase-requests
pub async fn create_purchase_request(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
    request: web::Json<CreatePurchaseRequest>,
) -> Result<HttpResponse> {
    let service = PurchaseService::new(pool.get_ref().clone());
    let purchase_request = service
        .create_purchase_request(project_id.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "purchase_request": purchase_request,
    })))
}

/// Configure purchase request routes
pub fn configure_purchase_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/projects/{id}/purchase-requests",
        web::get().to(list_purchase_requests),
    )
    .route(
        "/projects/{id}/purchase-requests",
        web::post().to(create_purchase_request),
    )
    .route(
        "/projects/{id}/purchase-requests/available-items",
        web::get().to(available_items),
    );
}
