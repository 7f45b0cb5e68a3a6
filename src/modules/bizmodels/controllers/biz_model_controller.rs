//! Business model HTTP endpoints
//!
//! Read-only surface over the configured business models. Category and
//! milestone configuration is managed out of band.

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::bizmodels::repositories::BizModelRepository;

/// List active business models
///
/// GET /biz-models
pub async fn list_biz_models(pool: web::Data<PgPool>) -> Result<HttpResponse> {
    let repository = BizModelRepository::new(pool.get_ref().clone());
    let biz_models = repository.list_active().await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "biz_models": biz_models,
    })))
}

/// Get a business model with its milestones
///
/// GET /biz-models/{id}
pub async fn get_biz_model(
    pool: web::Data<PgPool>,
    biz_model_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let repository = BizModelRepository::new(pool.get_ref().clone());
    let biz_model_id = biz_model_id.into_inner();

    let biz_model = repository
        .find_by_id(biz_model_id)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Biz model with id '{}' not found", biz_model_id))
        })?;

    let milestones = repository.list_milestones(biz_model_id, None).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "biz_model": biz_model,
        "milestones": milestones,
    })))
}

/// Configure business model routes
pub fn configure_biz_model_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/biz-models")
            .route("", web::get().to(list_biz_models))
            .route("/{id}", web::get().to(get_biz_model)),
    );
}
