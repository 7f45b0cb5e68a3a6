//! Project HTTP endpoints

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::core::{AppError, Result};
use crate::modules::projects::repositories::ProjectRepository;

/// Get a project
///
/// GET /projects/{id}
pub async fn get_project(
    pool: web::Data<PgPool>,
    project_id: web::Path<i32>,
) -> Result<HttpResponse> {
    let repository = ProjectRepository::new(pool.get_ref().clone());
    let project_id = project_id.into_inner();

    let project = repository.find_by_id(project_id).await?.ok_or_else(|| {
        AppError::not_found(format!("Project with id '{}' not found", project_id))
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "project": project })))
}

/// Configure project routes
pub fn configure_project_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects/{id}", web::get().to(get_project));
}
