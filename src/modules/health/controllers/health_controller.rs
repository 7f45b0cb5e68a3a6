//! Health check endpoint

use actix_web::{web, HttpResponse};
use sqlx::PgPool;

/// Service and database health
///
/// GET /health
pub async fn health_check(pool: web::Data<PgPool>) -> HttpResponse {
    let database = match sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => "up",
        Err(err) => {
            tracing::error!("Database health check failed: {}", err);
            "down"
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "interiopay",
        "database": database,
    }))
}

/// Configure health routes
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
