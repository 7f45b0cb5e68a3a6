use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use interiopay::config::Config;
use interiopay::middleware::RequestId;
use interiopay::modules::bizmodels::controllers::biz_model_controller::configure_biz_model_routes;
use interiopay::modules::estimations::controllers::estimation_controller::configure_estimation_routes;
use interiopay::modules::health::controllers::health_controller::configure_health_routes;
use interiopay::modules::payments::controllers::payment_controller::configure_payment_routes;
use interiopay::modules::projects::controllers::project_controller::configure_project_routes;
use interiopay::modules::purchases::controllers::purchase_controller::configure_purchase_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "interiopay=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Interiopay Finance Platform");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .wrap(TracingLogger::default())
            .wrap(RequestId)
            .wrap(Cors::permissive())
            .route("/", web::get().to(index))
            .configure(configure_health_routes)
            .service(
                web::scope("/api")
                    .configure(configure_biz_model_routes)
                    .configure(configure_project_routes)
                    .configure(configure_estimation_routes)
                    .configure(configure_payment_routes)
                    .configure(configure_purchase_routes),
            )
    })
    .workers(workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Interiopay Finance Platform",
        "version": "0.1.0",
        "status": "running"
    }))
}
