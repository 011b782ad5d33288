pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod secrets;
pub mod webhooks;

pub use error::AppError;

use axum::{
    response::Json,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use config::AppConfig;
use database::Database;

/// Builds the full application router over the shared config/database state.
pub fn app(config: AppConfig, database: Database) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/webhook", post(webhooks::github::handle_webhook))
        .route("/logs", get(webhooks::logs::list_logs))
        .route("/secret/create", post(secrets::routes::create_secret))
        .route("/secret/:code", get(secrets::routes::get_secret))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Browser clients for the secret/log endpoints live anywhere
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state((config, database))
}

async fn home() -> &'static str {
    "GitHub Webhook Receiver Active"
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "github-events",
        "timestamp": chrono::Utc::now()
    }))
}
