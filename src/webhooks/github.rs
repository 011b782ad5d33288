use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::database::Database;
use crate::events;

/// Best-effort webhook sink: always answers 200 so the sender never retries
/// because of a normalization or storage problem on our side.
pub async fn handle_webhook(
    State((_config, database)): State<(AppConfig, Database)>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let event_type = headers
        .get("x-github-event")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let payload: Option<Value> = serde_json::from_slice(&body).ok();

    info!("Received webhook: {}", event_type);

    match events::parse_event(event_type, payload.as_ref()) {
        Ok(Some(record)) => match database.insert_event_log(&record).await {
            Ok(()) => info!(
                "{} by {} logged ({} -> {})",
                record.action.as_str(),
                record.author,
                record.from_branch,
                record.to_branch
            ),
            Err(e) => warn!("Failed to store event log: {}", e),
        },
        Ok(None) => info!("Ignoring {} event", event_type),
        Err(e) => warn!("Dropping {} event: {}", event_type, e),
    }

    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "received" })),
    )
}
