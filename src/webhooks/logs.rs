use axum::{extract::State, response::Json};

use crate::config::AppConfig;
use crate::database::models::EventLogRecord;
use crate::database::Database;
use crate::error::AppError;

const LOG_PAGE_SIZE: i64 = 50;

/// Most recent normalized events, newest first.
pub async fn list_logs(
    State((_config, database)): State<(AppConfig, Database)>,
) -> Result<Json<Vec<EventLogRecord>>, AppError> {
    let records = database.recent_event_logs(LOG_PAGE_SIZE).await?;
    Ok(Json(records))
}
