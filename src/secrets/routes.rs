use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::config::AppConfig;
use crate::database::Database;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateSecretRequest {
    pub name: Option<String>,
    pub message: Option<String>,
}

pub async fn create_secret(
    State((_config, database)): State<(AppConfig, Database)>,
    Json(request): Json<CreateSecretRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let name = request.name.unwrap_or_default();
    let message = request.message.unwrap_or_default();

    let record = super::create_secret(&database, &name, &message).await?;
    info!("Secret created for {}", record.name);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "ok", "secret": record.secret })),
    ))
}

pub async fn get_secret(
    State((_config, database)): State<(AppConfig, Database)>,
    Path(code): Path<String>,
) -> Result<Json<Value>, AppError> {
    let record = super::get_secret(&database, &code).await?;

    Ok(Json(json!({
        "name": record.name,
        "message": record.message
    })))
}
