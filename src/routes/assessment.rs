use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};

use crate::auth::extractor::AdminUser;
use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::parser::{self, RawPayload};
use crate::submission::pipeline::{self, PipelineResult};

/// Accept an assessment request as JSON, urlencoded or multipart form data.
pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Body,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let payload = if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        let stream = body.into_data_stream();
        parser::parse_multipart(&headers, stream, state.config.max_upload_size)
            .await
            .map_err(|e| AppError::Internal(format!("Error processing form submission: {e}")))?
    } else {
        let body = axum::body::to_bytes(body, state.config.max_body_size)
            .await
            .map_err(|e| AppError::PayloadTooLarge(format!("Request body rejected: {e}")))?;
        let value = parser::parse_body(content_type, &body)
            .map_err(|e| AppError::Internal(format!("Error processing form submission: {e}")))?;
        RawPayload::from_value(value)
            .ok_or_else(|| AppError::BadRequest("Missing required fields".to_string()))?
    };

    match pipeline::run(state.store.as_ref(), payload).await? {
        PipelineResult::Accepted { id } => Ok((
            StatusCode::CREATED,
            Json(json!({ "success": true, "id": id })),
        )),
        PipelineResult::Rejected { errors } => Err(AppError::Validation(errors)),
    }
}

/// All stored submissions in insertion order.
pub async fn list(
    admin: AdminUser,
    State(state): State<SharedState>,
) -> Result<Json<Value>, AppError> {
    let submissions = state.store.list().await?;
    tracing::debug!(admin = %admin.username, count = submissions.len(), "Listing submissions");
    Ok(Json(json!({ "submissions": submissions })))
}
