//! Face data CRUD handlers.
//!
//! Each submission is addressed by its timestamp. Writes are sequenced and
//! finish before the response is sent, so a 200 means both files are on disk.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use facetrack_models::{FaceDataSubmission, MessageResponse, Timestamp, ValidSubmission};
use facetrack_storage::StorageError;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

const INVALID_DATA: &str = "Invalid data";

/// Create a submission under a fresh timestamp.
pub async fn create_face_data(
    State(state): State<AppState>,
    payload: Result<Json<FaceDataSubmission>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let submission = validate_submission(payload)?;
    let ts = Timestamp::now();

    save(&state, &ts, &submission).await?;

    info!(timestamp = %ts, "Face data saved");
    Ok(Json(MessageResponse::with_timestamp(
        "Data saved successfully",
        ts.as_str(),
    )))
}

/// List every file name in the storage directory.
pub async fn list_face_data(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let files = state.store.list().await.map_err(|e| {
        metrics::record_storage_failure("list");
        ApiError::from(e)
    })?;
    Ok(Json(files))
}

/// Read one record.
///
/// Anything short of a parseable record is reported as not found.
pub async fn get_face_data(
    State(state): State<AppState>,
    Path(timestamp): Path<String>,
) -> ApiResult<Json<Value>> {
    // A malformed timestamp cannot name a stored record
    let ts = Timestamp::parse(&timestamp).map_err(|e| {
        warn!(timestamp = %timestamp, "Rejected timestamp: {}", e);
        ApiError::not_found("File not found")
    })?;

    let record = state.store.get(&ts).await.map_err(|e| {
        warn!(timestamp = %ts, "Error reading file: {}", e);
        ApiError::not_found("File not found")
    })?;

    Ok(Json(record))
}

/// Replace the submission for a caller-supplied timestamp.
///
/// The timestamp does not have to exist yet.
pub async fn update_face_data(
    State(state): State<AppState>,
    Path(timestamp): Path<String>,
    payload: Result<Json<FaceDataSubmission>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let ts = parse_timestamp(&timestamp)?;
    let submission = validate_submission(payload)?;

    save(&state, &ts, &submission).await?;

    info!(timestamp = %ts, "Face data updated");
    Ok(Json(MessageResponse::with_timestamp(
        "Data updated successfully",
        ts.as_str(),
    )))
}

/// Delete both files for a timestamp.
pub async fn delete_face_data(
    State(state): State<AppState>,
    Path(timestamp): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let ts = parse_timestamp(&timestamp)?;

    state.store.delete(&ts).await.map_err(|e| {
        metrics::record_storage_failure("delete");
        ApiError::from(e)
    })?;
    metrics::record_submission_deleted();

    info!(timestamp = %ts, "Face data deleted");
    Ok(Json(MessageResponse::with_timestamp(
        "Data deleted successfully",
        ts.as_str(),
    )))
}

async fn save(state: &AppState, ts: &Timestamp, submission: &ValidSubmission) -> ApiResult<()> {
    state.store.save(ts, submission).await.map_err(|e| {
        if !matches!(e, StorageError::InvalidScreenshot(_)) {
            metrics::record_storage_failure("save");
        }
        ApiError::from(e)
    })?;
    metrics::record_submission_saved();
    Ok(())
}

fn validate_submission(
    payload: Result<Json<FaceDataSubmission>, JsonRejection>,
) -> ApiResult<ValidSubmission> {
    let Json(body) = payload.map_err(|e| {
        warn!("Rejected face data body: {}", e);
        ApiError::bad_request(INVALID_DATA)
    })?;

    body.validate().map_err(|reason| {
        warn!("Rejected face data body: {}", reason);
        ApiError::bad_request(INVALID_DATA)
    })
}

fn parse_timestamp(raw: &str) -> ApiResult<Timestamp> {
    Timestamp::parse(raw).map_err(|e| ApiError::bad_request(e.to_string()))
}
