use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use chrono::Utc;

use crate::error::AppError;
use crate::pipeline::summary::{progress_view, ProgressView};
use crate::state::AppState;
use crate::types::progress::ProgressSnapshot;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/snapshot", post(apply_snapshot))
}

async fn apply_snapshot(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProgressView>, AppError> {
    let snapshot: ProgressSnapshot = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!("Skipping unreadable snapshot: {}", e);
        AppError::BadRequest(format!("Unreadable snapshot: {}", e))
    })?;

    let mut simulator = state.simulator().write().await;
    simulator
        .apply_snapshot(&snapshot, Utc::now())
        .map_err(|e| {
            tracing::warn!("Skipping malformed snapshot: {}", e);
            e
        })?;

    Ok(Json(progress_view(&simulator)))
}
