use axum::{extract::State, routing::get, Json, Router};

use crate::pipeline::summary::{progress_view, ProgressView};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/progress", get(progress))
}

async fn progress(State(state): State<AppState>) -> Json<ProgressView> {
    let simulator = state.simulator().read().await;
    Json(progress_view(&simulator))
}
