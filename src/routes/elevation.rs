use axum::{extract::State, routing::get, Json, Router};

use crate::error::AppError;
use crate::state::AppState;
use crate::types::elevation::ElevationChartData;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/elevation", get(elevation))
}

async fn elevation(State(state): State<AppState>) -> Result<Json<ElevationChartData>, AppError> {
    let simulator = state.simulator().read().await;
    let chart = simulator
        .chart()
        .ok_or_else(|| AppError::NotFound("No elevation profile configured".to_string()))?;
    Ok(Json(chart.to_data()))
}
