use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;
use crate::types::route::RoutePoint;
use crate::types::stage::Stage;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/route", get(route))
}

#[derive(Serialize)]
struct RouteResponse {
    total_distance_m: f64,
    points: Vec<RoutePoint>,
    stages: Vec<Stage>,
}

async fn route(State(state): State<AppState>) -> Json<RouteResponse> {
    let simulator = state.simulator().read().await;
    Json(RouteResponse {
        total_distance_m: simulator.route().total_distance_m(),
        points: simulator.route().points().to_vec(),
        stages: simulator.stages().to_vec(),
    })
}
