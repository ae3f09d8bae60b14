use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("Invalid waypoints: {0}")]
    InvalidWaypoints(String),
    #[error("Invalid photo spans: {0}")]
    InvalidPhotoSpans(String),
    #[error("Expected a single LineString feature, found {0}")]
    UnexpectedGeometry(String),
    #[error("No route coordinates found in file")]
    EmptyFile,
    #[error("Unsupported route file format: {0}")]
    UnsupportedFormat(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("Degenerate route (need at least 2 points, got {0})")]
    DegenerateRoute(usize),
    #[error("Coordinate {0} is not a finite longitude/latitude pair")]
    NonFiniteCoordinate(usize),
    #[error("Coordinate {0} has no elevation")]
    MissingElevation(usize),
    #[error("Waypoint {index} has leg {leg}, which is before the previous leg {previous}")]
    InvalidWaypointOrder {
        index: usize,
        leg: usize,
        previous: usize,
    },
    #[error("Waypoint {index} has leg {leg}, but the route only has {len} points")]
    WaypointOutOfRange { index: usize, leg: usize, len: usize },
    #[error("No waypoints defined")]
    NoWaypoints,
    #[error("Photo span {0} ends before it starts")]
    InvalidPhotoSpan(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot has {got} stage times, expected {expected}")]
    StageCountMismatch { expected: usize, got: usize },
    #[error("Snapshot stage index {index} is out of range ({stages} stages)")]
    StageOutOfRange { index: usize, stages: usize },
    #[error("Snapshot distance {0} is not a non-negative number")]
    InvalidDistance(f64),
    #[error("Snapshot speed {0} is not a non-negative number")]
    InvalidSpeed(f64),
    #[error("Snapshot climb {0} is not a finite number")]
    InvalidClimb(f64),
    #[error("Snapshot start tick {start_tick} is after tick {tick}")]
    StartAfterTick { start_tick: u64, tick: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Parse(_) | AppError::Snapshot(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Route(_) | AppError::Io { .. } | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
