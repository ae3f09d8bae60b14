use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationMode {
    /// Build the profile only when every coordinate carries an elevation.
    Auto,
    On,
    Off,
}

impl ElevationMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ElevationMode::Auto),
            "on" | "true" | "1" => Some(ElevationMode::On),
            "off" | "false" | "0" => Some(ElevationMode::Off),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub route_file: PathBuf,
    pub waypoints_file: PathBuf,
    pub photo_spans_file: Option<PathBuf>,
    pub elevation: ElevationMode,
    pub snapshot_freshness: Duration,
    pub hold_first_snapshot: bool,
    pub tick_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let route_file = std::env::var("ROUTE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/route.geojson"));

        let waypoints_file = std::env::var("WAYPOINTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/waypoints.json"));

        let photo_spans_file = std::env::var("PHOTO_SPANS_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let elevation = std::env::var("ELEVATION_PROFILE")
            .ok()
            .and_then(|s| ElevationMode::from_str(&s))
            .unwrap_or(ElevationMode::Auto);

        let freshness_seconds = std::env::var("SNAPSHOT_FRESHNESS_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(240);

        let hold_first_snapshot = std::env::var("HOLD_FIRST_SNAPSHOT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(true);

        let tick_interval_ms = std::env::var("TICK_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|ms: &u64| *ms > 0)
            .unwrap_or(1000);

        Self {
            port,
            route_file,
            waypoints_file,
            photo_spans_file,
            elevation,
            snapshot_freshness: Duration::from_secs(freshness_seconds),
            hold_first_snapshot,
            tick_interval: Duration::from_millis(tick_interval_ms),
        }
    }
}
