use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::{Config, ElevationMode};
use crate::error::{AppError, ParseError};
use crate::pipeline::parse::{self, RouteFormat};
use crate::pipeline::simulate::{build_simulator, Simulator, SimulatorOptions};

/// Shared handle to the simulator. Both writers (the ticker and the snapshot
/// endpoint) go through the write lock, so mutations are serialized.
#[derive(Clone)]
pub struct AppState {
    simulator: Arc<RwLock<Simulator>>,
}

impl AppState {
    pub fn new(simulator: Simulator) -> Self {
        Self {
            simulator: Arc::new(RwLock::new(simulator)),
        }
    }

    pub fn load(config: &Config) -> Result<Self, AppError> {
        let route_name = config.route_file.to_string_lossy();
        let format = RouteFormat::from_filename(&route_name)
            .ok_or_else(|| ParseError::UnsupportedFormat(route_name.to_string()))?;

        let coords = parse::parse_route(&read_file(&config.route_file)?, format)?;
        let waypoints = parse::parse_waypoints(&read_file(&config.waypoints_file)?)?;
        let photo_spans = match &config.photo_spans_file {
            Some(path) => parse::parse_photo_spans(&read_file(path)?)?,
            None => Vec::new(),
        };

        let with_elevation = match config.elevation {
            ElevationMode::On => true,
            ElevationMode::Off => false,
            ElevationMode::Auto => coords.iter().all(|c| c.elevation.is_some()),
        };

        let freshness = chrono::Duration::from_std(config.snapshot_freshness)
            .map_err(|e| AppError::Internal(format!("Invalid snapshot freshness: {}", e)))?;
        let options = SimulatorOptions {
            freshness,
            hold_first_snapshot: config.hold_first_snapshot,
        };

        let simulator = build_simulator(&coords, &waypoints, photo_spans, with_elevation, options)?;

        tracing::info!(
            "Loaded route {} ({} points, {:.0} m, {} stages, elevation profile {})",
            route_name,
            simulator.route().len(),
            simulator.route().total_distance_m(),
            simulator.stages().len(),
            if with_elevation { "on" } else { "off" }
        );

        Ok(Self::new(simulator))
    }

    pub fn simulator(&self) -> &Arc<RwLock<Simulator>> {
        &self.simulator
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    std::fs::read(path).map_err(|source| AppError::Io {
        path: path.display().to_string(),
        source,
    })
}
