mod geojson;
mod gpx;

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::route::RawCoordinate;
use crate::types::stage::{PhotoSpan, Waypoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFormat {
    GeoJson,
    Gpx,
}

impl RouteFormat {
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit('.').next()?.to_lowercase();
        match ext.as_str() {
            "geojson" | "json" => Some(RouteFormat::GeoJson),
            "gpx" => Some(RouteFormat::Gpx),
            _ => None,
        }
    }
}

pub trait RouteReader {
    fn read(&self, bytes: &[u8]) -> Result<Vec<RawCoordinate>, ParseError>;
}

pub fn parse_route(bytes: &[u8], format: RouteFormat) -> Result<Vec<RawCoordinate>, ParseError> {
    match format {
        RouteFormat::GeoJson => geojson::GeoJsonReader.read(bytes),
        RouteFormat::Gpx => gpx::GpxReader.read(bytes),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WaypointFile {
    Wrapped { waypoints: Vec<Waypoint> },
    Bare(Vec<Waypoint>),
}

/// Accepts either `{ "waypoints": [...] }` or a bare array.
pub fn parse_waypoints(bytes: &[u8]) -> Result<Vec<Waypoint>, ParseError> {
    let file: WaypointFile =
        serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidWaypoints(e.to_string()))?;
    Ok(match file {
        WaypointFile::Wrapped { waypoints } => waypoints,
        WaypointFile::Bare(waypoints) => waypoints,
    })
}

pub fn parse_photo_spans(bytes: &[u8]) -> Result<Vec<PhotoSpan>, ParseError> {
    serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidPhotoSpans(e.to_string()))
}
