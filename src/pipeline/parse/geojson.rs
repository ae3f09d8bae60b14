use serde::Deserialize;

use crate::error::ParseError;
use crate::pipeline::parse::RouteReader;
use crate::types::route::RawCoordinate;

pub struct GeoJsonReader;

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    #[serde(other)]
    Other,
}

impl RouteReader for GeoJsonReader {
    fn read(&self, bytes: &[u8]) -> Result<Vec<RawCoordinate>, ParseError> {
        let collection: FeatureCollection =
            serde_json::from_slice(bytes).map_err(|e| ParseError::InvalidGeoJson(e.to_string()))?;

        let feature = match collection.features.as_slice() {
            [feature] => feature,
            features => {
                return Err(ParseError::UnexpectedGeometry(format!(
                    "{} features",
                    features.len()
                )))
            }
        };

        let coordinates = match &feature.geometry {
            Geometry::LineString { coordinates } => coordinates,
            Geometry::Other => {
                return Err(ParseError::UnexpectedGeometry(
                    "a non-LineString geometry".to_string(),
                ))
            }
        };

        if coordinates.is_empty() {
            return Err(ParseError::EmptyFile);
        }

        coordinates
            .iter()
            .enumerate()
            .map(|(idx, coord)| match coord.as_slice() {
                [lon, lat] => Ok(RawCoordinate {
                    lon: *lon,
                    lat: *lat,
                    elevation: None,
                }),
                [lon, lat, elev, ..] => Ok(RawCoordinate {
                    lon: *lon,
                    lat: *lat,
                    elevation: Some(*elev),
                }),
                _ => Err(ParseError::InvalidGeoJson(format!(
                    "coordinate {} has {} values",
                    idx,
                    coord.len()
                ))),
            })
            .collect()
    }
}
