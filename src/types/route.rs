use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawCoordinate {
    pub lon: f64,
    pub lat: f64,
    pub elevation: Option<f64>,
}

impl RawCoordinate {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoutePoint {
    pub lon: f64,
    pub lat: f64,
    pub distance_m: f64,
}

impl RoutePoint {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }
}

/// Cumulative-distance-indexed route. Always holds at least two points, the
/// first at distance zero, with non-decreasing distances.
#[derive(Debug, Clone)]
pub struct RouteTable {
    points: Vec<RoutePoint>,
}

impl RouteTable {
    pub(crate) fn from_validated(points: Vec<RoutePoint>) -> Self {
        debug_assert!(points.len() >= 2);
        Self { points }
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &RoutePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &RoutePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn total_distance_m(&self) -> f64 {
        self.last().distance_m
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteLocation {
    OnLeg { leg: usize, fraction: f64 },
    Exhausted,
}
