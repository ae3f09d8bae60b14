use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElevationSegment {
    pub elev_start: f64,
    pub elev_end: f64,
    pub dist_start: f64,
    pub dist_end: f64,
    /// Running ascent (for ascending segments) or descent (for descending
    /// ones) at the end of this segment.
    pub cumulative_climb: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ElevationProfile {
    pub ascents: Vec<ElevationSegment>,
    pub descents: Vec<ElevationSegment>,
    pub total_ascent: f64,
    pub total_descent: f64,
    pub total_distance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ElevationChartData {
    pub climb_m: f64,
    pub total_ascent_m: f64,
    pub total_descent_m: f64,
    pub pending_ascent: Vec<ChartPoint>,
    pub pending_descent: Vec<ChartPoint>,
    pub complete_ascent: Vec<ChartPoint>,
    pub complete_descent: Vec<ChartPoint>,
}
