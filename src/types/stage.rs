use serde::{Deserialize, Serialize};

/// A named stop on the journey, bound to the route vertex where its stage ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub location: String,
    pub leg: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stage {
    pub location: String,
    pub leg: usize,
    pub stage_distance_m: f64,
    pub total_distance_m: f64,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoSpan {
    pub id: String,
    pub start: usize,
    pub end: usize,
}

impl PhotoSpan {
    pub fn covers(&self, leg: usize) -> bool {
        self.start <= leg && leg < self.end
    }
}
