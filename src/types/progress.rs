use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::route::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    East,
    West,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inactive,
    Active,
    Finished,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressState {
    pub distance_m: f64,
    pub tick: u64,
    pub current_stage: usize,
    pub stage_start_tick: u64,
    pub speed_kph: f64,
    pub active: bool,
    pub finished: bool,
    pub position: Position,
    pub direction: Direction,
    pub leg: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climb_m: Option<f64>,
    pub photo_span: Option<String>,
}

impl ProgressState {
    pub fn phase(&self) -> Phase {
        if self.finished {
            Phase::Finished
        } else if self.active && self.speed_kph > 0.0 {
            Phase::Active
        } else {
            Phase::Inactive
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub active: bool,
    pub speed: f64,
    pub dist: f64,
    pub tick: u64,
    pub start_tick: u64,
    pub cur_stage: usize,
    pub stage_times: Vec<u64>,
    #[serde(default)]
    pub elev: Option<f64>,
    pub timestamp: DateTime<Utc>,
}
