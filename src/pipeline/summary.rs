use serde::Serialize;

use crate::pipeline::simulate::Simulator;
use crate::types::progress::{Direction, Phase};
use crate::types::route::Position;
use crate::types::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Done,
    Active,
    Paused,
    Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub location: String,
    pub time_on_stage: String,
    pub stage_distance: String,
    pub distance_left: String,
    pub distance_left_m: f64,
    pub status: RowStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub phase: Phase,
    pub position: Position,
    pub direction: Direction,
    pub distance_m: f64,
    pub distance: String,
    pub total_distance_m: f64,
    pub elapsed: String,
    pub tick: u64,
    pub speed_kph: f64,
    pub current_stage: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climb_m: Option<f64>,
    pub photo_span: Option<String>,
    pub stages: Vec<SummaryRow>,
}

pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Whole metres with thousands separators, e.g. `12,345m`.
pub fn format_distance(metres: f64) -> String {
    let whole = metres.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    if whole < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push('m');
    grouped
}

pub fn summary_row(stage: &Stage, distance_m: f64, active: bool) -> SummaryRow {
    let stage_start = stage.total_distance_m - stage.stage_distance_m;
    let (status, left) = if stage.total_distance_m >= distance_m && distance_m > stage_start {
        let status = if active {
            RowStatus::Active
        } else {
            RowStatus::Paused
        };
        (status, (stage.total_distance_m - distance_m).trunc())
    } else if distance_m > stage.total_distance_m {
        (RowStatus::Done, 0.0)
    } else {
        (RowStatus::Pending, stage.stage_distance_m)
    };

    SummaryRow {
        location: stage.location.clone(),
        time_on_stage: format_time(stage.elapsed_seconds),
        stage_distance: format_distance(stage.stage_distance_m),
        distance_left: format_distance(left),
        distance_left_m: left,
        status,
    }
}

pub fn progress_view(simulator: &Simulator) -> ProgressView {
    let state = simulator.state();
    ProgressView {
        phase: state.phase(),
        position: state.position,
        direction: state.direction,
        distance_m: state.distance_m,
        distance: format_distance(state.distance_m),
        total_distance_m: simulator.route().total_distance_m(),
        elapsed: format_time(state.tick),
        tick: state.tick,
        speed_kph: state.speed_kph,
        current_stage: state.current_stage,
        climb_m: state.climb_m,
        photo_span: state.photo_span.clone(),
        stages: simulator
            .stages()
            .iter()
            .map(|stage| summary_row(stage, state.distance_m, state.active))
            .collect(),
    }
}
