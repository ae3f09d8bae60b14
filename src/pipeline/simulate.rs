//! Progress simulator.
//!
//! Owns the route, stage and elevation tables plus the only mutable state,
//! [`ProgressState`]. Two writers drive it: [`Simulator::tick`] dead-reckons
//! one second of travel, and [`Simulator::apply_snapshot`] replaces the state
//! wholesale with an authoritative record from the remote store.

use chrono::{DateTime, Duration, Utc};

use crate::error::{RouteError, SnapshotError};
use crate::pipeline::chart::ChartView;
use crate::pipeline::{elevation, geodesy, route, stages};
use crate::types::elevation::ElevationProfile;
use crate::types::progress::{Direction, Phase, ProgressSnapshot, ProgressState};
use crate::types::route::{RawCoordinate, RouteLocation, RouteTable};
use crate::types::stage::{PhotoSpan, Stage, Waypoint};

const METRES_PER_SECOND_PER_KPH: f64 = 1000.0 / 3600.0;

#[derive(Debug, Clone)]
pub struct SimulatorOptions {
    pub freshness: Duration,
    pub hold_first_snapshot: bool,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            freshness: Duration::seconds(240),
            hold_first_snapshot: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Simulator {
    route: RouteTable,
    stages: Vec<Stage>,
    elevation: Option<ElevationProfile>,
    photo_spans: Vec<PhotoSpan>,
    options: SimulatorOptions,
    state: ProgressState,
    awaiting_first_snapshot: bool,
}

pub fn build_simulator(
    coords: &[RawCoordinate],
    waypoints: &[Waypoint],
    photo_spans: Vec<PhotoSpan>,
    with_elevation: bool,
    options: SimulatorOptions,
) -> Result<Simulator, RouteError> {
    let route = route::build_route(coords)?;
    let stages = stages::annotate_stages(&route, waypoints)?;
    stages::validate_photo_spans(&photo_spans)?;

    let profile = if with_elevation {
        Some(elevation::build_profile(coords, &route)?)
    } else {
        None
    };

    let mut simulator = Simulator::new(route, stages, options).with_photo_spans(photo_spans);
    if let Some(profile) = profile {
        simulator = simulator.with_elevation(profile);
    }
    Ok(simulator)
}

impl Simulator {
    pub fn new(route: RouteTable, stages: Vec<Stage>, options: SimulatorOptions) -> Self {
        let origin = route.first().position();
        let direction = direction_of(&route, 0).unwrap_or(Direction::East);
        let awaiting_first_snapshot = options.hold_first_snapshot;

        Self {
            route,
            stages,
            elevation: None,
            photo_spans: Vec::new(),
            options,
            state: ProgressState {
                distance_m: 0.0,
                tick: 0,
                current_stage: 0,
                stage_start_tick: 0,
                speed_kph: 0.0,
                active: false,
                finished: false,
                position: origin,
                direction,
                leg: 0,
                climb_m: None,
                photo_span: None,
            },
            awaiting_first_snapshot,
        }
    }

    pub fn with_elevation(mut self, profile: ElevationProfile) -> Self {
        self.state.climb_m = Some(profile.ascent_at(self.state.distance_m));
        self.elevation = Some(profile);
        self
    }

    pub fn with_photo_spans(mut self, spans: Vec<PhotoSpan>) -> Self {
        self.photo_spans = spans;
        self.refresh_photo_span();
        self
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn route(&self) -> &RouteTable {
        &self.route
    }

    pub fn elevation(&self) -> Option<&ElevationProfile> {
        self.elevation.as_ref()
    }

    pub fn chart(&self) -> Option<ChartView<'_>> {
        let profile = self.elevation.as_ref()?;
        Some(ChartView::new(profile, self.state.climb_m.unwrap_or(0.0)))
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn tick(&mut self) -> Phase {
        if !self.state.active {
            return self.phase();
        }

        let previous_distance = self.state.distance_m;
        let new_distance = previous_distance + self.state.speed_kph * METRES_PER_SECOND_PER_KPH;
        let new_tick = self.state.tick + 1;
        self.state.distance_m = new_distance;
        self.state.tick = new_tick;

        match route::locate(&self.route, new_distance) {
            RouteLocation::Exhausted => self.finish(),
            RouteLocation::OnLeg { leg, fraction } => {
                self.move_to(leg, fraction);
                self.update_stage(leg, new_tick);
            }
        }

        if let (Some(profile), Some(climb)) = (self.elevation.as_ref(), self.state.climb_m) {
            let gained = profile.ascent_at(new_distance) - profile.ascent_at(previous_distance);
            self.state.climb_m = Some(climb + gained);
        }

        tracing::debug!(
            tick = new_tick,
            distance_m = new_distance,
            leg = self.state.leg,
            stage = self.state.current_stage,
            "Advanced walk"
        );

        self.phase()
    }

    /// Replaces the progress state with an authoritative snapshot.
    ///
    /// A malformed snapshot is rejected and the current state kept. A stale
    /// snapshot (or the first one, when held) is adopted as inactive.
    pub fn apply_snapshot(
        &mut self,
        snapshot: &ProgressSnapshot,
        now: DateTime<Utc>,
    ) -> Result<Phase, SnapshotError> {
        self.validate_snapshot(snapshot)?;

        let first = std::mem::replace(&mut self.awaiting_first_snapshot, false);
        let age = now - snapshot.timestamp;
        let fresh = !first && age < self.options.freshness;

        if fresh {
            self.state.active = snapshot.active;
            self.state.speed_kph = if snapshot.active { snapshot.speed } else { 0.0 };
        } else {
            if snapshot.active {
                tracing::warn!(
                    age_seconds = age.num_seconds(),
                    first,
                    "Adopting snapshot as inactive"
                );
            }
            self.state.active = false;
            self.state.speed_kph = 0.0;
        }

        self.state.distance_m = snapshot.dist;
        self.state.tick = snapshot.tick;
        self.state.stage_start_tick = snapshot.start_tick;
        self.state.current_stage = snapshot.cur_stage;
        self.state.finished = false;
        for (stage, elapsed) in self.stages.iter_mut().zip(&snapshot.stage_times) {
            stage.elapsed_seconds = *elapsed;
        }

        match route::locate(&self.route, snapshot.dist) {
            RouteLocation::Exhausted => self.finish(),
            RouteLocation::OnLeg { leg, fraction } => self.move_to(leg, fraction),
        }

        if let Some(profile) = self.elevation.as_ref() {
            let climb = snapshot
                .elev
                .unwrap_or_else(|| profile.ascent_at(snapshot.dist));
            self.state.climb_m = Some(climb);
        }
        self.refresh_photo_span();

        tracing::info!(
            active = self.state.active,
            speed_kph = self.state.speed_kph,
            distance_m = self.state.distance_m,
            tick = self.state.tick,
            stage = self.state.current_stage,
            "Applied progress snapshot"
        );

        Ok(self.phase())
    }

    fn validate_snapshot(&self, snapshot: &ProgressSnapshot) -> Result<(), SnapshotError> {
        if !snapshot.dist.is_finite() || snapshot.dist < 0.0 {
            return Err(SnapshotError::InvalidDistance(snapshot.dist));
        }
        if !snapshot.speed.is_finite() || snapshot.speed < 0.0 {
            return Err(SnapshotError::InvalidSpeed(snapshot.speed));
        }
        if let Some(elev) = snapshot.elev {
            if !elev.is_finite() {
                return Err(SnapshotError::InvalidClimb(elev));
            }
        }
        if snapshot.stage_times.len() != self.stages.len() {
            return Err(SnapshotError::StageCountMismatch {
                expected: self.stages.len(),
                got: snapshot.stage_times.len(),
            });
        }
        // One past the last stage means every stage has been reached.
        if snapshot.cur_stage > self.stages.len() {
            return Err(SnapshotError::StageOutOfRange {
                index: snapshot.cur_stage,
                stages: self.stages.len(),
            });
        }
        if snapshot.start_tick > snapshot.tick {
            return Err(SnapshotError::StartAfterTick {
                start_tick: snapshot.start_tick,
                tick: snapshot.tick,
            });
        }
        Ok(())
    }

    fn move_to(&mut self, leg: usize, fraction: f64) {
        let points = self.route.points();
        self.state.position =
            geodesy::intermediate_point(points[leg].position(), points[leg + 1].position(), fraction);
        self.state.leg = leg;
        if let Some(direction) = direction_of(&self.route, leg) {
            self.state.direction = direction;
        }
    }

    fn finish(&mut self) {
        let last = self.route.last();
        self.state.position = last.position();
        self.state.leg = self.route.len() - 1;
        self.state.active = false;
        self.state.speed_kph = 0.0;
        self.state.finished = true;
        tracing::info!(
            distance_m = self.state.distance_m,
            tick = self.state.tick,
            "Reached end of route"
        );
    }

    fn update_stage(&mut self, leg: usize, new_tick: u64) {
        let index = self.state.current_stage;
        let Some(stage) = self.stages.get_mut(index) else {
            return;
        };

        stage.elapsed_seconds = new_tick.saturating_sub(self.state.stage_start_tick);
        if leg >= stage.leg {
            tracing::info!(
                stage = index,
                location = %stage.location,
                elapsed_seconds = stage.elapsed_seconds,
                "Stage reached"
            );
            self.state.current_stage = index + 1;
            self.state.stage_start_tick = new_tick;
            self.refresh_photo_span();
        }
    }

    fn refresh_photo_span(&mut self) {
        self.state.photo_span =
            stages::photo_span_for_leg(&self.photo_spans, self.state.leg).map(|span| span.id.clone());
    }
}

fn direction_of(route: &RouteTable, leg: usize) -> Option<Direction> {
    let points = route.points();
    let next = points.get(leg + 1)?;
    Some(if points[leg].lon < next.lon {
        Direction::East
    } else {
        Direction::West
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::route::Position;

    fn coord(lon: f64) -> RawCoordinate {
        RawCoordinate {
            lon,
            lat: 0.0,
            elevation: None,
        }
    }

    fn waypoint(location: &str, leg: usize) -> Waypoint {
        Waypoint {
            location: location.to_string(),
            leg,
        }
    }

    fn options() -> SimulatorOptions {
        SimulatorOptions {
            freshness: Duration::seconds(240),
            hold_first_snapshot: false,
        }
    }

    /// Ten vertices roughly 111 m apart, heading east along the equator.
    fn ten_point_walk() -> Simulator {
        let coords: Vec<_> = (0..10).map(|i| coord(i as f64 * 0.001)).collect();
        let waypoints = [waypoint("A", 2), waypoint("B", 5), waypoint("C", 9)];
        build_simulator(&coords, &waypoints, Vec::new(), false, options()).unwrap()
    }

    fn snapshot(sim: &Simulator, active: bool, speed: f64, dist: f64) -> ProgressSnapshot {
        ProgressSnapshot {
            active,
            speed,
            dist,
            tick: 100,
            start_tick: 40,
            cur_stage: 1,
            stage_times: vec![40; sim.stages().len()],
            elev: None,
            timestamp: Utc::now(),
        }
    }

    fn start(sim: &mut Simulator, speed: f64) {
        let snap = ProgressSnapshot {
            active: true,
            speed,
            dist: 0.0,
            tick: 0,
            start_tick: 0,
            cur_stage: 0,
            stage_times: vec![0; sim.stages().len()],
            elev: None,
            timestamp: Utc::now(),
        };
        sim.apply_snapshot(&snap, snap.timestamp).unwrap();
    }

    #[test]
    fn starts_inactive_at_origin() {
        let mut sim = ten_point_walk();
        assert_eq!(sim.phase(), Phase::Inactive);
        assert_eq!(sim.state().position, Position::new(0.0, 0.0));
        assert_eq!(sim.state().direction, Direction::East);

        assert_eq!(sim.tick(), Phase::Inactive);
        assert_eq!(sim.state().tick, 0);
        assert_eq!(sim.state().distance_m, 0.0);
    }

    #[test]
    fn tick_advances_one_second_of_travel() {
        let mut sim = ten_point_walk();
        start(&mut sim, 5.4);
        assert_eq!(sim.tick(), Phase::Active);
        assert!((sim.state().distance_m - 1.5).abs() < 1e-12);
        assert_eq!(sim.state().tick, 1);
        assert_eq!(sim.state().leg, 0);
        assert!(sim.state().position.lon > 0.0);
        assert_eq!(sim.stages()[0].elapsed_seconds, 1);
    }

    #[test]
    fn single_segment_walk_finishes_on_last_point() {
        // Roughly 990 m of equator.
        let coords = [coord(0.0), coord(0.0089)];
        let mut sim =
            build_simulator(&coords, &[waypoint("End", 1)], Vec::new(), false, options()).unwrap();
        start(&mut sim, 3600.0);

        assert_eq!(sim.tick(), Phase::Finished);
        let state = sim.state();
        assert!((state.distance_m - 1000.0).abs() < 1e-9);
        assert_eq!(state.position, Position::new(0.0, 0.0089));
        assert!(!state.active);
        assert_eq!(state.speed_kph, 0.0);

        // Terminal until a snapshot resets it.
        assert_eq!(sim.tick(), Phase::Finished);
        assert_eq!(sim.state().tick, 1);
    }

    #[test]
    fn walking_to_the_end_always_finishes() {
        let mut sim = ten_point_walk();
        start(&mut sim, 360.0);
        let total = sim.route().total_distance_m();
        let mut ticks = 0;
        while sim.state().distance_m < total {
            sim.tick();
            ticks += 1;
            assert!(ticks < 100, "walk never finished");
        }
        assert_eq!(sim.phase(), Phase::Finished);
        assert_eq!(sim.state().position, sim.route().last().position());
        assert_eq!(sim.state().speed_kph, 0.0);
    }

    #[test]
    fn stage_rolls_over_when_leg_is_reached() {
        let mut sim = ten_point_walk();
        start(&mut sim, 360.0);

        sim.tick();
        sim.tick();
        assert_eq!(sim.state().leg, 1);
        assert_eq!(sim.state().current_stage, 0);

        sim.tick();
        assert_eq!(sim.state().leg, 2);
        assert_eq!(sim.state().current_stage, 1);
        assert_eq!(sim.state().stage_start_tick, 3);
        assert_eq!(sim.stages()[0].elapsed_seconds, 3);

        sim.tick();
        assert_eq!(sim.stages()[1].elapsed_seconds, 1);
        assert_eq!(sim.stages()[0].elapsed_seconds, 3);
    }

    #[test]
    fn direction_follows_longitude() {
        let coords = [coord(0.0), coord(0.001), coord(0.0005)];
        let mut sim =
            build_simulator(&coords, &[waypoint("End", 2)], Vec::new(), false, options()).unwrap();
        start(&mut sim, 180.0);

        sim.tick();
        sim.tick();
        assert_eq!(sim.state().direction, Direction::East);
        sim.tick();
        assert_eq!(sim.state().leg, 1);
        assert_eq!(sim.state().direction, Direction::West);
    }

    #[test]
    fn fresh_snapshot_overrides_local_state() {
        let mut sim = ten_point_walk();
        start(&mut sim, 360.0);
        sim.tick();

        let snap = snapshot(&sim, true, 4.0, 250.0);
        let phase = sim.apply_snapshot(&snap, snap.timestamp).unwrap();

        assert_eq!(phase, Phase::Active);
        let state = sim.state();
        assert_eq!(state.distance_m, 250.0);
        assert_eq!(state.speed_kph, 4.0);
        assert_eq!(state.tick, 100);
        assert_eq!(state.stage_start_tick, 40);
        assert_eq!(state.current_stage, 1);
        assert_eq!(state.leg, 2);
        assert!(sim.stages().iter().all(|s| s.elapsed_seconds == 40));
    }

    #[test]
    fn inactive_fresh_snapshot_zeroes_speed() {
        let mut sim = ten_point_walk();
        let snap = snapshot(&sim, false, 4.0, 10.0);
        assert_eq!(sim.apply_snapshot(&snap, snap.timestamp).unwrap(), Phase::Inactive);
        assert_eq!(sim.state().speed_kph, 0.0);
    }

    #[test]
    fn stale_snapshot_is_adopted_inactive() {
        let mut sim = ten_point_walk();
        let snap = snapshot(&sim, true, 4.0, 250.0);
        let now = snap.timestamp + Duration::seconds(300);

        assert_eq!(sim.apply_snapshot(&snap, now).unwrap(), Phase::Inactive);
        assert!(!sim.state().active);
        assert_eq!(sim.state().speed_kph, 0.0);
        assert_eq!(sim.state().distance_m, 250.0);
    }

    #[test]
    fn first_snapshot_is_held_inactive() {
        let coords: Vec<_> = (0..4).map(|i| coord(i as f64 * 0.001)).collect();
        let mut sim = build_simulator(
            &coords,
            &[waypoint("End", 3)],
            Vec::new(),
            false,
            SimulatorOptions::default(),
        )
        .unwrap();
        let snap = snapshot(&sim, true, 4.0, 50.0);

        assert_eq!(sim.apply_snapshot(&snap, snap.timestamp).unwrap(), Phase::Inactive);
        assert_eq!(sim.apply_snapshot(&snap, snap.timestamp).unwrap(), Phase::Active);
    }

    #[test]
    fn snapshot_past_the_end_finishes() {
        let mut sim = ten_point_walk();
        let total = sim.route().total_distance_m();
        let snap = snapshot(&sim, true, 4.0, total + 1.0);
        assert_eq!(sim.apply_snapshot(&snap, snap.timestamp).unwrap(), Phase::Finished);
        assert_eq!(sim.state().position, sim.route().last().position());
        assert_eq!(sim.state().speed_kph, 0.0);
    }

    #[test]
    fn malformed_snapshot_keeps_last_good_state() {
        let mut sim = ten_point_walk();
        start(&mut sim, 360.0);
        sim.tick();
        let before = sim.state().clone();

        let mut snap = snapshot(&sim, true, 4.0, 250.0);
        snap.stage_times.pop();
        assert!(matches!(
            sim.apply_snapshot(&snap, snap.timestamp),
            Err(SnapshotError::StageCountMismatch { expected: 3, got: 2 })
        ));

        let mut snap = snapshot(&sim, true, 4.0, -5.0);
        assert!(matches!(
            sim.apply_snapshot(&snap, snap.timestamp),
            Err(SnapshotError::InvalidDistance(_))
        ));
        snap.dist = 5.0;
        snap.start_tick = 500;
        assert!(matches!(
            sim.apply_snapshot(&snap, snap.timestamp),
            Err(SnapshotError::StartAfterTick { .. })
        ));

        assert_eq!(sim.state().distance_m, before.distance_m);
        assert_eq!(sim.state().tick, before.tick);
        assert!(sim.state().active);
    }

    #[test]
    fn last_stage_rollover_stops_charging_time() {
        let coords: Vec<_> = (0..4).map(|i| coord(i as f64 * 0.001)).collect();
        let mut sim =
            build_simulator(&coords, &[waypoint("Mid", 1)], Vec::new(), false, options()).unwrap();
        start(&mut sim, 360.0);

        sim.tick();
        sim.tick();
        assert_eq!(sim.state().current_stage, 1);
        let charged = sim.stages()[0].elapsed_seconds;
        sim.tick();
        assert_eq!(sim.stages()[0].elapsed_seconds, charged);
        assert_eq!(sim.phase(), Phase::Active);
    }

    #[test]
    fn photo_span_follows_rollover() {
        let coords: Vec<_> = (0..10).map(|i| coord(i as f64 * 0.001)).collect();
        let spans = vec![PhotoSpan {
            id: "market".to_string(),
            start: 2,
            end: 5,
        }];
        let mut sim = build_simulator(
            &coords,
            &[waypoint("A", 2), waypoint("B", 9)],
            spans,
            false,
            options(),
        )
        .unwrap();
        assert_eq!(sim.state().photo_span, None);

        start(&mut sim, 360.0);
        for _ in 0..3 {
            sim.tick();
        }
        assert_eq!(sim.state().current_stage, 1);
        assert_eq!(sim.state().photo_span.as_deref(), Some("market"));
    }

    #[test]
    fn climb_tracks_distance_and_snapshot() {
        let coords: Vec<_> = [100.0, 120.0, 110.0, 150.0]
            .iter()
            .enumerate()
            .map(|(i, elev)| RawCoordinate {
                lon: i as f64 * 0.001,
                lat: 0.0,
                elevation: Some(*elev),
            })
            .collect();
        let mut sim =
            build_simulator(&coords, &[waypoint("Top", 3)], Vec::new(), true, options()).unwrap();
        assert_eq!(sim.state().climb_m, Some(0.0));
        assert_eq!(sim.elevation().unwrap().total_ascent, 60.0);

        let seg = sim.route().points()[1].distance_m;
        let snap = ProgressSnapshot {
            active: true,
            // One tick lands a metre past the top of the first climb.
            speed: (seg + 1.0) * 3.6,
            dist: 0.0,
            tick: 0,
            start_tick: 0,
            cur_stage: 0,
            stage_times: vec![0],
            elev: Some(0.0),
            timestamp: Utc::now(),
        };
        sim.apply_snapshot(&snap, snap.timestamp).unwrap();

        sim.tick();
        assert_eq!(sim.state().climb_m, Some(20.0));

        let chart = sim.chart().unwrap();
        assert!(chart.complete_ascent().count() > 0);
        assert!(chart.pending_ascent().count() > 0);

        let mut snap = snap;
        snap.dist = seg;
        snap.elev = Some(25.0);
        sim.apply_snapshot(&snap, snap.timestamp).unwrap();
        assert_eq!(sim.state().climb_m, Some(25.0));
    }

    #[test]
    fn plain_route_has_no_chart() {
        let sim = ten_point_walk();
        assert!(sim.chart().is_none());
        assert_eq!(sim.state().climb_m, None);
    }
}
