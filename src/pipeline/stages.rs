use crate::error::RouteError;
use crate::types::route::RouteTable;
use crate::types::stage::{PhotoSpan, Stage, Waypoint};

/// Joins waypoints against the route table. Stage totals are whole metres.
pub fn annotate_stages(route: &RouteTable, waypoints: &[Waypoint]) -> Result<Vec<Stage>, RouteError> {
    if waypoints.is_empty() {
        return Err(RouteError::NoWaypoints);
    }

    let mut stages = Vec::with_capacity(waypoints.len());
    let mut previous_leg = 0;
    let mut previous_total = 0.0;

    for (index, waypoint) in waypoints.iter().enumerate() {
        if waypoint.leg < previous_leg {
            return Err(RouteError::InvalidWaypointOrder {
                index,
                leg: waypoint.leg,
                previous: previous_leg,
            });
        }
        let point = route
            .points()
            .get(waypoint.leg)
            .ok_or(RouteError::WaypointOutOfRange {
                index,
                leg: waypoint.leg,
                len: route.len(),
            })?;

        let total = point.distance_m.trunc();
        stages.push(Stage {
            location: waypoint.location.clone(),
            leg: waypoint.leg,
            stage_distance_m: total - previous_total,
            total_distance_m: total,
            elapsed_seconds: 0,
        });

        previous_leg = waypoint.leg;
        previous_total = total;
    }

    Ok(stages)
}

pub fn validate_photo_spans(spans: &[PhotoSpan]) -> Result<(), RouteError> {
    match spans.iter().find(|span| span.start > span.end) {
        Some(span) => Err(RouteError::InvalidPhotoSpan(span.id.clone())),
        None => Ok(()),
    }
}

pub fn photo_span_for_leg(spans: &[PhotoSpan], leg: usize) -> Option<&PhotoSpan> {
    spans.iter().find(|span| span.covers(leg))
}
