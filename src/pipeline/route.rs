use crate::error::RouteError;
use crate::pipeline::geodesy;
use crate::types::route::{RawCoordinate, RouteLocation, RoutePoint, RouteTable};

/// Annotates every vertex with its distance from the route origin.
///
/// Repeated vertices are kept so waypoint leg indexes keep pointing at the
/// input vertices; they produce zero-length segments that [`locate`] never
/// lands in.
pub fn build_route(coords: &[RawCoordinate]) -> Result<RouteTable, RouteError> {
    if coords.len() < 2 {
        return Err(RouteError::DegenerateRoute(coords.len()));
    }
    if let Some(idx) = coords
        .iter()
        .position(|c| !c.lat.is_finite() || !c.lon.is_finite())
    {
        return Err(RouteError::NonFiniteCoordinate(idx));
    }

    let mut points = Vec::with_capacity(coords.len());
    let mut total = 0.0;
    points.push(RoutePoint {
        lon: coords[0].lon,
        lat: coords[0].lat,
        distance_m: 0.0,
    });

    for pair in coords.windows(2) {
        total += geodesy::distance_m(pair[0].position(), pair[1].position());
        points.push(RoutePoint {
            lon: pair[1].lon,
            lat: pair[1].lat,
            distance_m: total,
        });
    }

    Ok(RouteTable::from_validated(points))
}

pub fn locate(route: &RouteTable, distance_m: f64) -> RouteLocation {
    let points = route.points();
    let first_beyond = points.partition_point(|p| p.distance_m <= distance_m);

    if first_beyond >= points.len() {
        return RouteLocation::Exhausted;
    }
    // Distances before the origin clamp onto the first segment.
    let leg = first_beyond.saturating_sub(1);

    let start = points[leg].distance_m;
    let span = points[leg + 1].distance_m - start;
    let fraction = ((distance_m - start) / span).clamp(0.0, 1.0);

    RouteLocation::OnLeg { leg, fraction }
}
