//! Spherical-earth helpers. Ellipsoid effects are ignored.

use crate::types::route::Position;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub fn distance_m(from: Position, to: Position) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + (d_lon / 2.0).sin().powi(2) * from.lat.to_radians().cos() * to.lat.to_radians().cos();
    let a = a.clamp(0.0, 1.0);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

fn angular_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let h = ((lat1 - lat2) / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * ((lon1 - lon2) / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Point at fraction `f` along the minor great-circle arc from `from` to `to`.
///
/// Coincident (or antipodal) endpoints have no unique arc; `from` is returned.
pub fn intermediate_point(from: Position, to: Position, f: f64) -> Position {
    let lat1 = from.lat.to_radians();
    let lon1 = from.lon.to_radians();
    let lat2 = to.lat.to_radians();
    let lon2 = to.lon.to_radians();

    let d = angular_distance(lat1, lon1, lat2, lon2);
    let sin_d = d.sin();
    if sin_d.abs() < f64::EPSILON {
        return from;
    }

    let a = ((1.0 - f) * d).sin() / sin_d;
    let b = (f * d).sin() / sin_d;

    let x = a * lat1.cos() * lon1.cos() + b * lat2.cos() * lon2.cos();
    let y = a * lat1.cos() * lon1.sin() + b * lat2.cos() * lon2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt());
    let lon = y.atan2(x);

    Position::new(lat.to_degrees(), lon.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn close(a: Position, b: Position) -> bool {
        (a.lat - b.lat).abs() < TOLERANCE && (a.lon - b.lon).abs() < TOLERANCE
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Position::new(12.1364, -86.2514);
        assert_eq!(distance_m(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = distance_m(Position::new(0.0, 0.0), Position::new(0.0, 1.0));
        let expected = EARTH_RADIUS_M * 1f64.to_radians();
        assert!((d - expected).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Position::new(12.1364, -86.2514);
        let b = Position::new(11.2530, -85.8706);
        assert!((distance_m(a, b) - distance_m(b, a)).abs() < 1e-6);
    }

    #[test]
    fn interpolation_hits_endpoints() {
        let a = Position::new(12.1364, -86.2514);
        let b = Position::new(11.2530, -85.8706);
        assert!(close(intermediate_point(a, b, 0.0), a));
        assert!(close(intermediate_point(a, b, 1.0), b));
    }

    #[test]
    fn interpolation_midpoint_on_equator() {
        let mid = intermediate_point(Position::new(0.0, 0.0), Position::new(0.0, 2.0), 0.5);
        assert!(close(mid, Position::new(0.0, 1.0)), "got {mid:?}");
    }

    #[test]
    fn interpolation_between_coincident_points_returns_start() {
        let p = Position::new(51.5, -0.12);
        let out = intermediate_point(p, p, 0.4);
        assert_eq!(out, p);
        assert!(out.lat.is_finite() && out.lon.is_finite());
    }

    #[test]
    fn interpolated_distance_is_proportional() {
        let a = Position::new(12.0, -86.0);
        let b = Position::new(12.01, -85.99);
        let total = distance_m(a, b);
        let p = intermediate_point(a, b, 0.25);
        assert!((distance_m(a, p) - total * 0.25).abs() < 1e-3);
    }
}
