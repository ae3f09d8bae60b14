use std::collections::VecDeque;

use crate::error::RouteError;
use crate::types::elevation::{ChartPoint, ElevationProfile, ElevationSegment};
use crate::types::route::{RawCoordinate, RouteTable};

/// Splits the route into ascending and descending segments.
///
/// A flat segment counts as ascending with zero gain. `route` must have been
/// built from `coords`.
pub fn build_profile(
    coords: &[RawCoordinate],
    route: &RouteTable,
) -> Result<ElevationProfile, RouteError> {
    if coords.len() < 2 || coords.len() != route.len() {
        return Err(RouteError::DegenerateRoute(coords.len()));
    }

    let elevations = coords
        .iter()
        .enumerate()
        .map(|(idx, c)| match c.elevation {
            Some(elev) if elev.is_finite() => Ok(elev),
            _ => Err(RouteError::MissingElevation(idx)),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut profile = ElevationProfile {
        total_distance: route.total_distance_m(),
        ..Default::default()
    };

    let points = route.points();
    for i in 1..elevations.len() {
        let elev_start = elevations[i - 1];
        let elev_end = elevations[i];
        let dist_start = points[i - 1].distance_m;
        let dist_end = points[i].distance_m;

        if elev_end >= elev_start {
            profile.total_ascent += elev_end - elev_start;
            profile.ascents.push(ElevationSegment {
                elev_start,
                elev_end,
                dist_start,
                dist_end,
                cumulative_climb: profile.total_ascent,
            });
        } else {
            profile.total_descent += elev_start - elev_end;
            profile.descents.push(ElevationSegment {
                elev_start,
                elev_end,
                dist_start,
                dist_end,
                cumulative_climb: profile.total_descent,
            });
        }
    }

    Ok(profile)
}

impl ElevationProfile {
    pub fn ascent_at(&self, distance_m: f64) -> f64 {
        let completed = self.ascents.partition_point(|s| s.dist_end <= distance_m);
        let base = completed
            .checked_sub(1)
            .map(|idx| self.ascents[idx].cumulative_climb)
            .unwrap_or(0.0);

        match self.ascents.get(completed) {
            Some(seg) if seg.dist_start < distance_m => {
                let span = seg.dist_end - seg.dist_start;
                let fraction = if span > 0.0 {
                    (distance_m - seg.dist_start) / span
                } else {
                    0.0
                };
                base + fraction * (seg.elev_end - seg.elev_start)
            }
            _ => base,
        }
    }
}

/// Turns a filtered run of segments into area-chart nodes.
///
/// The output starts and ends on the zero baseline and drops back to it
/// wherever two consecutive segments are not contiguous, so each run renders
/// as a closed polygon.
pub fn process_elev_nodes<'a, I>(segments: I) -> ElevNodes<I::IntoIter>
where
    I: IntoIterator<Item = &'a ElevationSegment>,
{
    ElevNodes {
        segments: segments.into_iter(),
        pending: VecDeque::with_capacity(4),
        last_end: None,
        exhausted: false,
    }
}

pub struct ElevNodes<I> {
    segments: I,
    pending: VecDeque<ChartPoint>,
    last_end: Option<f64>,
    exhausted: bool,
}

impl<'a, I> Iterator for ElevNodes<I>
where
    I: Iterator<Item = &'a ElevationSegment>,
{
    type Item = ChartPoint;

    fn next(&mut self) -> Option<ChartPoint> {
        loop {
            if let Some(point) = self.pending.pop_front() {
                return Some(point);
            }
            if self.exhausted {
                return None;
            }

            match self.segments.next() {
                Some(seg) => {
                    match self.last_end {
                        Some(end) if end == seg.dist_start => {}
                        Some(end) => {
                            self.pending.push_back(ChartPoint::new(end, 0.0));
                            self.pending.push_back(ChartPoint::new(seg.dist_start, 0.0));
                            self.pending
                                .push_back(ChartPoint::new(seg.dist_start, seg.elev_start));
                        }
                        None => {
                            self.pending.push_back(ChartPoint::new(seg.dist_start, 0.0));
                            self.pending
                                .push_back(ChartPoint::new(seg.dist_start, seg.elev_start));
                        }
                    }
                    self.pending
                        .push_back(ChartPoint::new(seg.dist_end, seg.elev_end));
                    self.last_end = Some(seg.dist_end);
                }
                None => {
                    self.exhausted = true;
                    if let Some(end) = self.last_end {
                        self.pending.push_back(ChartPoint::new(end, 0.0));
                    }
                }
            }
        }
    }
}
