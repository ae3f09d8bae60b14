use crate::pipeline::elevation::process_elev_nodes;
use crate::types::elevation::{ChartPoint, ElevationChartData, ElevationProfile, ElevationSegment};

/// Partitions an elevation profile into completed and pending series at a
/// climb threshold. Each series is produced lazily on request.
#[derive(Debug, Clone, Copy)]
pub struct ChartView<'a> {
    profile: &'a ElevationProfile,
    threshold: f64,
}

impl<'a> ChartView<'a> {
    // Descents are split by the same ascent-based threshold, so a descent
    // still ahead of the walker can land in the completed series.
    pub fn new(profile: &'a ElevationProfile, threshold: f64) -> Self {
        Self { profile, threshold }
    }

    pub fn pending_ascent(&self) -> impl Iterator<Item = ChartPoint> + 'a {
        let profile: &'a ElevationProfile = self.profile;
        pending(&profile.ascents, self.threshold)
    }

    pub fn complete_ascent(&self) -> impl Iterator<Item = ChartPoint> + 'a {
        let profile: &'a ElevationProfile = self.profile;
        complete(&profile.ascents, self.threshold)
    }

    pub fn pending_descent(&self) -> impl Iterator<Item = ChartPoint> + 'a {
        let profile: &'a ElevationProfile = self.profile;
        pending(&profile.descents, self.threshold)
    }

    pub fn complete_descent(&self) -> impl Iterator<Item = ChartPoint> + 'a {
        let profile: &'a ElevationProfile = self.profile;
        complete(&profile.descents, self.threshold)
    }

    pub fn to_data(&self) -> ElevationChartData {
        ElevationChartData {
            climb_m: self.threshold,
            total_ascent_m: self.profile.total_ascent,
            total_descent_m: self.profile.total_descent,
            pending_ascent: self.pending_ascent().collect(),
            pending_descent: self.pending_descent().collect(),
            complete_ascent: self.complete_ascent().collect(),
            complete_descent: self.complete_descent().collect(),
        }
    }
}

fn pending(segments: &[ElevationSegment], threshold: f64) -> impl Iterator<Item = ChartPoint> + '_ {
    process_elev_nodes(segments.iter().filter(move |s| s.cumulative_climb > threshold))
}

fn complete(segments: &[ElevationSegment], threshold: f64) -> impl Iterator<Item = ChartPoint> + '_ {
    process_elev_nodes(segments.iter().filter(move |s| s.cumulative_climb <= threshold))
}
