use serde::{Deserialize, Serialize};

use super::route_geometry::METERS_PER_MILE;
use crate::format::format_distance;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceSource {
    /// Road distance reported by the routing provider.
    Road,
    /// Sum of haversine hops between consecutive check-ins.
    GreatCircle,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TripStatistics {
    pub days_on_road: u32,
    pub distance_miles: f64,
    pub distance_label: String,
    pub distance_source: DistanceSource,
    pub distinct_region_count: usize,
    pub photo_count: u64,
    pub skipped_records: usize,
    pub started_on: Option<String>,
    pub last_check_in_at: Option<String>,
}

impl TripStatistics {
    pub fn set_great_circle_distance(&mut self, miles: f64) {
        self.distance_miles = miles;
        self.distance_label = format_distance(miles * METERS_PER_MILE);
        self.distance_source = DistanceSource::GreatCircle;
    }

    /// Road distance takes precedence over the great-circle estimate.
    pub fn set_road_distance(&mut self, meters: f64) {
        self.distance_miles = meters / METERS_PER_MILE;
        self.distance_label = format_distance(meters);
        self.distance_source = DistanceSource::Road;
    }
}
