use serde::{Deserialize, Serialize};

use super::Coordinates;

pub const METERS_PER_MILE: f64 = 1609.34;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<Coordinates>,
    pub distance_meters: f64,
}

impl RouteGeometry {
    pub fn distance_miles(&self) -> f64 {
        self.distance_meters / METERS_PER_MILE
    }
}
