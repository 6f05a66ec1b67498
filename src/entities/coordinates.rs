use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

pub const EARTH_RADIUS_MILES: f64 = 3958.8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(self) -> Result<Self, Error> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(invalid_input_error().with_details(format!(
                "coordinates out of range: {}, {}",
                self.lat, self.lng
            )))
        }
    }

    /// Great-circle distance in miles (haversine).
    pub fn distance_miles(&self, other: &Coordinates) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = (other.lat - self.lat).to_radians();
        let dlng = (other.lng - self.lng).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_MILES * c
    }

    /// `[lng, lat]` order, as routing providers expect.
    pub fn to_lng_lat(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

#[test]
fn validity_test() {
    assert!(Coordinates::new(0.0, 0.0).is_valid());
    assert!(Coordinates::new(-90.0, 180.0).is_valid());
    assert!(!Coordinates::new(90.5, 0.0).is_valid());
    assert!(!Coordinates::new(0.0, -181.0).is_valid());
    assert!(!Coordinates::new(f64::NAN, 0.0).is_valid());
    assert!(Coordinates::new(100.0, 0.0).validate().is_err());
}

#[test]
fn one_degree_of_longitude_at_equator_test() {
    let distance = Coordinates::new(0.0, 0.0).distance_miles(&Coordinates::new(0.0, 1.0));

    assert!((distance - 69.17).abs() < 0.1, "distance was {}", distance);
}

#[test]
fn distance_is_symmetric_test() {
    let chicago = Coordinates::new(41.8781, -87.6298);
    let denver = Coordinates::new(39.7392, -104.9903);

    let there = chicago.distance_miles(&denver);
    let back = denver.distance_miles(&chicago);

    assert!((there - back).abs() < 1e-9);
    assert!(there > 900.0 && there < 940.0, "distance was {}", there);
    assert_eq!(chicago.distance_miles(&chicago), 0.0);
}
