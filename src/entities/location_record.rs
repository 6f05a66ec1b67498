use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CheckIn, Coordinates, RouteStop};

/// Uniform view of a check-in or route stop for aggregation. Fields that
/// could not be read are `None` so the record can be skipped rather than
/// failing a whole aggregation pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: Uuid,
    pub location: String,
    pub coordinates: Option<Coordinates>,
    pub created_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl LocationRecord {
    /// Builds a record from loosely typed parts, e.g. an RFC 3339 timestamp
    /// string. Unparseable parts become `None`.
    pub fn parse(
        id: Uuid,
        location: &str,
        coordinates: Option<Coordinates>,
        created_at: &str,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            location: location.to_string(),
            coordinates: coordinates.filter(|c| c.is_valid()),
            created_at: DateTime::parse_from_rfc3339(created_at)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            note,
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.created_at.is_some() && self.coordinates.map_or(false, |c| c.is_valid())
    }
}

impl From<&CheckIn> for LocationRecord {
    fn from(check_in: &CheckIn) -> Self {
        Self {
            id: check_in.id,
            location: check_in.location.clone(),
            coordinates: Some(check_in.coordinates),
            created_at: Some(check_in.created_at),
            note: check_in.description.clone(),
        }
    }
}

impl From<&RouteStop> for LocationRecord {
    fn from(stop: &RouteStop) -> Self {
        Self {
            id: stop.id,
            location: stop.location.clone(),
            coordinates: Some(stop.coordinates),
            created_at: Some(stop.created_at),
            note: stop.description.clone(),
        }
    }
}

#[test]
fn parse_test() {
    let record = LocationRecord::parse(
        Uuid::new_v4(),
        "Chicago, IL",
        Some(Coordinates::new(41.8781, -87.6298)),
        "2025-06-09T18:08:57.362026+00:00",
        None,
    );
    assert!(record.is_well_formed());

    let bad_time = LocationRecord::parse(
        Uuid::new_v4(),
        "Chicago, IL",
        Some(Coordinates::new(41.8781, -87.6298)),
        "yesterday",
        None,
    );
    assert_eq!(bad_time.created_at, None);
    assert!(!bad_time.is_well_formed());

    let bad_coordinates = LocationRecord::parse(
        Uuid::new_v4(),
        "Chicago, IL",
        Some(Coordinates::new(141.0, 0.0)),
        "2025-06-09T18:08:57Z",
        None,
    );
    assert_eq!(bad_coordinates.coordinates, None);
    assert!(!bad_coordinates.is_well_formed());
}

#[test]
fn from_records_test() {
    use super::{NewCheckIn, NewRouteStop};

    let user_id = Uuid::new_v4();
    let check_in = CheckIn::new(
        user_id,
        NewCheckIn {
            location: "Moab, UT".into(),
            coordinates: Coordinates::new(38.5733, -109.5498),
            description: Some("Arches at dawn".into()),
        },
    )
    .unwrap();

    let record = LocationRecord::from(&check_in);
    assert_eq!(record.id, check_in.id);
    assert_eq!(record.created_at, Some(check_in.created_at));
    assert_eq!(record.note.as_deref(), Some("Arches at dawn"));
    assert!(record.is_well_formed());

    let stop = RouteStop::new(
        user_id,
        NewRouteStop {
            location: "Bryce Canyon, UT".into(),
            coordinates: Coordinates::new(37.593, -112.1871),
            planned_date: None,
            visited: false,
            description: None,
        },
    )
    .unwrap();

    let record = LocationRecord::from(&stop);
    assert_eq!(record.location, "Bryce Canyon, UT");
    assert_eq!(record.coordinates, Some(stop.coordinates));
    assert!(record.is_well_formed());
}
