use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{optional_text, require_text, Coordinates};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub description: Option<String>,
    pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewCheckIn {
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub description: Option<String>,
}

impl CheckIn {
    pub fn new(user_id: Uuid, params: NewCheckIn) -> Result<Self, Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            location: require_text("location", &params.location)?,
            coordinates: params.coordinates.validate()?,
            description: optional_text(params.description),
            user_id,
        })
    }
}

#[test]
fn new_check_in_test() {
    let user_id = Uuid::new_v4();
    let params: NewCheckIn = serde_json::from_value(serde_json::json!({
        "location": "  Moab, UT ",
        "lat": 38.5733,
        "lng": -109.5498,
        "description": "   "
    }))
    .unwrap();

    let check_in = CheckIn::new(user_id, params).unwrap();

    assert_eq!(check_in.location, "Moab, UT");
    assert_eq!(check_in.coordinates, Coordinates::new(38.5733, -109.5498));
    assert_eq!(check_in.description, None);
    assert_eq!(check_in.user_id, user_id);

    let json = serde_json::to_value(&check_in).unwrap();
    assert_eq!(json["lat"], 38.5733);
    assert_eq!(json["lng"], -109.5498);
}

#[test]
fn rejects_blank_location_test() {
    let params = NewCheckIn {
        location: " ".into(),
        coordinates: Coordinates::new(0.0, 0.0),
        description: None,
    };

    let err = CheckIn::new(Uuid::new_v4(), params).unwrap_err();
    assert_eq!(err.code, 101);
}
