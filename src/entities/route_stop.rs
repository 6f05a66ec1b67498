use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{optional_text, require_text, Coordinates};
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteStop {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub planned_date: Option<NaiveDate>,
    pub visited: bool,
    pub description: Option<String>,
    pub user_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewRouteStop {
    pub location: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
    pub planned_date: Option<NaiveDate>,
    #[serde(default)]
    pub visited: bool,
    pub description: Option<String>,
}

impl RouteStop {
    pub fn new(user_id: Uuid, params: NewRouteStop) -> Result<Self, Error> {
        let mut stop = Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            location: String::new(),
            coordinates: params.coordinates,
            planned_date: None,
            visited: false,
            description: None,
            user_id,
        };
        stop.apply(params)?;

        Ok(stop)
    }

    /// Overwrites the editable fields; identity, owner and creation time stay.
    pub fn apply(&mut self, params: NewRouteStop) -> Result<(), Error> {
        self.location = require_text("location", &params.location)?;
        self.coordinates = params.coordinates.validate()?;
        self.planned_date = params.planned_date;
        self.visited = params.visited;
        self.description = optional_text(params.description);

        Ok(())
    }
}

#[test]
fn apply_keeps_identity_test() {
    let user_id = Uuid::new_v4();
    let mut stop = RouteStop::new(
        user_id,
        NewRouteStop {
            location: "Denver, CO".into(),
            coordinates: Coordinates::new(39.7392, -104.9903),
            planned_date: NaiveDate::from_ymd_opt(2025, 6, 20),
            visited: false,
            description: None,
        },
    )
    .unwrap();
    let id = stop.id;
    let created_at = stop.created_at;

    stop.apply(NewRouteStop {
        location: "Boulder, CO".into(),
        coordinates: Coordinates::new(40.015, -105.2705),
        planned_date: None,
        visited: true,
        description: Some("Flatirons".into()),
    })
    .unwrap();

    assert_eq!(stop.id, id);
    assert_eq!(stop.created_at, created_at);
    assert_eq!(stop.user_id, user_id);
    assert_eq!(stop.location, "Boulder, CO");
    assert!(stop.visited);
    assert_eq!(stop.planned_date, None);
    assert_eq!(stop.description.as_deref(), Some("Flatirons"));
}

#[test]
fn visited_defaults_to_false_test() {
    let params: NewRouteStop = serde_json::from_value(serde_json::json!({
        "location": "Chicago, IL",
        "lat": 41.8781,
        "lng": -87.6298,
        "planned_date": "2025-06-01"
    }))
    .unwrap();

    assert!(!params.visited);
    assert_eq!(params.planned_date, NaiveDate::from_ymd_opt(2025, 6, 1));
}
