mod check_in;
mod coordinates;
mod guestbook;
mod location_record;
mod photo;
mod record_kind;
mod route_geometry;
mod route_stop;
mod statistics;

pub use check_in::{CheckIn, NewCheckIn};
pub use coordinates::Coordinates;
pub use guestbook::{GuestbookEntry, NewGuestbookEntry};
pub use location_record::LocationRecord;
pub use photo::{NewPhoto, Photo, PhotoFile};
pub use record_kind::{RecordKind, Snapshot};
pub use route_geometry::{RouteGeometry, METERS_PER_MILE};
pub use route_stop::{NewRouteStop, RouteStop};
pub use statistics::{DistanceSource, TripStatistics};

use crate::error::{invalid_input_error, Error};

pub(crate) fn require_text(field: &str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(invalid_input_error().with_details(format!("{} must not be empty", field)));
    }

    Ok(value.to_string())
}

pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
