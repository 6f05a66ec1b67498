pub mod check_ins;
pub mod directions;
pub mod events;
pub mod geocode;
pub mod guestbook;
pub mod photos;
pub mod route_stops;
pub mod stats;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct Deleted {
    pub deleted: bool,
}
