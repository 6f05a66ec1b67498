use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{CheckIn, GuestbookEntry, Photo, RouteStop};
use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    CheckIns,
    Photos,
    Guestbook,
    RouteStops,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::CheckIns,
        RecordKind::Photos,
        RecordKind::Guestbook,
        RecordKind::RouteStops,
    ];

    /// Table name, also used as the change notification payload.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckIns => "check_ins",
            Self::Photos => "photos",
            Self::Guestbook => "guestbook",
            Self::RouteStops => "route_stops",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RecordKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| invalid_input_error().with_details(format!("unknown record kind: {}", s)))
    }
}

/// The full current list of one record kind.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Snapshot {
    CheckIns(Vec<CheckIn>),
    Photos(Vec<Photo>),
    Guestbook(Vec<GuestbookEntry>),
    RouteStops(Vec<RouteStop>),
}

impl Snapshot {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::CheckIns(_) => RecordKind::CheckIns,
            Self::Photos(_) => RecordKind::Photos,
            Self::Guestbook(_) => RecordKind::Guestbook,
            Self::RouteStops(_) => RecordKind::RouteStops,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::CheckIns(records) => records.len(),
            Self::Photos(records) => records.len(),
            Self::Guestbook(records) => records.len(),
            Self::RouteStops(records) => records.len(),
        }
    }
}

#[test]
fn kind_names_test() {
    for kind in RecordKind::ALL {
        assert_eq!(kind.name().parse::<RecordKind>().unwrap(), kind);
        assert_eq!(serde_json::to_value(kind).unwrap(), kind.name());
    }

    assert!("trips".parse::<RecordKind>().is_err());
}
