use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{
    CheckIn, Coordinates, GuestbookEntry, NewCheckIn, NewGuestbookEntry, NewPhoto, NewRouteStop,
    Photo, PhotoFile, RecordKind, RouteStop, Snapshot, TripStatistics,
};
use crate::error::Error;
use crate::external::nominatim::PlaceCandidate;

#[async_trait]
pub trait CheckInAPI {
    /// Oldest first.
    async fn list_check_ins(&self) -> Result<Vec<CheckIn>, Error>;
    async fn create_check_in(&self, user: User, params: NewCheckIn) -> Result<CheckIn, Error>;
}

#[async_trait]
pub trait PhotoAPI {
    /// Newest first.
    async fn list_photos(&self) -> Result<Vec<Photo>, Error>;
    async fn count_photos(&self) -> Result<u64, Error>;
    async fn create_photo(
        &self,
        user: User,
        params: NewPhoto,
        file: PhotoFile,
    ) -> Result<Photo, Error>;
    async fn delete_photo(&self, user: User, id: Uuid) -> Result<bool, Error>;
}

#[async_trait]
pub trait GuestbookAPI {
    /// Newest first.
    async fn list_guestbook_entries(&self) -> Result<Vec<GuestbookEntry>, Error>;
    async fn sign_guestbook(
        &self,
        user: User,
        params: NewGuestbookEntry,
    ) -> Result<GuestbookEntry, Error>;
}

#[async_trait]
pub trait RouteStopAPI {
    /// By planned date (undated last), then creation time.
    async fn list_route_stops(&self) -> Result<Vec<RouteStop>, Error>;
    async fn create_route_stop(&self, user: User, params: NewRouteStop)
        -> Result<RouteStop, Error>;
    async fn update_route_stop(
        &self,
        user: User,
        id: Uuid,
        params: NewRouteStop,
    ) -> Result<RouteStop, Error>;
    async fn delete_route_stop(&self, user: User, id: Uuid) -> Result<bool, Error>;
}

#[async_trait]
pub trait StatsAPI {
    async fn trip_statistics(&self) -> Result<TripStatistics, Error>;
}

#[async_trait]
pub trait GeocodeAPI {
    async fn search_places(&self, query: String) -> Result<Vec<PlaceCandidate>, Error>;
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<String>, Error>;
}

/// Staleness signals plus a way to refetch. A signal says only that some
/// record of a kind changed; consumers reload the full list.
#[async_trait]
pub trait RealtimeAPI {
    fn subscribe(&self) -> broadcast::Receiver<RecordKind>;
    async fn snapshot(&self, kind: RecordKind) -> Result<Snapshot, Error>;
}

pub trait API:
    CheckInAPI + PhotoAPI + GuestbookAPI + RouteStopAPI + StatsAPI + GeocodeAPI + RealtimeAPI
{
}

pub type DynAPI = Arc<dyn API + Send + Sync>;
