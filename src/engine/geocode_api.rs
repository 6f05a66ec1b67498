use super::Engine;

use async_trait::async_trait;

use crate::{
    api::GeocodeAPI,
    entities::Coordinates,
    error::Error,
    external::nominatim::{self, PlaceCandidate},
};

#[async_trait]
impl GeocodeAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn search_places(&self, query: String) -> Result<Vec<PlaceCandidate>, Error> {
        nominatim::search(&self.config.geocoding, &query).await
    }

    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<String>, Error> {
        nominatim::reverse(&self.config.geocoding, coordinates).await
    }
}
