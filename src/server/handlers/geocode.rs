use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::{
    api::DynAPI,
    entities::Coordinates,
    error::Error,
    external::nominatim::PlaceCandidate,
};

#[derive(Serialize, Deserialize)]
pub struct SearchParams {
    q: String,
}

#[derive(Serialize, Deserialize)]
pub struct ReverseResponse {
    name: Option<String>,
}

pub async fn search(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PlaceCandidate>>, Error> {
    let places = api.search_places(params.q).await?;

    Ok(places.into())
}

pub async fn reverse(
    Extension(api): Extension<DynAPI>,
    Query(coordinates): Query<Coordinates>,
) -> Result<Json<ReverseResponse>, Error> {
    let name = api.reverse_geocode(coordinates).await?;

    Ok(ReverseResponse { name }.into())
}
