use axum::extract::{Extension, Json};

use crate::{api::DynAPI, entities::TripStatistics, error::Error};

pub async fn find(Extension(api): Extension<DynAPI>) -> Result<Json<TripStatistics>, Error> {
    let statistics = api.trip_statistics().await?;

    Ok(statistics.into())
}
