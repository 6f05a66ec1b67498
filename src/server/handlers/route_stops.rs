use axum::extract::{Extension, Json, Path};
use uuid::Uuid;

use super::Deleted;
use crate::{
    api::DynAPI,
    auth::User,
    entities::{NewRouteStop, RouteStop},
    error::Error,
};

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<RouteStop>>, Error> {
    let stops = api.list_route_stops().await?;

    Ok(stops.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<NewRouteStop>,
) -> Result<Json<RouteStop>, Error> {
    let stop = api.create_route_stop(user, params).await?;

    Ok(stop.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<NewRouteStop>,
) -> Result<Json<RouteStop>, Error> {
    let stop = api.update_route_stop(user, id, params).await?;

    Ok(stop.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, Error> {
    let deleted = api.delete_route_stop(user, id).await?;

    Ok(Deleted { deleted }.into())
}
