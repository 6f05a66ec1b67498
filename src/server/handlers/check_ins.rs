use axum::extract::{Extension, Json};

use crate::{
    api::DynAPI,
    auth::User,
    entities::{CheckIn, NewCheckIn},
    error::Error,
};

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<CheckIn>>, Error> {
    let check_ins = api.list_check_ins().await?;

    Ok(check_ins.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<NewCheckIn>,
) -> Result<Json<CheckIn>, Error> {
    let check_in = api.create_check_in(user, params).await?;

    Ok(check_in.into())
}
