use axum::extract::{Extension, Json};

use crate::{
    api::DynAPI,
    auth::User,
    entities::{GuestbookEntry, NewGuestbookEntry},
    error::Error,
};

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<GuestbookEntry>>, Error> {
    let entries = api.list_guestbook_entries().await?;

    Ok(entries.into())
}

pub async fn sign(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<NewGuestbookEntry>,
) -> Result<Json<GuestbookEntry>, Error> {
    let entry = api.sign_guestbook(user, params).await?;

    Ok(entry.into())
}
