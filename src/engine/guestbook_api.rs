use super::helpers::{fetch_records, insert_record};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::GuestbookAPI,
    auth::User,
    entities::{GuestbookEntry, NewGuestbookEntry, RecordKind},
    error::Error,
};

#[async_trait]
impl GuestbookAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_guestbook_entries(&self) -> Result<Vec<GuestbookEntry>, Error> {
        fetch_records(&self.pool, "SELECT data FROM guestbook ORDER BY created_at DESC").await
    }

    #[tracing::instrument(skip(self))]
    async fn sign_guestbook(
        &self,
        user: User,
        params: NewGuestbookEntry,
    ) -> Result<GuestbookEntry, Error> {
        self.authorize(user, "sign_guestbook")?;

        let entry = GuestbookEntry::new(params)?;

        let mut tx = self.pool.begin().await?;
        insert_record(
            &mut tx,
            RecordKind::Guestbook,
            &entry.id,
            &entry.created_at,
            &entry,
        )
        .await?;
        tx.commit().await?;

        Ok(entry)
    }
}
