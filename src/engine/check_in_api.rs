use super::helpers::{fetch_records, insert_record};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::CheckInAPI,
    auth::User,
    entities::{CheckIn, NewCheckIn, RecordKind},
    error::Error,
};

#[async_trait]
impl CheckInAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_check_ins(&self) -> Result<Vec<CheckIn>, Error> {
        fetch_records(&self.pool, "SELECT data FROM check_ins ORDER BY created_at ASC").await
    }

    #[tracing::instrument(skip(self))]
    async fn create_check_in(&self, user: User, params: NewCheckIn) -> Result<CheckIn, Error> {
        self.authorize(user.clone(), "write")?;

        let check_in = CheckIn::new(user.id, params)?;

        let mut tx = self.pool.begin().await?;
        insert_record(
            &mut tx,
            RecordKind::CheckIns,
            &check_in.id,
            &check_in.created_at,
            &check_in,
        )
        .await?;
        tx.commit().await?;

        tracing::info!(id = %check_in.id, location = %check_in.location, "checked in");

        Ok(check_in)
    }
}
