use super::helpers::{delete_record, fetch_photo_for_update, fetch_records, insert_record};
use super::Engine;

use async_trait::async_trait;
use sqlx::{Executor, Row};
use uuid::Uuid;

use crate::{
    api::PhotoAPI,
    auth::User,
    entities::{NewPhoto, Photo, PhotoFile, RecordKind},
    error::Error,
    external::storage,
};

#[async_trait]
impl PhotoAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_photos(&self) -> Result<Vec<Photo>, Error> {
        fetch_records(&self.pool, "SELECT data FROM photos ORDER BY created_at DESC").await
    }

    #[tracing::instrument(skip(self))]
    async fn count_photos(&self) -> Result<u64, Error> {
        let row = self
            .pool
            .fetch_one(sqlx::query("SELECT COUNT(*) AS count FROM photos"))
            .await?;
        let count: i64 = row.try_get("count")?;

        Ok(count.max(0) as u64)
    }

    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn create_photo(
        &self,
        user: User,
        params: NewPhoto,
        file: PhotoFile,
    ) -> Result<Photo, Error> {
        self.authorize(user.clone(), "write")?;

        let params = params.validate()?;
        let path = file.storage_path(user.id);
        let url = storage::upload(&self.config.storage, &path, &file.content_type, file.bytes)
            .await?;

        let photo = Photo::new(user.id, params, path, url);

        if let Err(err) = self.insert_photo(&photo).await {
            // the row never landed, so the blob would be orphaned
            if let Err(cleanup) = storage::remove(&self.config.storage, &photo.path).await {
                tracing::warn!(path = %photo.path, error = %cleanup, "orphaned photo blob");
            }
            return Err(err);
        }

        tracing::info!(id = %photo.id, path = %photo.path, "photo uploaded");

        Ok(photo)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_photo(&self, user: User, id: Uuid) -> Result<bool, Error> {
        self.authorize(user, "write")?;

        let mut tx = self.pool.begin().await?;

        let photo = match fetch_photo_for_update(&mut tx, &id).await? {
            Some(photo) => photo,
            None => return Ok(false),
        };

        delete_record(&mut tx, RecordKind::Photos, &id).await?;

        // row and blob go together; a failed blob removal rolls the row back
        storage::remove(&self.config.storage, &photo.path).await?;

        tx.commit().await?;

        Ok(true)
    }
}

impl Engine {
    async fn insert_photo(&self, photo: &Photo) -> Result<(), Error> {
        let mut tx = self.pool.begin().await?;
        insert_record(
            &mut tx,
            RecordKind::Photos,
            &photo.id,
            &photo.created_at,
            photo,
        )
        .await?;
        tx.commit().await?;

        Ok(())
    }
}
