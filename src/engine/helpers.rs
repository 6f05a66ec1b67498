use super::Database;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{types::Json, Executor, Pool, Row, Transaction};
use uuid::Uuid;

use crate::{
    db::notify_change,
    entities::{Photo, RecordKind, RouteStop},
    error::{not_found_error, Error},
};

/// Runs `query` (which must select a `data` column) and decodes every row.
pub async fn fetch_records<T>(pool: &Pool<Database>, query: &str) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned + Send + Unpin,
{
    let rows = pool.fetch_all(sqlx::query(query)).await?;

    rows.iter()
        .map(|row| {
            let Json(record): Json<T> = row.try_get("data")?;
            Ok(record)
        })
        .collect()
}

/// Inserts into the `kind` table and queues its change notification.
#[tracing::instrument(skip(tx, record))]
pub async fn insert_record<T>(
    tx: &mut Transaction<'_, Database>,
    kind: RecordKind,
    id: &Uuid,
    created_at: &DateTime<Utc>,
    record: &T,
) -> Result<(), Error>
where
    T: Serialize + Send + Sync,
{
    let query = format!(
        "INSERT INTO {} (id, created_at, data) VALUES ($1, $2, $3)",
        kind.name()
    );

    sqlx::query(&query)
        .bind(id)
        .bind(created_at)
        .bind(Json(record))
        .execute(&mut *tx)
        .await?;

    notify_change(&mut *tx, kind).await?;

    Ok(())
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_route_stop_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<RouteStop, Error> {
    let Json(stop): Json<RouteStop> = sqlx::query("SELECT data FROM route_stops WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found_error)?
        .try_get("data")?;

    Ok(stop)
}

#[tracing::instrument(skip(tx))]
pub async fn fetch_photo_for_update(
    tx: &mut Transaction<'_, Database>,
    id: &Uuid,
) -> Result<Option<Photo>, Error> {
    let maybe_row = sqlx::query("SELECT data FROM photos WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    match maybe_row {
        Some(row) => {
            let Json(photo): Json<Photo> = row.try_get("data")?;
            Ok(Some(photo))
        }
        None => Ok(None),
    }
}

/// Deletes one row by id. `false` when nothing matched.
#[tracing::instrument(skip(tx))]
pub async fn delete_record(
    tx: &mut Transaction<'_, Database>,
    kind: RecordKind,
    id: &Uuid,
) -> Result<bool, Error> {
    let query = format!("DELETE FROM {} WHERE id = $1", kind.name());

    let result = sqlx::query(&query).bind(id).execute(&mut *tx).await?;

    if result.rows_affected() == 0 {
        return Ok(false);
    }

    notify_change(&mut *tx, kind).await?;

    Ok(true)
}
