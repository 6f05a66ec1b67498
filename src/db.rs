use sqlx::{postgres::PgPoolOptions, Executor, Pool, Postgres};

use crate::entities::RecordKind;

pub type Database = Postgres;

/// Channel carrying one `RecordKind` name per committed change.
pub const CHANGES_CHANNEL: &str = "journal_changes";

pub async fn connect(db_uri: &str, max_connections: u32) -> Result<Pool<Database>, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(db_uri)
        .await
}

#[tracing::instrument(skip(pool))]
pub async fn ensure_schema(pool: &Pool<Database>) -> Result<(), sqlx::Error> {
    // TODO: move this to migrations
    pool.execute("CREATE TABLE IF NOT EXISTS check_ins (id UUID PRIMARY KEY, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)")
        .await?;
    pool.execute("CREATE TABLE IF NOT EXISTS photos (id UUID PRIMARY KEY, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)")
        .await?;
    pool.execute("CREATE TABLE IF NOT EXISTS guestbook (id UUID PRIMARY KEY, created_at TIMESTAMPTZ NOT NULL, data JSONB NOT NULL)")
        .await?;
    pool.execute("CREATE TABLE IF NOT EXISTS route_stops (id UUID PRIMARY KEY, created_at TIMESTAMPTZ NOT NULL, planned_date DATE, data JSONB NOT NULL)")
        .await?;

    Ok(())
}

/// Queues a change notification; delivered when the surrounding
/// transaction commits.
pub async fn notify_change<'c, E>(executor: E, kind: RecordKind) -> Result<(), sqlx::Error>
where
    E: Executor<'c, Database = Database>,
{
    executor
        .execute(
            sqlx::query("SELECT pg_notify($1, $2)")
                .bind(CHANGES_CHANNEL)
                .bind(kind.name()),
        )
        .await?;

    Ok(())
}
