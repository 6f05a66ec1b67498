use super::helpers::{delete_record, fetch_records, fetch_route_stop_for_update};
use super::Engine;

use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    api::RouteStopAPI,
    auth::User,
    db::notify_change,
    entities::{NewRouteStop, RecordKind, RouteStop},
    error::Error,
};

#[async_trait]
impl RouteStopAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_route_stops(&self) -> Result<Vec<RouteStop>, Error> {
        fetch_records(
            &self.pool,
            "SELECT data FROM route_stops ORDER BY planned_date ASC NULLS LAST, created_at ASC",
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn create_route_stop(
        &self,
        user: User,
        params: NewRouteStop,
    ) -> Result<RouteStop, Error> {
        self.authorize(user.clone(), "write")?;

        let stop = RouteStop::new(user.id, params)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO route_stops (id, created_at, planned_date, data) VALUES ($1, $2, $3, $4)",
        )
        .bind(&stop.id)
        .bind(&stop.created_at)
        .bind(&stop.planned_date)
        .bind(Json(&stop))
        .execute(&mut tx)
        .await?;

        notify_change(&mut tx, RecordKind::RouteStops).await?;

        tx.commit().await?;

        Ok(stop)
    }

    #[tracing::instrument(skip(self))]
    async fn update_route_stop(
        &self,
        user: User,
        id: Uuid,
        params: NewRouteStop,
    ) -> Result<RouteStop, Error> {
        self.authorize(user, "write")?;

        let mut tx = self.pool.begin().await?;

        let mut stop = fetch_route_stop_for_update(&mut tx, &id).await?;
        stop.apply(params)?;

        sqlx::query("UPDATE route_stops SET planned_date = $2, data = $3 WHERE id = $1")
            .bind(&stop.id)
            .bind(&stop.planned_date)
            .bind(Json(&stop))
            .execute(&mut tx)
            .await?;

        notify_change(&mut tx, RecordKind::RouteStops).await?;

        tx.commit().await?;

        Ok(stop)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_route_stop(&self, user: User, id: Uuid) -> Result<bool, Error> {
        self.authorize(user, "write")?;

        let mut tx = self.pool.begin().await?;
        let deleted = delete_record(&mut tx, RecordKind::RouteStops, &id).await?;
        tx.commit().await?;

        Ok(deleted)
    }
}
