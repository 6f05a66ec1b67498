use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{CheckInAPI, PhotoAPI, StatsAPI},
    entities::{LocationRecord, TripStatistics},
    error::Error,
    external::openrouteservice,
    stats,
};

#[async_trait]
impl StatsAPI for Engine {
    /// Road distance from the routing provider when it can be had,
    /// great-circle distance otherwise.
    #[tracing::instrument(skip(self))]
    async fn trip_statistics(&self) -> Result<TripStatistics, Error> {
        let check_ins = self.list_check_ins().await?;
        let photo_count = self.count_photos().await?;

        let records: Vec<LocationRecord> = check_ins.iter().map(LocationRecord::from).collect();
        let mut statistics = stats::aggregate(&records, photo_count);

        if self.config.routing.api_key.is_none() {
            tracing::debug!("routing key not configured, using great-circle distance");
            return Ok(statistics);
        }

        let points = stats::ordered_coordinates(&records);

        match openrouteservice::directions(&self.config.routing, &points).await {
            Ok(Some(route)) => statistics.set_road_distance(route.distance_meters),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "road distance unavailable, using great-circle distance")
            }
        }

        Ok(statistics)
    }
}
