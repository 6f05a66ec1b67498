mod handlers;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{any, get, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::{DynAPI, API};
use crate::config::Config;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{
    check_ins, directions, events, geocode, guestbook, photos, route_stops, stats,
};

pub fn router(api: DynAPI, config: Arc<Config>) -> Router {
    Router::new()
        .route("/api/directions", any(directions::proxy))
        .route("/api/stats", get(stats::find))
        .route("/api/check_ins", get(check_ins::list).post(check_ins::create))
        .route("/api/photos", get(photos::list).post(photos::create))
        .route("/api/photos/:id", axum::routing::delete(photos::delete))
        .route("/api/guestbook", get(guestbook::list).post(guestbook::sign))
        .route("/api/route_stops", get(route_stops::list).post(route_stops::create))
        .route(
            "/api/route_stops/:id",
            put(route_stops::update).delete(route_stops::delete),
        )
        .route("/api/events/:kind", get(events::listen))
        .route("/api/geocode/search", get(geocode::search))
        .route("/api/geocode/reverse", get(geocode::reverse))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(api))
        .layer(Extension(config))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: Arc<Config>) -> Result<(), Error> {
    let addr = config.bind_addr;
    let api = Arc::new(api) as DynAPI;

    let app = router(api, config);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(|err| unexpected_error().with_details(err))?
        .serve(app.into_make_service())
        .await
        .map_err(|err| unexpected_error().with_details(err))
}
