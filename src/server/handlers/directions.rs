use std::sync::Arc;

use axum::{body::Bytes, extract::Extension, http::Method};

use crate::{
    config::Config,
    error::Error,
    proxy::{self, Relay},
};

/// Accepts every method so that non-POST requests get the JSON 405.
pub async fn proxy(
    Extension(config): Extension<Arc<Config>>,
    method: Method,
    body: Bytes,
) -> Result<Relay, Error> {
    proxy::relay(&config.routing, &method, &body).await
}
