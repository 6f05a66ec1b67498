//! Directions proxy: keeps the routing provider's key on the server.
//!
//! One forward and one relay per request. No retries, no caching, no
//! timeout beyond the HTTP client's own.

use axum::{
    body::Bytes,
    http::{
        header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE},
        Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::{
    config::RoutingConfig,
    error::{
        invalid_json_error, method_not_allowed_error, routing_not_configured_error,
        routing_request_error, Error,
    },
    external::openrouteservice,
};

/// The provider's answer, passed through as-is.
#[derive(Debug)]
pub struct Relay {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for Relay {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();

        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        response
    }
}

#[tracing::instrument(skip(config, body), fields(size = body.len()))]
pub async fn relay(config: &RoutingConfig, method: &Method, body: &[u8]) -> Result<Relay, Error> {
    if *method != Method::POST {
        return Err(method_not_allowed_error());
    }

    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(routing_not_configured_error)?;

    let payload: Value = serde_json::from_slice(body).map_err(invalid_json_error)?;

    let (status, body) = openrouteservice::forward(&config.directions_url, api_key, &payload)
        .await
        .map_err(routing_request_error)?;

    tracing::info!(status = status.as_u16(), "directions response relayed");

    Ok(Relay { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::net::SocketAddr;

    use axum::{
        extract::Json,
        http::{header::AUTHORIZATION, HeaderMap},
        routing::post,
        Router,
    };
    use serde_json::json;

    const BODY: &[u8] = br#"{"coordinates": [[-87.6298, 41.8781], [-104.9903, 39.7392]]}"#;

    fn config(api_key: Option<&str>, directions_url: &str) -> RoutingConfig {
        RoutingConfig {
            api_key: api_key.map(str::to_string),
            directions_url: directions_url.into(),
        }
    }

    /// Fake provider: echoes the request back unless the key is wrong.
    async fn fake_provider(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("secret") {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": { "code": 2002, "message": "Access denied" } })),
            );
        }

        (
            StatusCode::OK,
            Json(json!({
                "type": "FeatureCollection",
                "features": [],
                "echo": body,
            })),
        )
    }

    async fn spawn_provider() -> SocketAddr {
        let app = Router::new().route("/directions", post(fake_provider));
        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let addr = server.local_addr();

        tokio::spawn(server);

        addr
    }

    #[tokio::test]
    async fn non_post_methods_are_rejected_test() {
        let config = config(Some("secret"), "http://127.0.0.1:1/directions");

        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, Method::OPTIONS] {
            let err = relay(&config, &method, BODY).await.unwrap_err();

            assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(err.message, "Method Not Allowed");
            assert_eq!(err.details, None);
        }
    }

    #[tokio::test]
    async fn missing_key_is_server_error_test() {
        let config = config(None, "http://127.0.0.1:1/directions");

        for body in [BODY, b"{not json" as &[u8], b"" as &[u8]] {
            let err = relay(&config, &Method::POST, body).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request_test() {
        let config = config(Some("secret"), "http://127.0.0.1:1/directions");

        for body in [b"{not json" as &[u8], b"" as &[u8], b"[1, 2" as &[u8]] {
            let err = relay(&config, &Method::POST, body).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn relays_provider_response_test() {
        let addr = spawn_provider().await;
        let config = config(Some("secret"), &format!("http://{}/directions", addr));

        let relayed = relay(&config, &Method::POST, BODY).await.unwrap();

        assert_eq!(relayed.status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&relayed.body).unwrap();
        assert_eq!(body["echo"], serde_json::from_slice::<Value>(BODY).unwrap());

        let response = relayed.into_response();
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }

    #[tokio::test]
    async fn provider_errors_pass_through_test() {
        let addr = spawn_provider().await;
        let config = config(Some("wrong"), &format!("http://{}/directions", addr));

        let relayed = relay(&config, &Method::POST, BODY).await.unwrap();

        assert_eq!(relayed.status, StatusCode::FORBIDDEN);
        let body: Value = serde_json::from_slice(&relayed.body).unwrap();
        assert_eq!(body["error"]["message"], "Access denied");
    }

    #[tokio::test]
    async fn transport_failure_is_server_error_test() {
        let config = config(Some("secret"), "http://127.0.0.1:1/directions");

        let err = relay(&config, &Method::POST, BODY).await.unwrap_err();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to fetch route from routing service");
        assert!(err.details.is_some());

        let response = err.into_response();
        assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
    }
}
