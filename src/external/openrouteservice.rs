use axum::body::Bytes;
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::RoutingConfig,
    entities::{Coordinates, RouteGeometry},
    error::{invalid_input_error, routing_not_configured_error, upstream_error, Error},
};

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: LineString,
    #[serde(default)]
    properties: Option<Properties>,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    summary: Option<Summary>,
}

#[derive(Debug, Deserialize)]
struct Summary {
    distance: Option<f64>,
}

/// Posts `body` to the directions endpoint and hands back the provider's
/// status and raw body untouched. Only transport failures are errors.
#[tracing::instrument(skip(api_key, body))]
pub async fn forward(
    directions_url: &str,
    api_key: &str,
    body: &Value,
) -> Result<(StatusCode, Bytes), reqwest::Error> {
    let res = reqwest::Client::new()
        .post(directions_url)
        .header(AUTHORIZATION, api_key)
        .json(body)
        .send()
        .await?;

    let status = res.status();
    let body = res.bytes().await?;

    tracing::debug!(status = status.as_u16(), "directions provider answered");

    Ok((status, body))
}

/// Road route through `points` in order. `None` when there is nothing to
/// route or the provider found no route.
#[tracing::instrument(skip(config, points), fields(points = points.len()))]
pub async fn directions(
    config: &RoutingConfig,
    points: &[Coordinates],
) -> Result<Option<RouteGeometry>, Error> {
    if points.len() < 2 {
        return Ok(None);
    }

    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(routing_not_configured_error)?;

    let coordinates: Vec<[f64; 2]> = points.iter().map(Coordinates::to_lng_lat).collect();
    let (status, body) = forward(
        &config.directions_url,
        api_key,
        &json!({ "coordinates": coordinates }),
    )
    .await?;

    let status_code = status.as_u16();

    if (400..500).contains(&status_code) {
        return Err(invalid_input_error().with_details(String::from_utf8_lossy(&body)));
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    parse_route(&body)
}

fn parse_route(body: &[u8]) -> Result<Option<RouteGeometry>, Error> {
    let data: FeatureCollection = serde_json::from_slice(body).map_err(|err| {
        tracing::warn!(error = %err, "unexpected directions payload");
        upstream_error()
    })?;

    let feature = match data.features.into_iter().next() {
        Some(feature) => feature,
        None => return Ok(None),
    };

    let distance_meters = feature
        .properties
        .and_then(|properties| properties.summary)
        .and_then(|summary| summary.distance)
        .unwrap_or(0.0);

    Ok(Some(RouteGeometry {
        coordinates: feature
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinates::new(lat, lng))
            .collect(),
        distance_meters,
    }))
}

#[test]
fn parse_route_test() {
    let body = br#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"summary": {"distance": 160934.0, "duration": 5400.2}},
            "geometry": {"type": "LineString", "coordinates": [[-87.6298, 41.8781], [-88.0, 41.9]]}
        }]
    }"#;

    let route = parse_route(body).unwrap().unwrap();

    assert_eq!(route.coordinates[0], Coordinates::new(41.8781, -87.6298));
    assert_eq!(route.coordinates.len(), 2);
    assert!((route.distance_miles() - 100.0).abs() < 1e-9);
}

#[test]
fn parse_empty_route_test() {
    let route = parse_route(br#"{"type": "FeatureCollection", "features": []}"#).unwrap();
    assert!(route.is_none());

    assert!(parse_route(b"<html>").is_err());
}

#[test]
fn too_few_points_skip_provider_test() {
    use tokio_test::block_on;

    let config = RoutingConfig {
        api_key: None,
        directions_url: "http://127.0.0.1:1/unused".into(),
    };

    let route = block_on(directions(&config, &[Coordinates::new(0.0, 0.0)]));
    assert!(route.unwrap().is_none());

    let err = block_on(directions(
        &config,
        &[Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0)],
    ))
    .unwrap_err();
    assert_eq!(err.code, 1);
}

#[cfg(test)]
mod provider_tests {
    use super::*;

    use std::net::SocketAddr;

    use axum::{extract::Json, http::HeaderMap, routing::post, Router};

    async fn fake_directions(
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some("secret") {
            return (
                axum::http::StatusCode::FORBIDDEN,
                Json(json!({ "error": { "code": 2002, "message": "Access denied" } })),
            );
        }

        (
            axum::http::StatusCode::OK,
            Json(json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {"summary": {"distance": 1_609_340.0}},
                    "geometry": {"type": "LineString", "coordinates": body["coordinates"]}
                }]
            })),
        )
    }

    async fn spawn_provider() -> SocketAddr {
        let app = Router::new().route("/directions", post(fake_directions));
        let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
            .serve(app.into_make_service());
        let addr = server.local_addr();

        tokio::spawn(server);

        addr
    }

    fn config(api_key: &str, addr: SocketAddr) -> RoutingConfig {
        RoutingConfig {
            api_key: Some(api_key.into()),
            directions_url: format!("http://{}/directions", addr),
        }
    }

    const POINTS: [Coordinates; 2] = [
        Coordinates { lat: 41.8781, lng: -87.6298 },
        Coordinates { lat: 39.7392, lng: -104.9903 },
    ];

    #[tokio::test]
    async fn road_route_test() {
        let addr = spawn_provider().await;

        let route = directions(&config("secret", addr), &POINTS)
            .await
            .unwrap()
            .unwrap();

        assert!((route.distance_miles() - 1000.0).abs() < 1e-6);
        assert_eq!(route.coordinates.len(), POINTS.len());
        for (got, sent) in route.coordinates.iter().zip(POINTS.iter()) {
            assert!((got.lat - sent.lat).abs() < 1e-9 && (got.lng - sent.lng).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn rejected_request_is_error_test() {
        let addr = spawn_provider().await;

        let err = directions(&config("wrong", addr), &POINTS)
            .await
            .unwrap_err();

        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.details.unwrap().contains("Access denied"));
    }
}
