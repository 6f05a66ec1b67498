use reqwest::header::USER_AGENT;
use serde::{Deserialize, Serialize};

use crate::{
    config::GeocodingConfig,
    entities::Coordinates,
    error::{invalid_input_error, upstream_error, Error},
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    display_name: String,
    lat: String,
    lon: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
}

#[tracing::instrument(skip(config))]
pub async fn search(config: &GeocodingConfig, query: &str) -> Result<Vec<PlaceCandidate>, Error> {
    let query = query.trim();

    if query.is_empty() {
        return Ok(vec![]);
    }

    let url = format!("{}/search", config.base_url.trim_end_matches('/'));

    let res = reqwest::Client::new()
        .get(url)
        .header(USER_AGENT, &config.user_agent)
        .query(&[("format", "json"), ("q", query)])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    let results: Vec<SearchResult> = res.json().await?;

    Ok(candidates(results))
}

#[tracing::instrument(skip(config))]
pub async fn reverse(
    config: &GeocodingConfig,
    coordinates: Coordinates,
) -> Result<Option<String>, Error> {
    let coordinates = coordinates.validate()?;
    let url = format!("{}/reverse", config.base_url.trim_end_matches('/'));

    let res = reqwest::Client::new()
        .get(url)
        .header(USER_AGENT, &config.user_agent)
        .query(&[("format", "json")])
        .query(&[("lat", coordinates.lat), ("lon", coordinates.lng)])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if (400..500).contains(&status_code) {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    // "Unable to geocode" comes back as 200 with an `error` field and no name.
    let result: ReverseResult = res.json().await?;

    Ok(result.display_name.filter(|name| !name.is_empty()))
}

fn candidates(results: Vec<SearchResult>) -> Vec<PlaceCandidate> {
    results
        .into_iter()
        .filter_map(|result| {
            let lat = result.lat.parse().ok()?;
            let lng = result.lon.parse().ok()?;
            let coordinates = Coordinates::new(lat, lng);

            coordinates.is_valid().then(|| PlaceCandidate {
                name: result.display_name,
                coordinates,
            })
        })
        .collect()
}

#[test]
fn candidates_test() {
    let results: Vec<SearchResult> = serde_json::from_str(
        r#"[
            {"place_id": 1, "display_name": "Moab, Grand County, Utah, United States", "lat": "38.5738096", "lon": "-109.5462146"},
            {"place_id": 2, "display_name": "Broken", "lat": "north", "lon": "-109.5"}
        ]"#,
    )
    .unwrap();

    let places = candidates(results);

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].name, "Moab, Grand County, Utah, United States");
    assert_eq!(places[0].coordinates, Coordinates::new(38.5738096, -109.5462146));
}

#[test]
fn reverse_result_test() {
    let found: ReverseResult =
        serde_json::from_str(r#"{"display_name": "Moab, Utah", "lat": "38.57"}"#).unwrap();
    assert_eq!(found.display_name.as_deref(), Some("Moab, Utah"));

    let missing: ReverseResult = serde_json::from_str(r#"{"error": "Unable to geocode"}"#).unwrap();
    assert_eq!(missing.display_name, None);
}

#[tokio::test]
async fn blank_query_is_no_match_test() {
    let config = GeocodingConfig {
        base_url: "http://127.0.0.1:1".into(),
        user_agent: "test".into(),
    };

    assert_eq!(search(&config, "   ").await.unwrap(), vec![]);
}
