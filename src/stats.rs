//! Trip statistics derived from check-ins.
//!
//! All functions are pure. Records may arrive in any order; they are
//! sorted by timestamp here. Records without a timestamp or without valid
//! coordinates are left out of every figure and reported through
//! [`TripStatistics::skipped_records`].
//!
//! Region counting is a text heuristic over free-form place labels
//! ("City, ST"), not a geocoding lookup. Labels that do not follow that
//! convention are counted by their last word.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::entities::{Coordinates, DistanceSource, LocationRecord, TripStatistics};
use crate::format::{format_date, format_date_time};

const MS_PER_DAY: u64 = 86_400_000;

struct Stop<'a> {
    at: DateTime<Utc>,
    coordinates: Coordinates,
    label: &'a str,
}

fn stops(records: &[LocationRecord]) -> (Vec<Stop<'_>>, usize) {
    let mut stops: Vec<Stop> = records
        .iter()
        .filter(|record| record.is_well_formed())
        .filter_map(|record| {
            Some(Stop {
                at: record.created_at?,
                coordinates: record.coordinates?,
                label: &record.location,
            })
        })
        .collect();

    let skipped = records.len() - stops.len();
    if skipped > 0 {
        tracing::warn!(skipped, "skipping malformed location records");
    }

    stops.sort_by_key(|stop| stop.at);

    (stops, skipped)
}

pub fn aggregate(records: &[LocationRecord], photo_count: u64) -> TripStatistics {
    let (stops, skipped_records) = stops(records);

    let coordinates: Vec<Coordinates> = stops.iter().map(|stop| stop.coordinates).collect();

    let mut statistics = TripStatistics {
        days_on_road: days_between(&stops),
        distance_miles: 0.0,
        distance_label: String::new(),
        distance_source: DistanceSource::GreatCircle,
        distinct_region_count: regions(stops.iter().map(|stop| stop.label)).len(),
        photo_count,
        skipped_records,
        started_on: stops.first().map(|stop| format_date(&stop.at)),
        last_check_in_at: stops.last().map(|stop| format_date_time(&stop.at)),
    };
    statistics.set_great_circle_distance(chain_distance_miles(&coordinates));

    statistics
}

/// Calendar days spanned by the records, counting the first day. Zero
/// when there are no usable records.
pub fn days_on_road(records: &[LocationRecord]) -> u32 {
    days_between(&stops(records).0)
}

fn days_between(stops: &[Stop]) -> u32 {
    let (first, last) = match (stops.iter().map(|s| s.at).min(), stops.iter().map(|s| s.at).max()) {
        (Some(first), Some(last)) => (first, last),
        _ => return 0,
    };

    let span_ms = (last - first).num_milliseconds().max(0) as u64;
    let days = span_ms.div_ceil(MS_PER_DAY) + 1;

    days.max(1) as u32
}

/// Straight-line miles between consecutive records in time order.
pub fn distance_miles(records: &[LocationRecord]) -> f64 {
    let coordinates: Vec<Coordinates> = stops(records)
        .0
        .iter()
        .map(|stop| stop.coordinates)
        .collect();

    chain_distance_miles(&coordinates)
}

/// Zero for fewer than two points.
pub fn chain_distance_miles(points: &[Coordinates]) -> f64 {
    points
        .windows(2)
        .map(|pair| pair[0].distance_miles(&pair[1]))
        .fold(0.0, |total, hop| total + hop)
}

/// Usable coordinates in time order, e.g. for a directions request.
pub fn ordered_coordinates(records: &[LocationRecord]) -> Vec<Coordinates> {
    stops(records)
        .0
        .iter()
        .map(|stop| stop.coordinates)
        .collect()
}

pub fn distinct_region_count(records: &[LocationRecord]) -> usize {
    regions(stops(records).0.iter().map(|stop| stop.label)).len()
}

fn regions<'a>(labels: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    labels.filter_map(region_token).collect()
}

/// Region guessed from a place label: the last non-empty comma segment
/// when it looks like a two-letter abbreviation, otherwise that segment's
/// last word.
pub fn region_token(label: &str) -> Option<String> {
    let segment = label
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .last()?;

    if segment.chars().count() == 2 {
        return Some(segment.to_string());
    }

    segment.split_whitespace().last().map(str::to_string)
}

#[cfg(test)]
fn record(location: &str, lat: f64, lng: f64, at: &str) -> LocationRecord {
    LocationRecord::parse(
        uuid::Uuid::new_v4(),
        location,
        Some(Coordinates::new(lat, lng)),
        at,
        None,
    )
}

#[test]
fn empty_list_test() {
    let statistics = aggregate(&[], 0);

    assert_eq!(statistics.days_on_road, 0);
    assert_eq!(statistics.distance_miles, 0.0);
    assert!(statistics.distance_miles.is_sign_positive());
    assert_eq!(statistics.distance_label, "0 m");
    assert_eq!(statistics.distinct_region_count, 0);
    assert_eq!(statistics.started_on, None);
}

#[test]
fn single_record_test() {
    let records = vec![record("Chicago, IL", 41.8781, -87.6298, "2025-06-01T09:00:00Z")];

    let statistics = aggregate(&records, 3);

    assert_eq!(statistics.days_on_road, 1);
    assert_eq!(statistics.distance_miles, 0.0);
    assert!(statistics.distance_miles.is_sign_positive());
    assert_eq!(statistics.distance_label, "0 m");
    assert_eq!(statistics.distinct_region_count, 1);
    assert_eq!(statistics.photo_count, 3);
    assert_eq!(statistics.started_on.as_deref(), Some("Jun 1, 2025"));
    assert_eq!(statistics.last_check_in_at.as_deref(), Some("Jun 1, 2025 9:00 AM"));
}

#[test]
fn one_degree_at_equator_test() {
    let records = vec![
        record("Null Island", 0.0, 0.0, "2025-06-01T09:00:00Z"),
        record("Gulf of Guinea", 0.0, 1.0, "2025-06-01T21:00:00Z"),
    ];

    let statistics = aggregate(&records, 0);

    assert!((statistics.distance_miles - 69.17).abs() < 0.1);
    assert_eq!(statistics.distance_source, DistanceSource::GreatCircle);
    assert_eq!(statistics.distance_label, "69.1 miles");
    assert_eq!(statistics.days_on_road, 2);
}

#[test]
fn days_on_road_test() {
    let same_instant = vec![
        record("A, IL", 0.0, 0.0, "2025-06-01T09:00:00Z"),
        record("B, IL", 0.0, 0.0, "2025-06-01T09:00:00Z"),
    ];
    assert_eq!(days_on_road(&same_instant), 1);

    let exactly_one_day = vec![
        record("A, IL", 0.0, 0.0, "2025-06-01T09:00:00Z"),
        record("B, IL", 0.0, 0.0, "2025-06-02T09:00:00Z"),
    ];
    assert_eq!(days_on_road(&exactly_one_day), 2);

    let unordered = vec![
        record("C, CO", 0.0, 0.0, "2025-06-10T12:00:00Z"),
        record("A, IL", 0.0, 0.0, "2025-06-01T09:00:00Z"),
        record("B, NE", 0.0, 0.0, "2025-06-05T09:00:00Z"),
    ];
    assert_eq!(days_on_road(&unordered), 11);
}

#[test]
fn distinct_regions_test() {
    let records = vec![
        record("Chicago, IL", 41.8781, -87.6298, "2025-06-01T09:00:00Z"),
        record("Denver, CO", 39.7392, -104.9903, "2025-06-03T09:00:00Z"),
        record("Chicago, IL", 41.8781, -87.6298, "2025-06-05T09:00:00Z"),
    ];

    assert_eq!(distinct_region_count(&records), 2);
}

#[test]
fn region_token_test() {
    assert_eq!(region_token("Chicago, IL").as_deref(), Some("IL"));
    assert_eq!(region_token("Denver, Colorado").as_deref(), Some("Colorado"));
    assert_eq!(region_token("Somewhere Nowhere").as_deref(), Some("Nowhere"));
    assert_eq!(region_token("Portland, OR, ").as_deref(), Some("OR"));
    assert_eq!(region_token("Salt Lake City, Utah, United States").as_deref(), Some("States"));
    assert_eq!(region_token(""), None);
    assert_eq!(region_token(" , "), None);
}

#[test]
fn malformed_records_are_skipped_test() {
    let mut records = vec![
        record("Chicago, IL", 41.8781, -87.6298, "2025-06-01T09:00:00Z"),
        record("Nowhere, ZZ", 41.0, -90.0, "not a timestamp"),
        record("Denver, CO", 39.7392, -104.9903, "2025-06-03T09:00:00Z"),
    ];
    records.push(LocationRecord {
        coordinates: None,
        ..record("Omaha, NE", 0.0, 0.0, "2025-06-02T09:00:00Z")
    });

    let statistics = aggregate(&records, 0);

    assert_eq!(statistics.skipped_records, 2);
    assert_eq!(statistics.distinct_region_count, 2);
    assert_eq!(statistics.days_on_road, 3);

    let direct = Coordinates::new(41.8781, -87.6298)
        .distance_miles(&Coordinates::new(39.7392, -104.9903));
    assert!((statistics.distance_miles - direct).abs() < 1e-9);
}

#[test]
fn distance_grows_with_more_records_test() {
    let mut records = vec![record("A, IL", 41.8781, -87.6298, "2025-06-01T09:00:00Z")];
    let mut previous = distance_miles(&records);

    for (i, (lat, lng)) in [(41.2565, -95.9345), (39.7392, -104.9903), (40.7608, -111.891)]
        .iter()
        .enumerate()
    {
        records.push(record("X, YY", *lat, *lng, &format!("2025-06-0{}T09:00:00Z", i + 2)));
        let current = distance_miles(&records);
        assert!(current >= previous);
        previous = current;
    }
}

#[test]
fn reversed_list_has_same_distance_test() {
    let points = vec![
        Coordinates::new(41.8781, -87.6298),
        Coordinates::new(41.2565, -95.9345),
        Coordinates::new(39.7392, -104.9903),
        Coordinates::new(40.7608, -111.891),
    ];
    let mut reversed = points.clone();
    reversed.reverse();

    let forward = chain_distance_miles(&points);
    let backward = chain_distance_miles(&reversed);

    assert!((forward - backward).abs() < 1e-6);

    let records: Vec<LocationRecord> = points
        .iter()
        .enumerate()
        .map(|(i, c)| record("X, YY", c.lat, c.lng, &format!("2025-06-0{}T09:00:00Z", i + 1)))
        .collect();
    let mut reversed_records = records.clone();
    reversed_records.reverse();

    assert!((distance_miles(&records) - distance_miles(&reversed_records)).abs() < 1e-6);
    assert_eq!(ordered_coordinates(&reversed_records), points);
}

#[test]
fn road_distance_takes_precedence_test() {
    let records = vec![
        record("Chicago, IL", 41.8781, -87.6298, "2025-06-01T09:00:00Z"),
        record("Denver, CO", 39.7392, -104.9903, "2025-06-03T09:00:00Z"),
    ];

    let mut statistics = aggregate(&records, 0);
    assert_eq!(statistics.distance_source, DistanceSource::GreatCircle);
    let great_circle = statistics.distance_miles;

    statistics.set_road_distance(1_609_340.0);

    assert_eq!(statistics.distance_source, DistanceSource::Road);
    assert!((statistics.distance_miles - 1000.0).abs() < 1e-6);
    assert!(statistics.distance_miles > great_circle);
    assert_eq!(statistics.distance_label, "1000.0 miles");
    assert_eq!(statistics.days_on_road, 3);
    assert_eq!(statistics.distinct_region_count, 2);
}
