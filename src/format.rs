use chrono::{DateTime, Utc};

use crate::entities::METERS_PER_MILE;

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        return format!("{} m", meters.round());
    }

    format!("{:.1} miles", meters / METERS_PER_MILE)
}

/// e.g. `Jun 9, 2025`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// e.g. `Jun 9, 2025 6:08 PM`
pub fn format_date_time(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y %-I:%M %p").to_string()
}

#[test]
fn format_distance_test() {
    assert_eq!(format_distance(0.0), "0 m");
    assert_eq!(format_distance(999.4), "999 m");
    assert_eq!(format_distance(1000.0), "0.6 miles");
    assert_eq!(format_distance(2_393_088.0), "1487.0 miles");
}

#[test]
fn format_date_test() {
    use chrono::TimeZone;

    let date = Utc.with_ymd_and_hms(2025, 6, 9, 18, 8, 57).unwrap();

    assert_eq!(format_date(&date), "Jun 9, 2025");
    assert_eq!(format_date_time(&date), "Jun 9, 2025 6:08 PM");
}
