//! Search parameters for a geotag query.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::str::FromStr;

/// Radius values (meters) accepted by `photos.search`.
///
/// These are documented only; any other value is forwarded as-is and left
/// for the API to reject.
pub const RADIUS_CHOICES: [u32; 5] = [10, 100, 800, 6000, 50000];

/// Radius used when the caller does not pick one
pub const DEFAULT_RADIUS: u32 = 50000;

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Result ordering requested from the API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    ByDate,
    ByLikes,
}

impl SortOrder {
    /// Value sent in the `sort` query parameter
    pub fn wire_value(self) -> u8 {
        match self {
            SortOrder::ByDate => 0,
            SortOrder::ByLikes => 1,
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::ByDate => write!(f, "date"),
            SortOrder::ByLikes => write!(f, "likes"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" | "by_date" | "0" => Ok(SortOrder::ByDate),
            "likes" | "by_likes" | "1" => Ok(SortOrder::ByLikes),
            other => Err(format!(
                "unknown sort order '{}' (expected 'date' or 'likes')",
                other
            )),
        }
    }
}

/// A circular region plus time window to search for geotagged photos
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Free text matched against descriptions, titles and tags. Empty matches everything.
    pub text: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in meters, see [`RADIUS_CHOICES`]
    pub radius: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sort: SortOrder,
}

impl SearchQuery {
    pub fn new(
        text: impl Into<String>,
        latitude: f64,
        longitude: f64,
        radius: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        sort: SortOrder,
    ) -> Self {
        Self {
            text: text.into(),
            latitude,
            longitude,
            radius,
            start,
            end,
            sort,
        }
    }

    pub fn start_unix(&self) -> i64 {
        self.start.timestamp()
    }

    pub fn end_unix(&self) -> i64 {
        self.end.timestamp()
    }

    /// Whether the radius is one of the values the API documents
    pub fn has_documented_radius(&self) -> bool {
        RADIUS_CHOICES.contains(&self.radius)
    }
}

/// Parse a timestamp given on the command line.
///
/// RFC 3339 input keeps its offset and is converted to UTC. Inputs without an
/// offset (`2021-03-08 12:00:00`, `2021-03-08T12:00:00`, `2021-03-08`) are UTC.
pub fn parse_utc_timestamp(input: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(naive.and_utc());
        }
    }

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")?;
    Ok(date.and_time(NaiveTime::default()).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_query(radius: u32) -> SearchQuery {
        SearchQuery::new(
            "",
            60.0,
            30.0,
            radius,
            Utc.with_ymd_and_hms(2021, 3, 8, 12, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 8, 16, 0, 0).unwrap(),
            SortOrder::ByDate,
        )
    }

    #[test]
    fn test_unix_bounds_are_utc() {
        let query = sample_query(DEFAULT_RADIUS);
        assert_eq!(query.start_unix(), 1615204800);
        assert_eq!(query.end_unix(), 1615219200);
    }

    #[test]
    fn test_naive_timestamps_are_utc() {
        let expected = Utc.with_ymd_and_hms(2021, 3, 8, 12, 0, 0).unwrap();
        assert_eq!(parse_utc_timestamp("2021-03-08 12:00:00").unwrap(), expected);
        assert_eq!(parse_utc_timestamp("2021-03-08T12:00:00").unwrap(), expected);
        assert_eq!(parse_utc_timestamp("2021-03-08T12:00:00Z").unwrap(), expected);
    }

    #[test]
    fn test_offset_timestamp_is_normalized() {
        // 15:00 in Moscow is 12:00 UTC
        let parsed = parse_utc_timestamp("2021-03-08T15:00:00+03:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 3, 8, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_date_only_is_midnight() {
        let parsed = parse_utc_timestamp("2020-03-12").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 3, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_garbage_timestamp_fails() {
        assert!(parse_utc_timestamp("yesterday").is_err());
        assert!(parse_utc_timestamp("2021-13-40 99:00:00").is_err());
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("date".parse::<SortOrder>().unwrap(), SortOrder::ByDate);
        assert_eq!("LIKES".parse::<SortOrder>().unwrap(), SortOrder::ByLikes);
        assert_eq!("1".parse::<SortOrder>().unwrap(), SortOrder::ByLikes);
        assert!("popular".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::ByDate.wire_value(), 0);
        assert_eq!(SortOrder::ByLikes.wire_value(), 1);
    }

    #[test]
    fn test_undocumented_radius_is_kept() {
        let query = sample_query(1234);
        assert_eq!(query.radius, 1234);
        assert!(!query.has_documented_radius());
        assert!(sample_query(800).has_documented_radius());
    }
}
