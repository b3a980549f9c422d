//! Core data models for geotag search.

pub mod photo;
pub mod query;

pub use photo::{PhotoItem, PhotoRecord, ResultSet};
pub use query::{parse_utc_timestamp, SearchQuery, SortOrder, DEFAULT_RADIUS, RADIUS_CHOICES};
