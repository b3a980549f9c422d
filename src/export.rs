//! CSV export of collected geotags.

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::io;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::error::GeotagResult;
use crate::models::{PhotoRecord, ResultSet};

/// Output columns, in order
pub const HEADER: [&str; 5] = ["Date", "Owner_ID", "Photo_ID", "Lat", "Long"];

/// Write records to `path`, replacing any existing file.
///
/// The header is always written, so an empty set yields a header-only file.
/// Floats use Rust's shortest round-trip decimal form, which never switches to
/// exponent notation.
pub fn write_csv(path: &Path, records: &ResultSet) -> GeotagResult<()> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .terminator(Terminator::Any(b'\n'))
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([
            record.uploaded_at.to_string(),
            record.owner_id.to_string(),
            record.photo_id.to_string(),
            record.latitude.to_string(),
            record.longitude.to_string(),
        ])?;
    }
    writer.flush()?;

    debug!("Flushed {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Read a file produced by [`write_csv`] back into memory
pub fn read_csv(path: &Path) -> GeotagResult<ResultSet> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut columns = [0usize; 5];
    for (slot, name) in columns.iter_mut().zip(HEADER) {
        *slot = headers.iter().position(|h| h == name).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Column '{}' not found", name),
            )
        })?;
    }
    let [date, owner, photo, lat, long] = columns;

    let mut results = ResultSet::new();
    for row in reader.records() {
        let row = row?;
        results.push(PhotoRecord {
            uploaded_at: parse_field(&row, date)?,
            owner_id: parse_field(&row, owner)?,
            photo_id: parse_field(&row, photo)?,
            latitude: parse_field(&row, lat)?,
            longitude: parse_field(&row, long)?,
        });
    }

    Ok(results)
}

fn parse_field<T: FromStr>(row: &StringRecord, idx: usize) -> io::Result<T> {
    let raw = row.get(idx).unwrap_or("");
    raw.trim().parse().map_err(|_| {
        let line = row.position().map(|p| p.line()).unwrap_or(0);
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid value '{}' on line {}", raw, line),
        )
    })
}
