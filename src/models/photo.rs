//! Photo items as returned by the API and the records extracted from them.

use serde::Deserialize;

/// Raw item from a `photos.search` page.
///
/// Any field may be absent; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PhotoItem {
    pub date: Option<i64>,
    pub owner_id: Option<i64>,
    pub id: Option<i64>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

impl PhotoItem {
    /// Convert into a record, or `None` if any field is missing
    pub fn into_record(self) -> Option<PhotoRecord> {
        Some(PhotoRecord {
            uploaded_at: self.date?,
            owner_id: self.owner_id?,
            photo_id: self.id?,
            latitude: self.lat?,
            longitude: self.long?,
        })
    }
}

/// One geotagged photo with complete geodata
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoRecord {
    /// Upload time, unix seconds
    pub uploaded_at: i64,
    pub owner_id: i64,
    pub photo_id: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Records accumulated across pages, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    records: Vec<PhotoRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the complete items of one page, returning how many were kept
    pub fn extend_from_items(&mut self, items: impl IntoIterator<Item = PhotoItem>) -> usize {
        let before = self.records.len();
        self.records
            .extend(items.into_iter().filter_map(PhotoItem::into_record));
        self.records.len() - before
    }

    pub fn push(&mut self, record: PhotoRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.records.iter()
    }
}

impl From<Vec<PhotoRecord>> for ResultSet {
    fn from(records: Vec<PhotoRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for ResultSet {
    type Item = PhotoRecord;
    type IntoIter = std::vec::IntoIter<PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
