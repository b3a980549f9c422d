//! Paginated geotag collection.

use std::path::Path;
use tracing::{debug, info};

use super::client::{PhotoSearch, SearchPage};
use crate::config::FetchPolicy;
use crate::error::GeotagResult;
use crate::export::write_csv;
use crate::models::{ResultSet, SearchQuery};

/// What happened during one collection run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub requests: u32,
    pub items_received: usize,
    pub records_kept: usize,
    pub items_dropped: usize,
    /// Total matches reported by the last page
    pub server_count: u64,
}

/// Walks the result pages of a search and keeps the complete geotags
pub struct GeotagFetcher<S> {
    source: S,
    policy: FetchPolicy,
}

impl<S: PhotoSearch> GeotagFetcher<S> {
    pub fn new(source: S, policy: FetchPolicy) -> Self {
        Self { source, policy }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Request pages in order until the data runs out or the page cap is hit
    pub async fn collect(&self, query: &SearchQuery) -> GeotagResult<(ResultSet, FetchReport)> {
        let mut results = ResultSet::new();
        let mut report = FetchReport::default();
        let page_size = self.policy.page_size;

        let mut offsets = self.policy.offsets().peekable();
        while let Some(offset) = offsets.next() {
            let SearchPage { count, items } =
                self.source.search_page(query, page_size, offset).await?;
            report.requests += 1;
            report.server_count = count;

            if items.is_empty() {
                debug!("Empty page at offset {}, stopping", offset);
                break;
            }

            let received = items.len();
            let kept = results.extend_from_items(items);
            report.items_received += received;
            report.records_kept += kept;
            report.items_dropped += received - kept;

            debug!(
                "Page at offset {}: {} items, {} with complete geodata ({} total reported)",
                offset, received, kept, count
            );

            // Stop before requesting a page past the end of the data
            if offset as u64 + received as u64 >= count {
                break;
            }

            if offsets.peek().is_some() && !self.policy.page_delay().is_zero() {
                tokio::time::sleep(self.policy.page_delay()).await;
            }
        }

        info!(
            "Collected {} geotags from {} items in {} request(s)",
            report.records_kept, report.items_received, report.requests
        );

        Ok((results, report))
    }

    /// Collect all pages and write the records to `output_path` as CSV
    pub async fn fetch_to_csv(
        &self,
        query: &SearchQuery,
        output_path: &Path,
    ) -> GeotagResult<FetchReport> {
        let (results, report) = self.collect(query).await?;
        write_csv(output_path, &results)?;
        info!(
            "Wrote {} records to {}",
            results.len(),
            output_path.display()
        );
        Ok(report)
    }
}
