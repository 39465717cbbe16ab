//! Per-record metadata lookup with a session-owned cache.

use std::collections::HashMap;

use catalog_name::Name;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::core::decode_text;
use crate::effects::segmented::SegmentFetcher;
use crate::effects::transport::Transport;
use crate::error::Result;

pub const METADATA_COMPONENT: &str = "metadata";

static NETCDF_HEADER: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"netcdf ([\w-]+)").ok());

/// File name of the subset product described by a metadata dump, taken
/// from its `netcdf <id>` header.
pub fn subset_file_name(metadata: &str) -> Option<String> {
    let re = NETCDF_HEADER.as_ref()?;
    let id = re.captures(metadata)?.get(1)?;
    Some(format!("{}.nc", id.as_str()))
}

/// Metadata text fetched so far, keyed by record name.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: HashMap<String, String>,
}

impl MetadataCache {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, record_name: &str) -> Option<&str> {
        self.entries.get(record_name).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Metadata for `record_name`, fetched from `<record_name>/metadata`
    /// on first use.
    pub async fn lookup<T: Transport>(
        &mut self,
        fetcher: &SegmentFetcher<T>,
        record_name: &str,
    ) -> Result<String> {
        if let Some(text) = self.entries.get(record_name) {
            debug!(record = record_name, "metadata cache hit");
            return Ok(text.clone());
        }

        let base = Name::parse(record_name)?.append(METADATA_COMPONENT);
        let bytes = fetcher.fetch_all(&base).await?;
        let text = decode_text(&base, &bytes)?;

        debug!(record = record_name, bytes = bytes.len(), "metadata fetched");
        self.entries.insert(record_name.to_string(), text.clone());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::effects::memory::MemoryTransport;
    use crate::effects::requester::Requester;
    use crate::error::Error;

    const DUMP: &str = "netcdf tas_Amon_CESM1-CAM5_historical_r1i1p1 {\ndimensions:\n\ttime = 12 ;\n}";

    #[test]
    fn test_subset_file_name() {
        assert_eq!(
            subset_file_name(DUMP).as_deref(),
            Some("tas_Amon_CESM1-CAM5_historical_r1i1p1.nc")
        );
        assert_eq!(subset_file_name("no header here"), None);
    }

    #[tokio::test]
    async fn test_lookup_is_cached() {
        let transport = Arc::new(MemoryTransport::new());
        let fetcher = SegmentFetcher::new(Requester::new(Arc::clone(&transport)));
        let base = Name::parse("/cmip5/tas/r1").unwrap().append(METADATA_COMPONENT);
        transport.insert_segments(&base, ["netcdf tas_r1 {", "}\0\0"]);

        let mut cache = MetadataCache::new();
        let first = cache.lookup(&fetcher, "/cmip5/tas/r1").await.unwrap();
        let second = cache.lookup(&fetcher, "/cmip5/tas/r1").await.unwrap();

        assert_eq!(first, "netcdf tas_r1 {}");
        assert_eq!(first, second);
        assert_eq!(transport.request_count(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_multi_line_dump_keeps_its_lines() {
        let transport = Arc::new(MemoryTransport::new());
        let fetcher = SegmentFetcher::new(Requester::new(Arc::clone(&transport)));
        let base = Name::parse("/cmip5/tas/r1").unwrap().append(METADATA_COMPONENT);
        transport.insert_segments(
            &base,
            ["netcdf tas_r1 {\ndimensions:\n", "\ttime = 12 ;\n}\n\0"],
        );

        let text = MetadataCache::new().lookup(&fetcher, "/cmip5/tas/r1").await.unwrap();

        assert_eq!(text, "netcdf tas_r1 {\ndimensions:\n\ttime = 12 ;\n}");
        assert_eq!(text.lines().count(), 4);
        assert_eq!(subset_file_name(&text).as_deref(), Some("tas_r1.nc"));
    }

    #[tokio::test]
    async fn test_unavailable_metadata_is_not_cached() {
        let transport = Arc::new(MemoryTransport::new());
        let fetcher = SegmentFetcher::new(Requester::new(Arc::clone(&transport)));
        let mut cache = MetadataCache::new();

        let err = cache.lookup(&fetcher, "/cmip5/missing").await.unwrap_err();

        assert!(matches!(err, Error::SegmentTimeout { .. }));
        assert!(cache.is_empty());
    }
}
