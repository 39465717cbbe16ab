//! Filter categories published by the catalog, and the user's selection.

use std::collections::BTreeMap;

use catalog_name::Name;
use tracing::{debug, info};

use crate::core::decode_structured;
use crate::data::QuerySpec;
use crate::effects::segmented::SegmentFetcher;
use crate::effects::transport::Transport;
use crate::error::{Error, Result};

pub const FILTERS_COMPONENT: &str = "filters-initialization";

/// One filterable field and the values the catalog offers for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCategory {
    /// Field name as it appears in queries.
    pub key: String,

    /// Display form of `key`.
    pub label: String,

    pub options: Vec<String>,
}

impl FilterCategory {
    pub fn new(key: impl Into<String>, options: Vec<String>) -> Self {
        let key = key.into();
        let label = key.replace('_', " ");
        Self {
            key,
            label,
            options,
        }
    }
}

/// Decode the `[{ "<category>": ["option", ..] }, ..]` listing.
///
/// Categories keep the order of the listing.
pub fn parse_filter_categories(name: &Name, text: &str) -> Result<Vec<FilterCategory>> {
    let raw: Vec<BTreeMap<String, Vec<String>>> =
        serde_json::from_str(text).map_err(|e| Error::MalformedResponse {
            name: name.clone(),
            reason: e.to_string(),
        })?;

    Ok(raw
        .into_iter()
        .flat_map(BTreeMap::into_iter)
        .map(|(key, options)| FilterCategory::new(key, options))
        .collect())
}

/// Fetch every segment of `<catalog>/filters-initialization` and decode it.
pub async fn load_filter_categories<T: Transport>(
    fetcher: &SegmentFetcher<T>,
    catalog_prefix: &Name,
) -> Result<Vec<FilterCategory>> {
    let name = catalog_prefix.append(FILTERS_COMPONENT);
    let bytes = fetcher.fetch_all(&name).await?;
    let text = decode_structured(&name, &bytes)?;
    let categories = parse_filter_categories(&name, &text)?;
    info!(categories = categories.len(), "filter categories loaded");
    Ok(categories)
}

/// Selected `(category, option)` pairs in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    selected: Vec<(String, String)>,
}

impl ActiveFilters {
    pub fn new() -> Self { Self::default() }

    /// Select the pair if it is not selected, otherwise drop it. Returns
    /// whether the pair is selected afterwards.
    pub fn toggle(&mut self, category: &str, option: &str) -> bool {
        if let Some(pos) = self
            .selected
            .iter()
            .position(|(c, o)| c == category && o == option)
        {
            self.selected.remove(pos);
            debug!(category, option, "filter removed");
            false
        } else {
            self.selected.push((category.to_string(), option.to_string()));
            debug!(category, option, "filter added");
            true
        }
    }

    pub fn is_active(&self, category: &str, option: &str) -> bool {
        self.selected.iter().any(|(c, o)| c == category && o == option)
    }

    /// `category:option` labels.
    pub fn labels(&self) -> Vec<String> {
        self.selected.iter().map(|(c, o)| format!("{c}:{o}")).collect()
    }

    pub fn to_query(&self) -> QuerySpec { QuerySpec::from_filters(self.labels()) }

    pub fn clear(&mut self) { self.selected.clear(); }

    pub fn len(&self) -> usize { self.selected.len() }

    pub fn is_empty(&self) -> bool { self.selected.is_empty() }
}
