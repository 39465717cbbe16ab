//! Effectful operations against the request transport.
//!
//! Everything that sends a request lives here. Decisions about when to stop,
//! what a page covers and how payloads decode are delegated to [`crate::core`].

mod autocomplete;
mod filters;
mod memory;
mod metadata;
mod pager;
mod query;
mod requester;
mod retrieval;
mod segmented;
mod transport;

pub use autocomplete::Autocompleter;
pub use filters::{
    ActiveFilters, FILTERS_COMPONENT, FilterCategory, load_filter_categories,
    parse_filter_categories,
};
pub use memory::MemoryTransport;
pub use metadata::{METADATA_COMPONENT, MetadataCache, subset_file_name};
pub use pager::{PagerPhase, ResultPager};
pub use query::QueryChannel;
pub use requester::Requester;
pub use retrieval::{RETRIEVE_PREFIX, RetrievalPlan, RetrievalRequest, SubsetVariable};
pub use segmented::{BoxStream, SegmentCursor, SegmentFetcher};
pub use transport::{Transport, TransportTimeout};
