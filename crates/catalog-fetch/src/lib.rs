//! Retrieval and pagination over a request transport that may time out.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable requests, responses, options and payload types
//! - [`core`] - Pure decisions: termination, page arithmetic, decoding
//! - effects - I/O against the [`Transport`] trait
//!
//! # Key Features
//!
//! - **Bounded Retry**: every exchange gets a fixed attempt budget with
//!   progress events for each attempt
//! - **Sequential Segments**: objects are fetched one segment at a time
//!   until a segment declares itself final
//! - **Lazy Paging**: result segments are fetched only when a requested
//!   page is not yet covered
//! - **Best-Effort Completion**: autocompletion degrades to partial answers
//!   instead of failing
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use catalog_fetch::{MemoryTransport, Name, QuerySpec, Response, RetrievalSession};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let prefix = Name::parse("/catalog").unwrap();
//! let transport = Arc::new(MemoryTransport::new());
//!
//! let spec = QuerySpec::path("/cmip5");
//! let query = catalog_fetch::build_query_name(&prefix, &spec).append("v1");
//! transport.insert(
//!     Response::new(query.append_segment(0), r#"{"resultCount":1,"results":["/cmip5/a"]}"#)
//!         .with_final_segment(0),
//! );
//!
//! let mut session = RetrievalSession::new(transport, prefix);
//! let view = session.search(spec).await.unwrap();
//! assert_eq!(view.page().unwrap().records[0].name, "/cmip5/a");
//! # }
//! ```

pub mod core;
pub mod data;

mod config;
mod effects;
mod error;
mod session;

pub use catalog_name::{Component, Name, NameError};

pub use crate::config::{
    CatalogConfig, Conversions, DemoKey, GlobalConfig, KeyPair, RetrievalConfig,
};
pub use crate::core::{build_query_name, canonical_query_name, retry_delay};
pub use crate::data::page::DEFAULT_PAGE_SIZE;
pub use crate::data::{
    CancelToken, Completion, FetchOptions, Page, PageState, PageView, Progress, QuerySpec,
    Request, Response, ResultBatch, ResultRecord,
};
pub use crate::effects::{
    ActiveFilters, Autocompleter, BoxStream, FILTERS_COMPONENT, FilterCategory,
    METADATA_COMPONENT, MemoryTransport, MetadataCache, PagerPhase, QueryChannel,
    RETRIEVE_PREFIX, Requester, ResultPager, RetrievalPlan, RetrievalRequest, SegmentCursor,
    SegmentFetcher, SubsetVariable, Transport, TransportTimeout, load_filter_categories,
    parse_filter_categories, subset_file_name,
};
pub use crate::error::{Error, Result};
pub use crate::session::{ErrorKind, RenderSink, RetrievalSession};
