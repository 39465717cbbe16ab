//! Pure transformations for segmented retrieval and paging.
//!
//! Nothing in this module touches the transport; the effects layer feeds
//! responses in and acts on the decisions made here.

mod decode;
mod page;
mod query;
mod retry;
mod segment;

pub use decode::{
    clean_text, decode_batch, decode_completion, decode_structured, decode_text, sanitize_payload,
};
pub use page::{page_range, page_slice};
pub use query::{QUERY_COMPONENT, QUERY_NAME_DEPTH, build_query_name, canonical_query_name};
pub use retry::retry_delay;
pub use segment::{Termination, completion_termination, next_segment_name, segment_termination};
