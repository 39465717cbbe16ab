//! Immutable data types for catalog retrieval.
//!
//! Requests, responses, options, progress events, query specifications and
//! the decoded payload shapes. Nothing in here performs I/O.

pub mod options;
pub mod page;
pub mod payload;
pub mod progress;
pub mod query;
pub mod request;

pub use options::{CancelToken, FetchOptions};
pub use page::{Page, PageState, PageView};
pub use payload::{Completion, ResultBatch, ResultRecord};
pub use progress::Progress;
pub use query::QuerySpec;
pub use request::{Request, Response};
