use std::future::Future;
use std::sync::Arc;

use catalog_name::Name;

use crate::data::{Request, Response};

/// The transport gave up on a request without an answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no response within the request lifetime: {0}")]
pub struct TransportTimeout(pub Name);

/// Asynchronous request/response transport.
///
/// Every call resolves exactly once, either with a response or with a
/// timeout after the request's lifetime. Implementations must be safe to
/// reuse sequentially from several sessions.
///
/// # Implementations
///
/// - [`MemoryTransport`](crate::MemoryTransport): in-process packet store
/// - Network faces provided by the embedding application
pub trait Transport: Send + Sync {
    /// Express a single request.
    fn express(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Response, TransportTimeout>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn express(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Response, TransportTimeout>> + Send {
        (**self).express(request)
    }
}
