//! Query submission against the catalog.

use catalog_name::Name;
use tracing::debug;

use crate::core::{build_query_name, canonical_query_name};
use crate::data::{QuerySpec, Response};
use crate::effects::requester::Requester;
use crate::effects::transport::Transport;
use crate::error::Result;

/// Builds query names under one catalog prefix and runs the first exchange.
pub struct QueryChannel<T> {
    requester: Requester<T>,
    catalog_prefix: Name,
}

impl<T: Transport> QueryChannel<T> {
    pub fn new(requester: Requester<T>, catalog_prefix: Name) -> Self {
        Self {
            requester,
            catalog_prefix,
        }
    }

    pub fn catalog_prefix(&self) -> &Name { &self.catalog_prefix }

    pub fn build_request_name(&self, spec: &QuerySpec) -> Name {
        build_query_name(&self.catalog_prefix, spec)
    }

    /// Issue the query and return its first response.
    ///
    /// The response name usually carries components past the query; see
    /// [`QueryChannel::canonical_name`].
    pub async fn run_query(&self, spec: &QuerySpec) -> Result<Response> {
        let name = self.build_request_name(spec);
        debug!(query = %spec.to_json(), %name, "running query");
        self.requester.send(&name).await
    }

    /// Anchor for paging through the results of `response`.
    pub fn canonical_name(&self, response: &Response) -> Name {
        canonical_query_name(&self.catalog_prefix, &response.name)
    }
}
