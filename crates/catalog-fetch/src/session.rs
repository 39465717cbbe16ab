//! Per-user retrieval session.
//!
//! A session owns every piece of mutable state a search produces: the
//! current query, its pager and the metadata cache. Nothing is shared
//! between sessions except the transport.

use std::fmt;
use std::sync::Arc;

use catalog_name::Name;
use tracing::{info, warn};

use crate::config::{CatalogConfig, RetrievalConfig};
use crate::data::page::DEFAULT_PAGE_SIZE;
use crate::data::{
    CancelToken, Completion, FetchOptions, PageState, PageView, QuerySpec, ResultRecord,
};
use crate::effects::{
    ActiveFilters, Autocompleter, FilterCategory, MetadataCache, QueryChannel, Requester,
    ResultPager, RetrievalPlan, RetrievalRequest, SegmentFetcher, Transport,
    load_filter_categories,
};
use crate::error::{Error, Result};

/// Coarse failure classes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    MalformedResponse,
    ConfigurationMissing,
    PageUnavailable,
    Cancelled,
    Other,
}

impl From<&Error> for ErrorKind {
    fn from(error: &Error) -> Self {
        match error {
            Error::Timeout { .. } | Error::SegmentTimeout { .. } => ErrorKind::Timeout,
            Error::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            Error::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Error::PageOutOfRange { .. } | Error::NoActiveQuery => ErrorKind::PageUnavailable,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::InvalidState(_) | Error::Config(_) | Error::Name(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::MalformedResponse => "malformed response",
            ErrorKind::ConfigurationMissing => "configuration missing",
            ErrorKind::PageUnavailable => "page unavailable",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Other => "error",
        };
        f.write_str(text)
    }
}

/// Receives rendered pages from [`RetrievalSession::render_page`].
pub trait RenderSink {
    fn on_page_ready(&mut self, records: &[ResultRecord], page_index: usize, total_known: bool);

    /// The query matched nothing.
    fn on_empty(&mut self) {}

    fn on_error(&mut self, kind: ErrorKind, context: &str);
}

pub struct RetrievalSession<T> {
    requester: Requester<T>,
    catalog_prefix: Name,
    pager: ResultPager<T>,
    metadata: MetadataCache,
    query: Option<QuerySpec>,
    page_size: usize,
}

impl<T: Transport> RetrievalSession<T> {
    pub fn new(transport: Arc<T>, catalog_prefix: Name) -> Self {
        let requester = Requester::new(transport);
        let pager = ResultPager::new(SegmentFetcher::new(requester.clone()), DEFAULT_PAGE_SIZE);
        Self {
            requester,
            catalog_prefix,
            pager,
            metadata: MetadataCache::new(),
            query: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn from_config(transport: Arc<T>, config: &CatalogConfig) -> Result<Self> {
        Ok(Self::new(transport, config.catalog_prefix()?))
    }

    /// Replace the request options. Drops any current results.
    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.requester = self.requester.with_options(options);
        self.clear();
        self
    }

    pub fn catalog_prefix(&self) -> &Name { &self.catalog_prefix }

    pub fn requester(&self) -> &Requester<T> { &self.requester }

    /// Token that cancels every further request of this session.
    pub fn cancel_token(&self) -> CancelToken { self.requester.cancel_token().clone() }

    /// Stop scheduling further attempts and segments. Cancellation is
    /// permanent for the session.
    pub fn cancel(&self) {
        info!("session cancelled");
        self.requester.cancel_token().cancel();
    }

    pub fn current_query(&self) -> Option<&QuerySpec> { self.query.as_ref() }

    pub fn page_state(&self) -> &PageState { self.pager.state() }

    pub fn pager(&self) -> &ResultPager<T> { &self.pager }

    pub fn metadata_cache(&self) -> &MetadataCache { &self.metadata }

    fn fetcher(&self) -> SegmentFetcher<T> { SegmentFetcher::new(self.requester.clone()) }

    /// Discard the current query and its results. Cached metadata is kept.
    pub fn clear(&mut self) {
        self.pager = ResultPager::new(self.fetcher(), self.page_size);
        self.query = None;
    }

    /// Run `spec` as a new query and return its first page.
    pub async fn search(&mut self, spec: QuerySpec) -> Result<PageView> {
        self.clear();
        info!(query = %spec.to_json(), "new search");

        let channel = QueryChannel::new(self.requester.clone(), self.catalog_prefix.clone());
        let response = channel.run_query(&spec).await?;
        let canonical = channel.canonical_name(&response);
        self.query = Some(spec);

        self.pager.begin(canonical, &response)?;
        self.pager.request_page(0).await
    }

    /// Search for everything under `path`.
    pub async fn path_search(&mut self, path: &str) -> Result<PageView> {
        self.search(QuerySpec::path(path)).await
    }

    pub async fn filter_search(&mut self, filters: &ActiveFilters) -> Result<PageView> {
        self.search(filters.to_query()).await
    }

    pub async fn show_page(&mut self, page: usize) -> Result<PageView> {
        self.pager.request_page(page).await
    }

    pub async fn next_page(&mut self) -> Result<PageView> { self.pager.next_page().await }

    pub async fn previous_page(&mut self) -> Result<PageView> { self.pager.previous_page().await }

    /// Change the records shown per page.
    ///
    /// With a query active the results restart from the first segment and
    /// page 0 is returned; otherwise the size applies to the next query.
    pub async fn set_page_size(&mut self, page_size: usize) -> Result<Option<PageView>> {
        self.page_size = page_size.max(1);
        if self.pager.canonical_name().is_some() {
            return self.pager.set_page_size(self.page_size).await.map(Some);
        }
        self.pager = ResultPager::new(self.fetcher(), self.page_size);
        Ok(None)
    }

    /// Next-component candidates for `partial`. Never fails.
    pub async fn autocomplete(&self, partial: &str) -> Completion {
        Autocompleter::new(self.requester.clone(), self.catalog_prefix.clone())
            .complete(partial)
            .await
    }

    pub async fn metadata(&mut self, record_name: &str) -> Result<String> {
        let fetcher = self.fetcher();
        self.metadata.lookup(&fetcher, record_name).await
    }

    pub async fn filter_categories(&self) -> Result<Vec<FilterCategory>> {
        load_filter_categories(&self.fetcher(), &self.catalog_prefix).await
    }

    /// Validate a retrieval against `config` and notify `destination`.
    pub async fn request_retrieval(
        &self,
        config: &RetrievalConfig,
        destination: &str,
        request: RetrievalRequest,
    ) -> Result<RetrievalPlan> {
        let plan = RetrievalPlan::new(config, destination, request)?;
        plan.notify(&self.requester).await?;
        info!(prefix = %plan.prefix(), destination, "retrieval initiated");
        Ok(plan)
    }

    /// Request `page` and hand the outcome to `sink`. Failures are reported
    /// to the sink, never returned.
    pub async fn render_page<S: RenderSink>(&mut self, page: usize, sink: &mut S) {
        match self.pager.request_page(page).await {
            Ok(PageView::Records(page)) => {
                sink.on_page_ready(&page.records, page.index, page.total_known)
            }
            Ok(PageView::NoResults) => sink.on_empty(),
            Err(e) => {
                warn!(page, error = %e, "page unavailable");
                sink.on_error(ErrorKind::from(&e), &e.to_string());
            }
        }
    }
}
