//! Incremental paging over a segmented result object.

use catalog_name::Name;
use tracing::{debug, info};

use crate::core::{Termination, decode_batch, segment_termination};
use crate::data::{PageState, PageView, Response};
use crate::effects::segmented::SegmentFetcher;
use crate::effects::transport::Transport;
use crate::error::{Error, Result};

/// Where the pager is in its fetch cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerPhase {
    /// No query has been anchored yet.
    Empty,
    Fetching,
    Idle,
}

/// Accumulates result records and fetches further segments only when a
/// requested page is not yet materialized.
///
/// Pages already covered by local records, or any page once every result
/// has arrived, are served without touching the transport.
pub struct ResultPager<T> {
    fetcher: SegmentFetcher<T>,
    canonical: Option<Name>,
    state: PageState,
    phase: PagerPhase,
}

impl<T: Transport> ResultPager<T> {
    pub fn new(fetcher: SegmentFetcher<T>, page_size: usize) -> Self {
        Self {
            fetcher,
            canonical: None,
            state: PageState::new(page_size),
            phase: PagerPhase::Empty,
        }
    }

    pub fn state(&self) -> &PageState { &self.state }

    pub fn phase(&self) -> PagerPhase { self.phase }

    pub fn canonical_name(&self) -> Option<&Name> { self.canonical.as_ref() }

    pub fn current_page(&self) -> usize { self.state.current_page }

    /// Anchor the pager on `canonical` and take `first` as its segment 0.
    pub fn begin(&mut self, canonical: Name, first: &Response) -> Result<()> {
        debug!(name = %canonical, "anchoring result pager");
        self.state = PageState::new(self.state.page_size);
        self.canonical = Some(canonical);
        self.phase = PagerPhase::Fetching;
        let ingested = self.ingest(first, 0);
        self.phase = PagerPhase::Idle;
        ingested
    }

    /// Drop every accumulated record and the anchor.
    pub fn reset(&mut self) {
        self.state = PageState::new(self.state.page_size);
        self.canonical = None;
        self.phase = PagerPhase::Empty;
    }

    /// The query succeeded and every segment agrees there is nothing to show.
    pub fn has_no_results(&self) -> bool {
        self.phase != PagerPhase::Empty && self.state.records.is_empty() && self.state.is_complete()
    }

    fn ingest(&mut self, response: &Response, segment: u64) -> Result<()> {
        let batch = decode_batch(response)?;
        let received = batch.records().len();

        if let Some(count) = batch.result_count {
            self.state.result_count = Some(count);
        }
        self.state.append(batch.results.unwrap_or_default());
        self.state.retrieved_segments += 1;

        let terminal = segment_termination(response, segment, false) == Termination::DeclaredFinal;
        if terminal || received == 0 {
            self.state.exhausted = true;
        }

        debug!(
            segment,
            received,
            total = self.state.records.len(),
            result_count = ?self.state.result_count,
            exhausted = self.state.exhausted,
            "ingested result segment"
        );
        Ok(())
    }

    fn check_range(&self, page: usize) -> Result<()> {
        if self.state.is_out_of_range(page) {
            return Err(Error::PageOutOfRange {
                page,
                available: self.state.available().unwrap_or(self.state.records.len()),
            });
        }
        Ok(())
    }

    /// Materialize `page`, fetching further segments only as needed.
    pub async fn request_page(&mut self, page: usize) -> Result<PageView> {
        let canonical = self.canonical.clone().ok_or(Error::NoActiveQuery)?;

        if self.has_no_results() {
            return Ok(PageView::NoResults);
        }
        self.check_range(page)?;

        if !self.state.is_ready(page) {
            self.phase = PagerPhase::Fetching;
            let fetched = self.fill(&canonical, page).await;
            self.phase = PagerPhase::Idle;
            fetched?;
        }

        if self.has_no_results() {
            return Ok(PageView::NoResults);
        }
        self.check_range(page)?;

        self.state.current_page = page;
        info!(page, records = self.state.records.len(), "page ready");
        Ok(PageView::Records(self.state.page(page)))
    }

    async fn fill(&mut self, canonical: &Name, page: usize) -> Result<()> {
        while !self.state.is_ready(page) {
            let segment = self.state.retrieved_segments;
            let response = self.fetcher.fetch_segment(canonical, segment).await?;
            self.ingest(&response, segment)?;
        }
        Ok(())
    }

    pub async fn next_page(&mut self) -> Result<PageView> {
        self.request_page(self.state.current_page + 1).await
    }

    pub async fn previous_page(&mut self) -> Result<PageView> {
        match self.state.current_page.checked_sub(1) {
            Some(page) => self.request_page(page).await,
            None => Err(Error::InvalidState("already on the first page".to_string())),
        }
    }

    /// Change the page size and restart from segment 0 of the same result
    /// object.
    pub async fn set_page_size(&mut self, page_size: usize) -> Result<PageView> {
        let canonical = self.canonical.clone().ok_or(Error::NoActiveQuery)?;
        info!(page_size, name = %canonical, "page size changed, restarting");

        self.state = PageState::new(page_size);
        self.phase = PagerPhase::Fetching;
        let first = self.fetcher.fetch_segment(&canonical, 0).await;
        let ingested = first.and_then(|response| self.ingest(&response, 0));
        self.phase = PagerPhase::Idle;
        ingested?;

        self.request_page(0).await
    }
}
