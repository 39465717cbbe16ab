use crate::core::{page_range, page_slice};
use crate::data::payload::ResultRecord;

/// Records shown per page unless the caller picks another size.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Accumulated results of one query session.
///
/// `records` only grows within a session; a new query or a page size change
/// replaces the whole state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub records: Vec<ResultRecord>,

    /// Declared total. `None` until a segment has reported it.
    pub result_count: Option<u64>,

    pub current_page: usize,

    pub page_size: usize,

    /// Segments of the canonical result object ingested so far.
    pub retrieved_segments: u64,

    /// The terminal segment has been seen; no further segments exist.
    pub exhausted: bool,
}

impl Default for PageState {
    fn default() -> Self { Self::new(DEFAULT_PAGE_SIZE) }
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            records: Vec::new(),
            result_count: None,
            current_page: 0,
            page_size: page_size.max(1),
            retrieved_segments: 0,
            exhausted: false,
        }
    }

    /// Every record of the result set is held locally.
    pub fn is_complete(&self) -> bool {
        self.exhausted
            || self
                .result_count
                .is_some_and(|count| self.records.len() as u64 >= count)
    }

    /// The record range of `page` is fully materialized.
    pub fn covers(&self, page: usize) -> bool {
        self.records.len() >= page_range(page, self.page_size).end
    }

    /// Rendering `page` needs no further segments.
    pub fn is_ready(&self, page: usize) -> bool { self.is_complete() || self.covers(page) }

    /// Records known to exist: the local count once complete, otherwise the
    /// declared total when there is one.
    pub fn available(&self) -> Option<usize> {
        if self.is_complete() {
            Some(self.records.len())
        } else {
            self.result_count.map(|count| count as usize)
        }
    }

    /// `page` starts past the last record known to exist.
    pub fn is_out_of_range(&self, page: usize) -> bool {
        page > 0
            && self
                .available()
                .is_some_and(|available| page_range(page, self.page_size).start >= available)
    }

    pub fn append(&mut self, records: impl IntoIterator<Item = ResultRecord>) {
        self.records.extend(records);
    }

    /// Snapshot of `page` from the accumulated records.
    pub fn page(&self, index: usize) -> Page {
        let records = page_slice(&self.records, index, self.page_size).to_vec();
        let range = page_range(index, self.page_size);
        let total_known = self.is_complete() || self.result_count.is_some();
        let has_next = match (self.is_complete(), self.result_count) {
            (true, _) => range.end < self.records.len(),
            (false, Some(count)) => (range.end as u64) < count,
            (false, None) => true,
        };

        Page {
            index,
            offset: range.start,
            records,
            total: if self.exhausted {
                Some(self.records.len() as u64)
            } else {
                self.result_count
            },
            total_known,
            has_previous: index > 0,
            has_next,
        }
    }
}

/// One rendered page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub index: usize,

    /// Position of the first record in the whole result set.
    pub offset: usize,

    pub records: Vec<ResultRecord>,

    pub total: Option<u64>,

    pub total_known: bool,

    pub has_previous: bool,

    pub has_next: bool,
}

impl Page {
    /// One past the position of the last record shown.
    pub fn end(&self) -> usize { self.offset + self.records.len() }
}

/// What a page request resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Records(Page),

    /// The query succeeded and matched nothing.
    NoResults,
}

impl PageView {
    pub fn page(&self) -> Option<&Page> {
        match self {
            PageView::Records(page) => Some(page),
            PageView::NoResults => None,
        }
    }

    pub fn is_empty(&self) -> bool { matches!(self, PageView::NoResults) }
}
