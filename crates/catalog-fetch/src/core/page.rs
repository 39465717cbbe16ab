use std::ops::Range;

/// Record positions covered by `page` (zero-indexed).
pub fn page_range(page: usize, page_size: usize) -> Range<usize> {
    let start = page.saturating_mul(page_size);
    start..start.saturating_add(page_size)
}

/// The part of `records` that falls on `page`; shorter or empty near the end.
pub fn page_slice<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    let range = page_range(page, page_size);
    let start = range.start.min(records.len());
    let end = range.end.min(records.len());
    &records[start..end]
}
