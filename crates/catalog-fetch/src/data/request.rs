use std::time::Duration;

use bytes::Bytes;
use catalog_name::{Component, Name};

/// A single outgoing request. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub name: Name,
    pub must_be_fresh: bool,
    pub lifetime: Duration,
}

impl Request {
    pub fn new(name: Name, must_be_fresh: bool, lifetime: Duration) -> Self {
        Self {
            name,
            must_be_fresh,
            lifetime,
        }
    }
}

/// A reply to a [`Request`], possibly one fragment of a larger object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Name the producer attached to the reply. May be longer than the
    /// requested name (version and segment components).
    pub name: Name,

    pub content: Bytes,

    /// Declared final segment id, when the producer knows it.
    pub final_block_id: Option<Component>,
}

impl Response {
    pub fn new(name: Name, content: impl Into<Bytes>) -> Self {
        Self {
            name,
            content: content.into(),
            final_block_id: None,
        }
    }

    /// Attach the declared final segment number.
    #[must_use]
    pub fn with_final_segment(mut self, segment: u64) -> Self {
        self.final_block_id = Some(Component::from_segment(segment));
        self
    }

    #[must_use]
    pub fn with_final_block_id(mut self, id: Option<Component>) -> Self {
        self.final_block_id = id;
        self
    }

    /// Segment number in the response's own name.
    pub fn segment(&self) -> Option<u64> { self.name.segment() }

    /// Declared final segment number, if present and decodable.
    pub fn final_segment(&self) -> Option<u64> {
        self.final_block_id.as_ref().and_then(|id| id.to_segment().ok())
    }

    pub fn has_final_marker(&self) -> bool {
        self.final_block_id.as_ref().is_some_and(|id| !id.is_empty())
    }

    /// True when the response declares itself the last segment.
    pub fn is_terminal_segment(&self) -> bool {
        match (self.segment(), self.final_segment()) {
            (Some(own), Some(last)) => own == last,
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool { self.content.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg_name(n: u64) -> Name { Name::parse("/obj").unwrap().append_segment(n) }

    #[test]
    fn test_terminal_when_own_segment_matches_final() {
        let r = Response::new(seg_name(2), "x").with_final_segment(2);
        assert!(r.is_terminal_segment());
        let r = Response::new(seg_name(1), "x").with_final_segment(2);
        assert!(!r.is_terminal_segment());
    }

    #[test]
    fn test_not_terminal_without_marker() {
        let r = Response::new(seg_name(0), "x");
        assert!(!r.has_final_marker());
        assert!(!r.is_terminal_segment());
    }

    #[test]
    fn test_empty_marker_counts_as_absent() {
        let r = Response::new(seg_name(0), "").with_final_block_id(Some(Component::new(Vec::new())));
        assert!(!r.has_final_marker());
        assert!(r.is_empty());
    }
}
