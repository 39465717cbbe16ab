//! Best-effort path completion.

use catalog_name::Name;
use tracing::{debug, warn};

use crate::core::{
    Termination, build_query_name, completion_termination, decode_completion, next_segment_name,
};
use crate::data::{Completion, QuerySpec};
use crate::effects::requester::Requester;
use crate::effects::transport::Transport;

/// Walks the segments of a completion answer, merging each decoded segment
/// into one candidate list.
///
/// Never fails: on timeout, cancellation or a malformed segment the
/// candidates merged so far are returned and a warning is logged.
pub struct Autocompleter<T> {
    requester: Requester<T>,
    catalog_prefix: Name,
}

impl<T: Transport> Autocompleter<T> {
    pub fn new(requester: Requester<T>, catalog_prefix: Name) -> Self {
        Self {
            requester,
            catalog_prefix,
        }
    }

    pub async fn complete(&self, partial: &str) -> Completion {
        let spec = QuerySpec::completion(partial);
        let mut name = build_query_name(&self.catalog_prefix, &spec);
        let mut merged = Completion::default();
        let mut requested = 0u64;
        let mut segments = 0u32;

        loop {
            let response = match self.requester.send(&name).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(partial, segments, error = %e, "completion truncated");
                    return merged;
                }
            };
            segments += 1;

            let termination = completion_termination(&response, requested);
            if termination == Termination::EmptyPayload {
                break;
            }

            match decode_completion(&response) {
                Ok(completion) => merged.merge(completion),
                Err(e) => {
                    warn!(partial, segments, error = %e, "completion truncated");
                    return merged;
                }
            }

            if termination.is_stop() {
                break;
            }
            let Some(next) = next_segment_name(&response) else {
                debug!(name = %response.name, "unsegmented completion answer");
                break;
            };
            requested = response.segment().unwrap_or(requested) + 1;
            name = next;
        }

        debug!(partial, segments, candidates = merged.next.len(), "completion done");
        merged
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::Response;
    use crate::effects::memory::MemoryTransport;

    fn prefix() -> Name { Name::parse("/catalog/myUniqueName").unwrap() }

    fn setup() -> (Arc<MemoryTransport>, Autocompleter<MemoryTransport>, Name) {
        let transport = Arc::new(MemoryTransport::new());
        let completer = Autocompleter::new(Requester::new(Arc::clone(&transport)), prefix());
        let base = build_query_name(&prefix(), &QuerySpec::completion("/cmip5/")).append("v1");
        (transport, completer, base)
    }

    #[tokio::test]
    async fn test_merges_segments_until_final() {
        let (transport, completer, base) = setup();
        transport.insert_segments(&base, [r#"{"next":["a","b"]}"#, r#"{"next":["c"]}"#]);

        let completion = completer.complete("/cmip5/").await;

        assert_eq!(completion.next, vec!["a", "b", "c"]);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_segment_ends_walk() {
        let (transport, completer, base) = setup();
        transport.insert(Response::new(base.append_segment(0), r#"{"next":["x"]}"#));
        transport.insert(Response::new(base.append_segment(1), ""));
        transport.insert(Response::new(base.append_segment(2), r#"{"next":["never"]}"#));

        let completion = completer.complete("/cmip5/").await;

        assert_eq!(completion.next, vec!["x"]);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_timeout_returns_partial() {
        let (transport, completer, base) = setup();
        transport.insert(
            Response::new(base.append_segment(0), r#"{"next":["a"]}"#).with_final_segment(3),
        );

        let completion = completer.complete("/cmip5/").await;

        assert_eq!(completion.next, vec!["a"]);
        // one answered request, then four attempts on segment 1
        assert_eq!(transport.request_count(), 5);
    }

    #[tokio::test]
    async fn test_leaf_flag_threads_through() {
        let (transport, completer, base) = setup();
        transport.insert_segments(&base, [r#"{"next":["file.nc"],"lastComponent":true}"#]);

        let completion = completer.complete("/cmip5/").await;

        assert!(completion.last_component);
        assert_eq!(completion.next, vec!["file.nc"]);
    }

    #[tokio::test]
    async fn test_malformed_segment_returns_partial() {
        let (transport, completer, base) = setup();
        transport.insert(Response::new(base.append_segment(0), r#"{"next":["a"]}"#));
        transport.insert(Response::new(base.append_segment(1), "garbage"));

        assert_eq!(completer.complete("/cmip5/").await.next, vec!["a"]);
    }
}
