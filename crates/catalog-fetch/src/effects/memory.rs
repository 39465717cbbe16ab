//! In-process transport backed by a packet store.

use std::sync::{Mutex, MutexGuard};

use bytes::Bytes;
use catalog_name::Name;
use tracing::trace;

use crate::data::{Request, Response};
use crate::effects::transport::{Transport, TransportTimeout};

#[derive(Default)]
struct Store {
    packets: Vec<Response>,
    pending_timeouts: u32,
    log: Vec<Request>,
}

/// Answers requests from packets inserted ahead of time.
///
/// A request is satisfied by the packet with exactly its name, otherwise by
/// the first inserted packet whose name it is a prefix of. Unmatched
/// requests time out immediately. Every request is recorded.
#[derive(Default)]
pub struct MemoryTransport {
    store: Mutex<Store>,
}

impl MemoryTransport {
    pub fn new() -> Self { Self::default() }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, response: Response) { self.store().packets.push(response); }

    /// Publish `payloads` as segments `0..n` under `base`, every segment
    /// declaring the last index as final.
    pub fn insert_segments<I, B>(&self, base: &Name, payloads: I)
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let payloads: Vec<Bytes> = payloads.into_iter().map(Into::into).collect();
        let last = payloads.len().saturating_sub(1) as u64;
        let mut store = self.store();
        for (index, content) in payloads.into_iter().enumerate() {
            store.packets.push(
                Response::new(base.append_segment(index as u64), content).with_final_segment(last),
            );
        }
    }

    /// Drop every stored packet under `prefix`.
    pub fn remove_prefix(&self, prefix: &Name) {
        self.store().packets.retain(|p| !prefix.is_prefix_of(&p.name));
    }

    /// Let the next `count` requests time out regardless of content.
    pub fn time_out_next(&self, count: u32) { self.store().pending_timeouts += count; }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<Request> { self.store().log.clone() }

    pub fn request_count(&self) -> usize { self.store().log.len() }

    pub fn clear_log(&self) { self.store().log.clear(); }

    fn lookup(&self, request: &Request) -> Result<Response, TransportTimeout> {
        let mut store = self.store();
        store.log.push(request.clone());

        if store.pending_timeouts > 0 {
            store.pending_timeouts -= 1;
            trace!(name = %request.name, "injected timeout");
            return Err(TransportTimeout(request.name.clone()));
        }

        store
            .packets
            .iter()
            .find(|p| p.name == request.name)
            .or_else(|| store.packets.iter().find(|p| request.name.is_prefix_of(&p.name)))
            .cloned()
            .ok_or_else(|| TransportTimeout(request.name.clone()))
    }
}

impl Transport for MemoryTransport {
    async fn express(&self, request: &Request) -> Result<Response, TransportTimeout> {
        self.lookup(request)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn request(uri: &str) -> Request {
        Request::new(Name::parse(uri).unwrap(), true, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn test_exact_then_prefix_match() {
        let transport = MemoryTransport::new();
        let base = Name::parse("/obj/v1").unwrap();
        transport.insert_segments(&base, ["a", "b"]);

        let exact = transport.express(&request("/obj/v1/%00%01")).await.unwrap();
        assert_eq!(&exact.content[..], b"b");
        assert!(exact.is_terminal_segment());

        let by_prefix = transport.express(&request("/obj")).await.unwrap();
        assert_eq!(by_prefix.segment(), Some(0));
    }

    #[tokio::test]
    async fn test_unmatched_and_injected_timeouts() {
        let transport = MemoryTransport::new();
        transport.insert(Response::new(Name::parse("/a").unwrap(), "x"));
        assert!(transport.express(&request("/b")).await.is_err());

        transport.time_out_next(1);
        assert!(transport.express(&request("/a")).await.is_err());
        assert!(transport.express(&request("/a")).await.is_ok());
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_remove_prefix() {
        let transport = MemoryTransport::new();
        transport.insert_segments(&Name::parse("/obj").unwrap(), ["a"]);
        transport.remove_prefix(&Name::parse("/obj").unwrap());
        assert!(transport.express(&request("/obj")).await.is_err());
    }
}
