//! Sequential retrieval of segmented objects.
//!
//! Segments are requested one at a time because the final segment number
//! may only become known from a later segment. Nothing is fetched past the
//! segment that declares itself final.

use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use catalog_name::Name;
use futures_util::Stream;
use futures_util::stream;
use tracing::debug;

use crate::core::{Termination, segment_termination};
use crate::data::Response;
use crate::effects::requester::Requester;
use crate::effects::transport::Transport;
use crate::error::{Error, Result};

/// A boxed stream type for segment sequences.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// Fetches numbered segments of one logical object.
pub struct SegmentFetcher<T> {
    requester: Requester<T>,
}

impl<T> Clone for SegmentFetcher<T> {
    fn clone(&self) -> Self {
        Self {
            requester: self.requester.clone(),
        }
    }
}

impl<T: Transport> SegmentFetcher<T> {
    pub fn new(requester: Requester<T>) -> Self { Self { requester } }

    pub fn requester(&self) -> &Requester<T> { &self.requester }

    /// Fetch `base / segment`, reporting an exhausted retry budget as a
    /// segment failure.
    pub async fn fetch_segment(&self, base: &Name, segment: u64) -> Result<Response> {
        let name = base.append_segment(segment);
        self.requester.send(&name).await.map_err(|e| match e {
            Error::Timeout { name, .. } => Error::SegmentTimeout { name },
            other => other,
        })
    }

    /// Fetch every segment of `base` until the declared final one.
    pub async fn fetch_all(&self, base: &Name) -> Result<Bytes> {
        self.fetch_all_with(base, false).await
    }

    /// Fetch and concatenate every segment of `base`.
    ///
    /// With `stop_on_missing_final` set, a segment that declares no final id
    /// also ends the walk; single-shot probes use this.
    pub async fn fetch_all_with(&self, base: &Name, stop_on_missing_final: bool) -> Result<Bytes> {
        let mut cursor = self.cursor(base.clone(), stop_on_missing_final);
        let mut buffer = BytesMut::new();

        while let Some(response) = cursor.next_segment().await? {
            buffer.extend_from_slice(&response.content);
        }

        debug!(name = %base, segments = cursor.fetched(), bytes = buffer.len(), "object retrieved");
        Ok(buffer.freeze())
    }

    /// Lazy walk over the segments of `base`.
    pub fn cursor(&self, base: Name, stop_on_missing_final: bool) -> SegmentCursor<'_, T> {
        SegmentCursor {
            fetcher: self,
            base,
            next: 0,
            stop_on_missing_final,
            done: false,
        }
    }
}

/// Yields the segments of one object in order.
///
/// Finite: ends after the terminal segment or the first failure. Not
/// restartable; starting over means a new cursor from segment 0.
pub struct SegmentCursor<'a, T> {
    fetcher: &'a SegmentFetcher<T>,
    base: Name,
    next: u64,
    stop_on_missing_final: bool,
    done: bool,
}

impl<'a, T: Transport> SegmentCursor<'a, T> {
    /// Fetch the next segment. `Ok(None)` once the object is complete.
    pub async fn next_segment(&mut self) -> Result<Option<Response>> {
        if self.done {
            return Ok(None);
        }

        let segment = self.next;
        let response = match self.fetcher.fetch_segment(&self.base, segment).await {
            Ok(response) => response,
            Err(e) => {
                self.done = true;
                return Err(e);
            }
        };

        match segment_termination(&response, segment, self.stop_on_missing_final) {
            Termination::Continue => self.next += 1,
            reason => {
                debug!(name = %self.base, segment, ?reason, "terminal segment");
                self.next += 1;
                self.done = true;
            }
        }

        Ok(Some(response))
    }

    /// Segments received so far.
    pub fn fetched(&self) -> u64 { self.next }

    pub fn is_done(&self) -> bool { self.done }

    /// Turn the cursor into a stream of segments.
    pub fn into_stream(self) -> BoxStream<'a, Result<Response>>
    where
        T: 'a,
    {
        Box::pin(stream::unfold(self, |mut cursor| async move {
            match cursor.next_segment().await {
                Ok(Some(response)) => Some((Ok(response), cursor)),
                Ok(None) => None,
                Err(e) => Some((Err(e), cursor)),
            }
        }))
    }
}
