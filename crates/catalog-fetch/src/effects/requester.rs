//! Bounded-attempt request retry.

use std::sync::Arc;

use catalog_name::Name;
use tracing::{debug, warn};

use crate::core::retry_delay;
use crate::data::{CancelToken, FetchOptions, Progress, Request, Response};
use crate::effects::transport::Transport;
use crate::error::{Error, Result};

/// Wraps one logical request in a retry loop with progress reporting.
///
/// Attempts run strictly one after another. The first response ends the
/// loop; when every attempt times out the request fails with
/// [`Error::Timeout`].
pub struct Requester<T> {
    transport: Arc<T>,
    options: FetchOptions,
    cancel: CancelToken,
}

impl<T> Clone for Requester<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            options: self.options.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T: Transport> Requester<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            options: FetchOptions::default(),
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    pub fn cancel_token(&self) -> &CancelToken { &self.cancel }

    pub fn transport(&self) -> &Arc<T> { &self.transport }

    /// Build the request issued for `name` under the current options.
    pub fn request_for(&self, name: Name) -> Request {
        Request::new(name, self.options.must_be_fresh, self.options.lifetime)
    }

    pub async fn send(&self, name: &Name) -> Result<Response> {
        self.send_request(self.request_for(name.clone())).await
    }

    /// Send `request`, retrying on timeout until the attempt budget is spent.
    pub async fn send_request(&self, request: Request) -> Result<Response> {
        let total = self.options.max_attempts.max(1);

        for attempt in 0..total {
            if attempt > 0 && !self.options.retry_backoff.is_zero() {
                tokio::time::sleep(retry_delay(attempt - 1, self.options.retry_backoff)).await;
            }
            if self.cancel.is_cancelled() {
                debug!(name = %request.name, "request cancelled before attempt {}", attempt + 1);
                return Err(Error::Cancelled);
            }

            let outcome =
                tokio::time::timeout(request.lifetime, self.transport.express(&request)).await;

            if self.cancel.is_cancelled() {
                debug!(name = %request.name, "discarding result that arrived after cancellation");
                return Err(Error::Cancelled);
            }

            match outcome {
                Ok(Ok(response)) => {
                    debug!(name = %request.name, attempt = attempt + 1, "response received");
                    self.options
                        .report(Progress::succeeded(request.name.clone(), attempt + 1, total));
                    return Ok(response);
                }
                Ok(Err(_)) | Err(_) => {
                    debug!(name = %request.name, attempt = attempt + 1, total, "attempt timed out");
                    self.options
                        .report(Progress::timed_out(request.name.clone(), attempt + 1, total));
                }
            }
        }

        warn!(name = %request.name, attempts = total, "request failed after all attempts");
        Err(Error::Timeout {
            name: request.name,
            attempts: total,
        })
    }
}
