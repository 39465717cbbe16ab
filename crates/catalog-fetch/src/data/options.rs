use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use super::progress::Progress;

/// Attempts made for one logical request before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Lifetime of a single request attempt.
pub const DEFAULT_LIFETIME: Duration = Duration::from_millis(500);

/// Configuration for retrying requests.
///
/// # Examples
///
/// ```
/// use catalog_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_attempts(6)
///     .lifetime(Duration::from_secs(1))
///     .must_be_fresh(false);
/// assert_eq!(options.max_attempts, 6);
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Total attempts per logical request, including the first one.
    ///
    /// Default: 4
    pub max_attempts: u32,

    /// Lifetime of every attempt. An attempt without an answer inside this
    /// window counts as a timeout.
    ///
    /// Default: 500ms
    pub lifetime: Duration,

    /// Ask for fresh data only; cached stale copies must not satisfy it.
    ///
    /// Default: true
    pub must_be_fresh: bool,

    /// Base delay for exponential backoff between attempts.
    ///
    /// Zero re-issues immediately after a timeout.
    ///
    /// Default: zero
    pub retry_backoff: Duration,

    /// Progress callback invoked after every attempt.
    ///
    /// Every event for a request is delivered before the request resolves.
    ///
    /// Default: None
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("max_attempts", &self.max_attempts)
            .field("lifetime", &self.lifetime)
            .field("must_be_fresh", &self.must_be_fresh)
            .field("retry_backoff", &self.retry_backoff)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lifetime: DEFAULT_LIFETIME,
            must_be_fresh: true,
            retry_backoff: Duration::ZERO,
            on_progress: None,
        }
    }
}

impl FetchOptions {
    /// Set the attempt budget. Values below one are treated as one.
    #[must_use]
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    #[must_use]
    pub fn lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    #[must_use]
    pub fn must_be_fresh(mut self, must_be_fresh: bool) -> Self {
        self.must_be_fresh = must_be_fresh;
        self
    }

    #[must_use]
    pub fn retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Set the progress callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use catalog_fetch::{FetchOptions, Progress};
    /// use std::sync::Arc;
    ///
    /// let options = FetchOptions::default().on_progress(Arc::new(|p: &Progress| {
    ///     if !p.success {
    ///         println!("attempt {} of {} timed out", p.completed_attempts, p.total_attempts);
    ///     }
    /// }));
    /// ```
    #[must_use]
    pub fn on_progress(mut self, on_progress: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(on_progress);
        self
    }

    /// Forward progress events into a channel instead of a callback.
    #[must_use]
    pub fn progress_sender(self, sender: UnboundedSender<Progress>) -> Self {
        self.on_progress(Arc::new(move |progress: &Progress| {
            let _ = sender.send(progress.clone());
        }))
    }

    pub(crate) fn report(&self, progress: Progress) {
        if let Some(ref callback) = self.on_progress {
            callback(&progress);
        }
    }
}

/// Cooperative cancellation flag shared between a session and its caller.
///
/// Cancelling stops further attempts and segments from being scheduled. An
/// exchange already in flight is not aborted; its late result is dropped.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self { Self::default() }

    pub fn cancel(&self) { self.0.store(true, Ordering::SeqCst); }

    pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::SeqCst) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = FetchOptions::default();
        assert_eq!(options.max_attempts, 4);
        assert_eq!(options.lifetime, Duration::from_millis(500));
        assert!(options.must_be_fresh);
        assert_eq!(options.retry_backoff, Duration::ZERO);
        assert!(options.on_progress.is_none());
    }

    #[test]
    fn test_max_attempts_floor() {
        assert_eq!(FetchOptions::default().max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_progress_sender() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let options = FetchOptions::default().progress_sender(tx);
        options.report(Progress::timed_out(catalog_name::Name::new(), 1, 4));
        let received = rx.try_recv().unwrap();
        assert!(!received.success);
        assert_eq!(received.completed_attempts, 1);
    }
}
