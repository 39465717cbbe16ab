use std::time::Duration;

/// Pause before re-issuing a timed-out request.
///
/// `retry` counts re-issues already made, so the pause before the second
/// attempt uses `0`. Each further retry doubles the pause; very long
/// schedules saturate at [`Duration::MAX`] rather than wrapping.
///
/// ```
/// use std::time::Duration;
/// use catalog_fetch::retry_delay;
///
/// let backoff = Duration::from_millis(50);
/// let schedule: Vec<_> = (0..3).map(|retry| retry_delay(retry, backoff)).collect();
/// assert_eq!(schedule, [50, 100, 200].map(Duration::from_millis));
/// ```
pub fn retry_delay(retry: u32, backoff: Duration) -> Duration {
    backoff.saturating_mul(2_u32.saturating_pow(retry))
}
