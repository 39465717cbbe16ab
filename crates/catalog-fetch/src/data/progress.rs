use catalog_name::Name;

/// Outcome of one attempt of a retrying request.
///
/// Passed to progress callbacks so a caller can show "attempt k of N".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Name of the request being retried.
    pub name: Name,

    /// Whether this attempt produced a response.
    pub success: bool,

    /// Attempts finished so far, including this one.
    pub completed_attempts: u32,

    /// Attempt budget for the request.
    pub total_attempts: u32,
}

impl Progress {
    pub fn timed_out(name: Name, completed_attempts: u32, total_attempts: u32) -> Self {
        Self {
            name,
            success: false,
            completed_attempts,
            total_attempts,
        }
    }

    pub fn succeeded(name: Name, completed_attempts: u32, total_attempts: u32) -> Self {
        Self {
            name,
            success: true,
            completed_attempts,
            total_attempts,
        }
    }

    /// Attempts still available after this one.
    #[must_use]
    pub fn remaining_attempts(&self) -> u32 {
        if self.success {
            0
        } else {
            self.total_attempts.saturating_sub(self.completed_attempts)
        }
    }

    /// Returns `true` if the request has given up.
    #[must_use]
    pub fn is_exhausted(&self) -> bool { !self.success && self.remaining_attempts() == 0 }
}
