//! Rolling quota pacing
//!
//! A local approximation of the service's rolling element quota. One pacer
//! lives for exactly one top-level request and is never shared.

use std::time::Duration;

use tracing::debug;

/// Element budget tracker for sequential calls
#[derive(Debug, Clone)]
pub struct QuotaPacer {
    per_call_cap: usize,
    remaining: usize,
    wait: Duration,
}

impl QuotaPacer {
    /// Create a pacer with a full budget
    #[must_use]
    pub const fn new(per_call_cap: usize, wait: Duration) -> Self {
        Self {
            per_call_cap,
            remaining: per_call_cap,
            wait,
        }
    }

    /// Elements left in the current window
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.remaining
    }

    /// Admit a call needing `need` elements
    ///
    /// Returns the wait to apply before dispatching when the remaining budget
    /// is insufficient; the budget is reset to the full cap in that case.
    pub fn admit(&mut self, need: usize) -> Option<Duration> {
        if need <= self.remaining {
            return None;
        }

        debug!(
            need,
            remaining = self.remaining,
            wait_ms = u64::try_from(self.wait.as_millis()).unwrap_or(u64::MAX),
            "Element budget exhausted, pacing next call"
        );
        self.remaining = self.per_call_cap;
        Some(self.wait)
    }

    /// Account for a successfully dispatched call
    pub fn commit(&mut self, need: usize) {
        self.remaining = self.remaining.saturating_sub(need);
    }
}
