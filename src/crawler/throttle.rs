//! Politeness throttle
//!
//! Every completed request is followed by one fixed pause before the
//! fetcher returns. Fetches run strictly one after another, so the pause
//! is also the minimum spacing between requests to the target site.

use std::time::Duration;

/// Fixed post-request pause with bookkeeping
#[derive(Debug)]
pub struct Throttle {
    /// Pause applied after each completed request
    delay: Duration,

    /// Number of pauses taken so far
    pauses: u64,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pauses: 0,
        }
    }

    /// Sleeps for the configured delay and records the pause
    pub async fn pause(&mut self) {
        tracing::trace!("Politeness pause of {:?}", self.delay);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.pauses += 1;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Total pauses taken since creation
    pub fn pauses(&self) -> u64 {
        self.pauses
    }
}
