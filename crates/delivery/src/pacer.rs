//! Send pacing — enforces a minimum interval between consecutive sends.
//!
//! Relay providers rate-limit per account (global, not per-connection), so
//! one pacer spans the whole batch. The pause sits between sends only;
//! neither the first send nor the batch tail waits.

use std::time::Duration;
use tokio::time::Instant;

pub struct SendPacer {
    interval: Duration,
    last: Option<Instant>,
}

impl SendPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns once at least `interval` has elapsed since the previous
    /// return. The first call never sleeps.
    pub async fn pace(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }
        self.last = Some(Instant::now());
    }
}
