//! Worker loops: the continuous generators of load.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{Record, WriteChannel};
use crate::metrics::AppendCounters;
use crate::ratelimit::RateLimiter;

/// One long-lived worker driving a disjoint set of write channels.
///
/// The loop cycles its channels round-robin forever: acquire one rate
/// permit, submit the shared record, hand the completion to a
/// fire-and-forget task that bumps the success or failure counter, and move
/// straight on. It never waits for completions, never retries a failed
/// record, and stops only when the cancellation token fires (production
/// never cancels; tests do).
pub struct WorkerLoop<C> {
    id: usize,
    channels: Vec<C>,
    limiter: Arc<RateLimiter>,
    counters: Arc<AppendCounters>,
    record: Record,
}

impl<C: WriteChannel> WorkerLoop<C> {
    pub fn new(
        id: usize,
        channels: Vec<C>,
        limiter: Arc<RateLimiter>,
        counters: Arc<AppendCounters>,
        record: Record,
    ) -> Self {
        Self {
            id,
            channels,
            limiter,
            counters,
            record,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        debug!(worker = self.id, channels = self.channels.len(), "worker started");

        if self.channels.is_empty() {
            // More workers than streams; nothing to drive.
            shutdown.cancelled().await;
            return;
        }

        loop {
            for channel in &self.channels {
                tokio::select! {
                    biased;
                    _ = shutdown.cancelled() => {
                        debug!(worker = self.id, "worker stopped");
                        return;
                    }
                    _ = self.limiter.acquire() => {}
                }

                let completion = channel.submit(&self.record);
                let counters = Arc::clone(&self.counters);
                // Completions resolve on whatever thread the channel's
                // delivery machinery uses; the handler does one atomic
                // increment and nothing else.
                tokio::spawn(async move {
                    match completion.await {
                        Ok(_) => counters.record_success(),
                        Err(_) => counters.record_failure(),
                    }
                });
            }
        }
    }
}
