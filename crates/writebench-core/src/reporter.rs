//! Periodic throughput reporting.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::metrics::{AppendCounters, CounterSnapshot};

/// Rates derived from two counter snapshots over a measured wall-clock
/// window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportLine {
    pub success_per_sec: f64,
    pub failed_per_sec: f64,
    pub throughput_mib_per_sec: f64,
}

impl ReportLine {
    /// Compute rates for the window between `prev` and `current`.
    ///
    /// `elapsed` is the measured time between the samples, not the nominal
    /// report interval, so scheduling jitter does not skew the figures.
    pub fn compute(
        prev: CounterSnapshot,
        current: CounterSnapshot,
        elapsed: Duration,
        record_size: usize,
    ) -> Self {
        let secs = elapsed.as_secs_f64();
        if secs <= 0.0 {
            return Self {
                success_per_sec: 0.0,
                failed_per_sec: 0.0,
                throughput_mib_per_sec: 0.0,
            };
        }

        let delta_success = current.success.saturating_sub(prev.success) as f64;
        let delta_failed = current.failed.saturating_sub(prev.failed) as f64;

        Self {
            success_per_sec: delta_success / secs,
            failed_per_sec: delta_failed / secs,
            throughput_mib_per_sec: delta_success * record_size as f64
                / secs
                / (1024.0 * 1024.0),
        }
    }

    /// Single-line report format.
    pub fn render(&self) -> String {
        format!(
            "[Append]: success {:.6} record/s, failed {:.6} record/s, throughput {:.6} MB/s",
            self.success_per_sec, self.failed_per_sec, self.throughput_mib_per_sec
        )
    }
}

/// Infinite sampling loop: sleep an interval, snapshot the counters, print
/// the deltas, repeat. Ends only via the cancellation token.
pub struct Reporter {
    counters: Arc<AppendCounters>,
    record_size: usize,
    interval: Duration,
}

impl Reporter {
    pub fn new(counters: Arc<AppendCounters>, record_size: usize, interval: Duration) -> Self {
        Self {
            counters,
            record_size,
            interval,
        }
    }

    pub async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; consume it so the first
        // report covers a full interval.
        ticker.tick().await;

        let mut prev = self.counters.snapshot();
        let mut prev_at = Instant::now();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => return,
                _ = ticker.tick() => {}
            }

            let now = Instant::now();
            let current = self.counters.snapshot();
            let line = ReportLine::compute(prev, current, now - prev_at, self.record_size);

            // Report lines are the program's output, not diagnostics.
            println!("{}", line.render());

            prev = current;
            prev_at = now;
        }
    }
}
