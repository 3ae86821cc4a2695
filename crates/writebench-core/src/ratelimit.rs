//! Shared reservation-style rate limiter.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// How far the next free slot may trail the wall clock. When the per-permit
/// period is shorter than a timer tick, a waiter oversleeps past its slot;
/// the trailing window keeps that missed quota claimable so the aggregate
/// rate stays on target, while still bounding how much an idle stretch can
/// bank.
const MAX_SLACK: Duration = Duration::from_millis(5);

/// Shared gate bounding the aggregate submission rate across all workers.
///
/// Rather than tracking a token balance, the limiter hands out time slots:
/// each `acquire` claims the next free slot under the lock, advances it by
/// one period, and sleeps until its own slot. Waiters are admitted in the
/// order they reach the lock and never race for a refill, so no caller can
/// be overtaken indefinitely. `acquire` only ever delays, it cannot fail.
pub struct RateLimiter {
    period: Duration,
    slack: Duration,
    next_slot: Mutex<Instant>,
}

impl RateLimiter {
    /// Limiter admitting at most `rate_per_sec` acquisitions per second in
    /// steady state.
    pub fn new(rate_per_sec: u64) -> Self {
        let period = Duration::from_secs_f64(1.0 / rate_per_sec.max(1) as f64);
        Self {
            period,
            // Slack beyond the one permit that is always claimable at the
            // current instant. Zero at low rates, so an idle limiter still
            // admits at most one permit immediately.
            slack: MAX_SLACK.saturating_sub(period),
            next_slot: Mutex::new(Instant::now()),
        }
    }

    /// Suspend until one permit is available.
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let earliest = now.checked_sub(self.slack).unwrap_or(now);
            let slot = if *next > earliest { *next } else { earliest };
            *next = slot + self.period;
            slot
        };
        sleep_until(slot).await;
    }
}
