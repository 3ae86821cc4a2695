//! Top-level orchestration.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::client::{Record, StreamClient};
use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::metrics::AppendCounters;
use crate::partition::partition_round_robin;
use crate::ratelimit::RateLimiter;
use crate::reporter::Reporter;
use crate::worker::WorkerLoop;

/// Orchestrates one benchmark run: provisions streams, partitions their
/// channels across workers, starts the worker loops and the reporter, and
/// runs until the token is cancelled (normally never; the process is
/// stopped externally).
pub struct Harness<C: StreamClient> {
    config: BenchConfig,
    client: C,
    counters: Arc<AppendCounters>,
}

impl<C: StreamClient> Harness<C> {
    pub fn new(config: BenchConfig, client: C) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Self {
            config,
            client,
            counters: Arc::new(AppendCounters::new()),
        })
    }

    /// Shared completion counters; read them after a cancelled test run.
    pub fn counters(&self) -> Arc<AppendCounters> {
        Arc::clone(&self.counters)
    }

    /// Delete every stream currently on the service. Optional pre-run
    /// cleanup step; never invoked once the benchmark is running.
    pub async fn remove_all_streams(&self) -> Result<(), BenchError> {
        let streams = self
            .client
            .list_streams()
            .await
            .map_err(|e| BenchError::Client(Box::new(e)))?;
        for stream in streams {
            info!(%stream, "deleting stream");
            self.client
                .delete_stream(&stream)
                .await
                .map_err(|e| BenchError::Client(Box::new(e)))?;
        }
        Ok(())
    }

    /// Run the benchmark until `shutdown` fires.
    ///
    /// Stream creation fails fast: the first error aborts startup before
    /// any worker is spawned.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), BenchError> {
        let settings = self.config.channel_settings();

        let mut channels = Vec::with_capacity(self.config.stream_count);
        for index in 0..self.config.stream_count {
            let name = self.config.stream_name(index);
            self.client
                .create_stream(&name)
                .await
                .map_err(|e| BenchError::StreamProvisioning {
                    stream: name.clone(),
                    source: Box::new(e),
                })?;
            let channel = self.client.open_channel(&name, settings).map_err(|e| {
                BenchError::StreamProvisioning {
                    stream: name.clone(),
                    source: Box::new(e),
                }
            })?;
            channels.push(channel);
        }
        info!(
            streams = channels.len(),
            workers = self.config.worker_count,
            "streams provisioned"
        );

        let limiter = Arc::new(RateLimiter::new(self.config.rate_limit));
        let record = Record::random(self.config.record_size);

        for (worker_id, owned) in partition_round_robin(channels, self.config.worker_count)
            .into_iter()
            .enumerate()
        {
            let worker = WorkerLoop::new(
                worker_id,
                owned,
                Arc::clone(&limiter),
                Arc::clone(&self.counters),
                record.clone(),
            );
            tokio::spawn(worker.run(shutdown.child_token()));
        }

        let reporter = Reporter::new(
            Arc::clone(&self.counters),
            self.config.record_size,
            Duration::from_secs(self.config.report_interval_secs),
        );
        reporter.run(shutdown).await;
        Ok(())
    }
}
