//! Immutable run configuration.

use crate::client::ChannelSettings;
use crate::error::BenchError;

/// Snapshot of all run parameters, fixed for the lifetime of the process.
///
/// `stream_count` streams are distributed as evenly as possible across
/// `worker_count` workers; the former need not be a multiple of the latter.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Streaming service endpoint (bootstrap broker list).
    pub service_url: String,
    /// Streams are named `prefix + index` with `index` in `[0, stream_count)`.
    pub stream_name_prefix: String,
    /// Record payload size in bytes.
    pub record_size: usize,
    /// Channel time-based flush trigger in milliseconds.
    pub flush_interval_ms: u64,
    /// Channel byte-size flush trigger.
    pub buffer_bytes: usize,
    /// Number of streams to create and write to.
    pub stream_count: usize,
    /// Number of parallel worker loops.
    pub worker_count: usize,
    /// Reporting interval in seconds.
    pub report_interval_secs: u64,
    /// Target aggregate write rate in records per second.
    pub rate_limit: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            service_url: "localhost:9092".to_string(),
            stream_name_prefix: "write_bench_stream_".to_string(),
            record_size: 1024,
            flush_interval_ms: 10,
            buffer_bytes: 1024 * 1024,
            stream_count: 100,
            worker_count: 4,
            report_interval_secs: 3,
            rate_limit: 100_000,
        }
    }
}

impl BenchConfig {
    /// Reject configurations that would make the run degenerate. Called
    /// before any I/O happens.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.stream_count == 0 {
            return Err(BenchError::InvalidConfig("stream count must be > 0".into()));
        }
        if self.worker_count == 0 {
            return Err(BenchError::InvalidConfig("worker count must be > 0".into()));
        }
        if self.record_size == 0 {
            return Err(BenchError::InvalidConfig("record size must be > 0".into()));
        }
        if self.rate_limit == 0 {
            return Err(BenchError::InvalidConfig("rate limit must be > 0".into()));
        }
        if self.flush_interval_ms == 0 {
            return Err(BenchError::InvalidConfig(
                "flush time trigger must be > 0".into(),
            ));
        }
        if self.buffer_bytes == 0 {
            return Err(BenchError::InvalidConfig("buffer size must be > 0".into()));
        }
        if self.report_interval_secs == 0 {
            return Err(BenchError::InvalidConfig(
                "report interval must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Name of the stream at `index`.
    pub fn stream_name(&self, index: usize) -> String {
        format!("{}{}", self.stream_name_prefix, index)
    }

    /// Per-channel queued-record-count limit.
    ///
    /// Sized so that at the per-stream share of the target rate, the time
    /// trigger, not this limit, governs flush cadence: twice the records a
    /// stream accumulates per flush interval, with a floor of one.
    pub fn queued_record_limit(&self) -> u64 {
        let per_stream_rate = self.rate_limit as f64 / self.stream_count as f64;
        let per_interval = per_stream_rate * self.flush_interval_ms as f64 / 1000.0;
        ((2.0 * per_interval).ceil() as u64).max(1)
    }

    /// Buffering knobs applied to every write channel.
    pub fn channel_settings(&self) -> ChannelSettings {
        ChannelSettings {
            buffer_bytes: self.buffer_bytes,
            flush_interval_ms: self.flush_interval_ms,
            queued_record_limit: self.queued_record_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(BenchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_values_are_rejected() {
        for field in [
            "stream_count",
            "worker_count",
            "record_size",
            "rate_limit",
            "flush_interval_ms",
            "buffer_bytes",
            "report_interval_secs",
        ] {
            let mut config = BenchConfig::default();
            match field {
                "stream_count" => config.stream_count = 0,
                "worker_count" => config.worker_count = 0,
                "record_size" => config.record_size = 0,
                "rate_limit" => config.rate_limit = 0,
                "flush_interval_ms" => config.flush_interval_ms = 0,
                "buffer_bytes" => config.buffer_bytes = 0,
                _ => config.report_interval_secs = 0,
            }
            assert!(config.validate().is_err(), "{field} = 0 should be rejected");
        }
    }

    #[test]
    fn stream_names_use_prefix_and_index() {
        let config = BenchConfig::default();
        assert_eq!(config.stream_name(0), "write_bench_stream_0");
        assert_eq!(config.stream_name(17), "write_bench_stream_17");
    }

    #[test]
    fn queued_record_limit_scales_to_per_stream_rate() {
        // 100k rec/s over 100 streams = 1000 rec/s per stream;
        // 10 ms per flush = 10 records per interval, doubled = 20.
        let config = BenchConfig::default();
        assert_eq!(config.queued_record_limit(), 20);

        // Many streams, low rate: floor of 1 applies.
        let config = BenchConfig {
            rate_limit: 100,
            stream_count: 1000,
            ..BenchConfig::default()
        };
        assert_eq!(config.queued_record_limit(), 1);
    }

    #[test]
    fn channel_settings_carry_all_triggers() {
        let config = BenchConfig::default();
        let settings = config.channel_settings();
        assert_eq!(settings.buffer_bytes, 1024 * 1024);
        assert_eq!(settings.flush_interval_ms, 10);
        assert_eq!(settings.queued_record_limit, 20);
    }
}
