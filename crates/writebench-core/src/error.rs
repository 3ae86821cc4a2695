//! Error types for the benchmark harness.

use thiserror::Error;

/// Errors that abort the benchmark before or during startup.
///
/// Per-record failures are not represented here; they are counted in
/// [`crate::AppendCounters`] and never surfaced as errors.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to provision stream '{stream}': {source}")]
    StreamProvisioning {
        stream: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("stream client error: {0}")]
    Client(#[source] Box<dyn std::error::Error + Send + Sync>),
}
