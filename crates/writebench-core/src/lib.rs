//! Core harness for the write-bench load generator.
//!
//! This crate contains everything measurable about the benchmark: the run
//! configuration, the shared rate limiter, round-robin stream
//! partitioning, the worker loops that generate load, the completion
//! counters, and the periodic reporter. The streaming service itself is
//! reached only through the narrow [`StreamClient`] / [`WriteChannel`]
//! traits, so the whole harness can be exercised against an in-memory
//! client in tests.
//!
//! # Data flow
//!
//! ```text
//! Harness -- partitions streams --> WorkerLoop (xN, parallel)
//!                                        |
//!                                 RateLimiter.acquire()
//!                                        |
//!                                 WriteChannel.submit()
//!                                        | (completion future)
//!                                        v
//!                                 AppendCounters <-- Reporter --> stdout
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod metrics;
pub mod partition;
pub mod ratelimit;
pub mod reporter;
pub mod worker;

// Re-exports for convenience
pub use client::{ChannelSettings, Completion, Record, RecordId, StreamClient, WriteChannel, WriteError};
pub use config::BenchConfig;
pub use error::BenchError;
pub use harness::Harness;
pub use metrics::{AppendCounters, CounterSnapshot};
pub use partition::partition_round_robin;
pub use ratelimit::RateLimiter;
pub use reporter::{ReportLine, Reporter};
pub use worker::WorkerLoop;
