//! Kafka implementation of the write-bench stream-client contract.
//!
//! Streams map to topics. Each write channel wraps a dedicated
//! `FutureProducer` whose batching engine supplies the three flush
//! triggers the harness configures: buffered bytes (`batch.size`), the
//! time trigger (`linger.ms`), and the queued-record limit
//! (`queue.buffering.max.messages`). Submission is non-blocking; the
//! delivery future is the record's completion.

pub mod client;
pub mod error;

pub use client::{KafkaStreamClient, KafkaWriteChannel};
pub use error::KafkaClientError;
