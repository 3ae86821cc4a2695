//! The narrow contract between the harness and the streaming service.
//!
//! The harness never speaks the service's wire protocol. It provisions
//! streams through [`StreamClient`] and pushes records through
//! [`WriteChannel`], whose `submit` returns a completion future that
//! resolves on whatever thread the client's delivery machinery runs on.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use rand::Rng;
use thiserror::Error;

/// Fixed-size opaque payload shared by every submission.
///
/// The same payload is submitted repeatedly for the whole run; this is a
/// steady-state load test, not a correctness probe, so unique content per
/// record would only add generation cost to the hot path.
#[derive(Debug, Clone)]
pub struct Record {
    payload: Arc<[u8]>,
}

impl Record {
    /// Build a payload of `size` random bytes.
    pub fn random(size: usize) -> Self {
        let mut payload = vec![0u8; size];
        rand::rng().fill(payload.as_mut_slice());
        Self {
            payload: payload.into(),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Identifier assigned by the service once a record is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId {
    pub partition: i32,
    pub offset: i64,
}

/// Per-record failure cause carried by a completion.
///
/// These are counted and discarded, never retried or logged individually.
#[derive(Debug, Clone, Error)]
pub enum WriteError {
    /// The channel refused the record at submission time (e.g. its queued
    /// record limit was hit).
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The service reported a delivery failure after the record was queued.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// The channel dropped the record without ever acknowledging it.
    #[error("completion dropped before acknowledgement")]
    Cancelled,
}

/// Asynchronous result of one submitted record. Exactly one completion is
/// produced per submission; arrival order and thread are unspecified.
pub type Completion = BoxFuture<'static, Result<RecordId, WriteError>>;

/// Buffering knobs for one write channel. Whichever trigger fires first
/// flushes the buffered batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    /// Flush once buffered bytes reach this limit.
    pub buffer_bytes: usize,
    /// Flush once this much time has passed since the last flush.
    pub flush_interval_ms: u64,
    /// Upper bound on records queued inside the channel.
    pub queued_record_limit: u64,
}

/// Client-side buffering wrapper around writes to one stream.
///
/// Implementations buffer and batch internally; `submit` must not block the
/// caller beyond internal queue pressure. Completion futures may be polled
/// from any task and resolve out of submission order.
pub trait WriteChannel: Send + Sync + 'static {
    /// Queue one record for asynchronous delivery and hand back its
    /// completion.
    fn submit(&self, record: &Record) -> Completion;

    /// Name of the stream this channel writes to.
    fn stream_name(&self) -> &str;
}

/// Streaming-service client consumed by the harness: stream provisioning
/// plus write-channel construction.
#[async_trait]
pub trait StreamClient: Send + Sync {
    type Channel: WriteChannel;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a stream, succeeding if it already exists.
    async fn create_stream(&self, name: &str) -> Result<(), Self::Error>;

    /// Delete a stream. Only used by the optional pre-run cleanup.
    async fn delete_stream(&self, name: &str) -> Result<(), Self::Error>;

    /// List every stream currently on the service.
    async fn list_streams(&self) -> Result<Vec<String>, Self::Error>;

    /// Open a buffered write channel to an existing stream.
    fn open_channel(
        &self,
        name: &str,
        settings: ChannelSettings,
    ) -> Result<Self::Channel, Self::Error>;
}
