//! Error types for the Kafka-backed stream client.

use thiserror::Error;

/// Errors surfaced while provisioning streams or opening channels.
#[derive(Debug, Error)]
pub enum KafkaClientError {
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("stream creation error: {0}")]
    StreamCreation(String),

    #[error("stream deletion error: {0}")]
    StreamDeletion(String),
}
