//! Kafka-backed stream client and write channel.

use std::time::Duration;

use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use tracing::{info, warn};

use writebench_core::{ChannelSettings, Completion, Record, RecordId, StreamClient, WriteChannel, WriteError};

use crate::error::KafkaClientError;

const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Producer configuration for one write channel.
///
/// The harness's flush triggers land on librdkafka's batching knobs:
/// buffered bytes on `batch.size`, the time trigger on `linger.ms`, and the
/// queued-record limit on `queue.buffering.max.messages`.
fn producer_config(brokers: &str, settings: &ChannelSettings) -> ClientConfig {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", brokers)
        .set("batch.size", settings.buffer_bytes.to_string())
        .set("linger.ms", settings.flush_interval_ms.to_string())
        .set(
            "queue.buffering.max.messages",
            settings.queued_record_limit.to_string(),
        )
        .set("message.timeout.ms", "30000");
    config
}

/// Kafka implementation of the harness's stream-client contract. Streams
/// are topics; channels are per-topic producers.
pub struct KafkaStreamClient {
    brokers: String,
    admin: AdminClient<DefaultClientContext>,
}

impl KafkaStreamClient {
    pub fn connect(brokers: &str) -> Result<Self, KafkaClientError> {
        let admin = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .create()?;
        Ok(Self {
            brokers: brokers.to_string(),
            admin,
        })
    }
}

#[async_trait]
impl StreamClient for KafkaStreamClient {
    type Channel = KafkaWriteChannel;
    type Error = KafkaClientError;

    async fn create_stream(&self, name: &str) -> Result<(), KafkaClientError> {
        let topic = NewTopic::new(name, 1, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(METADATA_TIMEOUT));

        let results = self.admin.create_topics(&[topic], &opts).await?;
        for result in results {
            match result {
                Ok(topic) => info!(stream = %topic, "stream created"),
                Err((topic, err)) => {
                    let err_str = err.to_string();
                    if err_str.contains("already exists")
                        || err_str.contains("TopicExistsException")
                    {
                        warn!(stream = %topic, "stream already exists");
                    } else {
                        return Err(KafkaClientError::StreamCreation(format!(
                            "{topic}: {err}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    async fn delete_stream(&self, name: &str) -> Result<(), KafkaClientError> {
        let opts = AdminOptions::new().operation_timeout(Some(METADATA_TIMEOUT));
        let results = self.admin.delete_topics(&[name], &opts).await?;
        for result in results {
            if let Err((topic, err)) = result {
                return Err(KafkaClientError::StreamDeletion(format!("{topic}: {err}")));
            }
        }
        Ok(())
    }

    async fn list_streams(&self) -> Result<Vec<String>, KafkaClientError> {
        let metadata = self.admin.inner().fetch_metadata(None, METADATA_TIMEOUT)?;
        Ok(metadata
            .topics()
            .iter()
            .map(|t| t.name().to_string())
            .filter(|name| !name.starts_with("__"))
            .collect())
    }

    fn open_channel(
        &self,
        name: &str,
        settings: ChannelSettings,
    ) -> Result<KafkaWriteChannel, KafkaClientError> {
        let producer: FutureProducer = producer_config(&self.brokers, &settings).create()?;
        Ok(KafkaWriteChannel {
            topic: name.to_string(),
            producer,
        })
    }
}

/// Buffered write channel over one topic.
pub struct KafkaWriteChannel {
    topic: String,
    producer: FutureProducer,
}

impl WriteChannel for KafkaWriteChannel {
    fn submit(&self, record: &Record) -> Completion {
        let enqueue = self.producer.send_result(
            FutureRecord::<(), [u8]>::to(&self.topic).payload(record.payload()),
        );
        match enqueue {
            Ok(delivery) => Box::pin(async move {
                match delivery.await {
                    Ok(Ok((partition, offset))) => Ok(RecordId { partition, offset }),
                    Ok(Err((err, _message))) => Err(WriteError::Delivery(err.to_string())),
                    // The producer dropped the delivery channel.
                    Err(_cancelled) => Err(WriteError::Cancelled),
                }
            }),
            // Queue-full rejection surfaces as an immediately failed
            // completion; the worker must never block here.
            Err((err, _record)) => {
                let cause = err.to_string();
                Box::pin(async move { Err(WriteError::Rejected(cause)) })
            }
        }
    }

    fn stream_name(&self) -> &str {
        &self.topic
    }
}
