//! End-to-end harness behavior over an in-memory stream client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use writebench_core::{
    BenchConfig, ChannelSettings, Completion, Harness, Record, RecordId, StreamClient,
    WriteChannel, WriteError,
};

#[derive(Debug, thiserror::Error)]
#[error("mock: {0}")]
struct MockError(String);

struct MockChannel {
    name: String,
    submissions: Arc<AtomicU64>,
    fail_writes: bool,
}

impl WriteChannel for MockChannel {
    fn submit(&self, _record: &Record) -> Completion {
        self.submissions.fetch_add(1, Ordering::Relaxed);
        let fail = self.fail_writes;
        Box::pin(async move {
            if fail {
                Err(WriteError::Delivery("injected failure".into()))
            } else {
                Ok(RecordId {
                    partition: 0,
                    offset: 0,
                })
            }
        })
    }

    fn stream_name(&self) -> &str {
        &self.name
    }
}

/// In-memory service: records provisioning calls and counts submissions per
/// stream; completions resolve immediately.
#[derive(Clone, Default)]
struct MockClient {
    created: Arc<Mutex<Vec<String>>>,
    deleted: Arc<Mutex<Vec<String>>>,
    existing: Arc<Mutex<Vec<String>>>,
    submissions: Arc<Mutex<HashMap<String, Arc<AtomicU64>>>>,
    fail_writes: bool,
    refuse_creation_of: Option<String>,
}

impl MockClient {
    fn submissions_for(&self, name: &str) -> u64 {
        self.submissions
            .lock()
            .unwrap()
            .get(name)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn total_submissions(&self) -> u64 {
        self.submissions
            .lock()
            .unwrap()
            .values()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }
}

#[async_trait]
impl StreamClient for MockClient {
    type Channel = MockChannel;
    type Error = MockError;

    async fn create_stream(&self, name: &str) -> Result<(), MockError> {
        if self.refuse_creation_of.as_deref() == Some(name) {
            return Err(MockError(format!("creation refused for '{name}'")));
        }
        self.created.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn delete_stream(&self, name: &str) -> Result<(), MockError> {
        self.deleted.lock().unwrap().push(name.to_string());
        Ok(())
    }

    async fn list_streams(&self) -> Result<Vec<String>, MockError> {
        Ok(self.existing.lock().unwrap().clone())
    }

    fn open_channel(
        &self,
        name: &str,
        _settings: ChannelSettings,
    ) -> Result<MockChannel, MockError> {
        let counter = Arc::clone(
            self.submissions
                .lock()
                .unwrap()
                .entry(name.to_string())
                .or_default(),
        );
        Ok(MockChannel {
            name: name.to_string(),
            submissions: counter,
            fail_writes: self.fail_writes,
        })
    }
}

fn small_config() -> BenchConfig {
    BenchConfig {
        stream_count: 4,
        worker_count: 2,
        rate_limit: 1000,
        record_size: 16,
        report_interval_secs: 3,
        ..BenchConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn ten_second_run_submits_at_the_configured_rate() {
    let client = MockClient::default();
    let harness = Harness::new(small_config(), client.clone()).unwrap();
    let counters = harness.counters();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(harness.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_secs(10)).await;
    shutdown.cancel();
    handle.await.unwrap().unwrap();

    // Let pending completion tasks drain.
    tokio::time::sleep(Duration::from_millis(50)).await;

    // All four streams created, in index order.
    let created = client.created.lock().unwrap().clone();
    assert_eq!(
        created,
        vec![
            "write_bench_stream_0",
            "write_bench_stream_1",
            "write_bench_stream_2",
            "write_bench_stream_3",
        ]
    );

    // ~10_000 submissions at rate 1000 over 10 s, modulo smoothing.
    let total = client.total_submissions();
    assert!(
        (9_500..=10_500).contains(&total),
        "expected ~10000 submissions, got {total}"
    );

    // Every stream was driven; no channel starved.
    for name in &created {
        let count = client.submissions_for(name);
        assert!(count > 1_000, "stream {name} only saw {count} submissions");
    }

    // Every submission completed successfully.
    let snapshot = counters.snapshot();
    assert_eq!(snapshot.failed, 0);
    assert!(
        snapshot.success >= 9_500,
        "expected ~10000 successes, got {}",
        snapshot.success
    );
}

#[tokio::test(start_paused = true)]
async fn rejecting_service_grows_only_the_failure_counter() {
    let client = MockClient {
        fail_writes: true,
        ..MockClient::default()
    };
    let config = BenchConfig {
        rate_limit: 500,
        ..small_config()
    };
    let harness = Harness::new(config, client.clone()).unwrap();
    let counters = harness.counters();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(harness.run(shutdown.clone()));

    tokio::time::sleep(Duration::from_secs(2)).await;
    shutdown.cancel();
    handle.await.unwrap().unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let snapshot = counters.snapshot();
    assert_eq!(snapshot.success, 0);
    assert!(
        (800..=1_200).contains(&snapshot.failed),
        "expected ~1000 failures at rate 500 over 2 s, got {}",
        snapshot.failed
    );
}

#[tokio::test]
async fn stream_creation_failure_aborts_before_any_worker_starts() {
    let client = MockClient {
        refuse_creation_of: Some("write_bench_stream_2".to_string()),
        ..MockClient::default()
    };
    let harness = Harness::new(small_config(), client.clone()).unwrap();

    let result = harness.run(CancellationToken::new()).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("write_bench_stream_2"));

    // Streams before the failing one were created; nothing was submitted.
    let created = client.created.lock().unwrap().clone();
    assert_eq!(created, vec!["write_bench_stream_0", "write_bench_stream_1"]);
    assert_eq!(client.total_submissions(), 0);
}

#[tokio::test]
async fn remove_all_streams_deletes_everything_listed() {
    let client = MockClient::default();
    client.existing.lock().unwrap().extend([
        "old_stream_0".to_string(),
        "old_stream_1".to_string(),
        "old_stream_2".to_string(),
    ]);

    let harness = Harness::new(small_config(), client.clone()).unwrap();
    harness.remove_all_streams().await.unwrap();

    let deleted = client.deleted.lock().unwrap().clone();
    assert_eq!(deleted, vec!["old_stream_0", "old_stream_1", "old_stream_2"]);
}

#[tokio::test]
async fn invalid_configuration_is_rejected_up_front() {
    let config = BenchConfig {
        worker_count: 0,
        ..BenchConfig::default()
    };
    let err = Harness::new(config, MockClient::default()).err().unwrap();
    assert!(err.to_string().contains("worker count"));
}
