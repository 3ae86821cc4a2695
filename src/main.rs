//! Command-line interface for write-bench
//!
//! # Usage Examples
//!
//! ```bash
//! # Drive 100 streams from 4 workers at 100k records/s
//! write-bench --service-url localhost:9092
//!
//! # Smaller run with a custom prefix and a lower target rate
//! write-bench \
//!   --service-url localhost:9092 \
//!   --stream-name-prefix bench_ \
//!   --stream-count 16 \
//!   --thread-count 2 \
//!   --rate-limit 5000
//!
//! # Wipe every stream on the service before the run
//! write-bench --service-url localhost:9092 --remove-all-streams
//! ```
//!
//! The benchmark runs until externally terminated, printing one `[Append]`
//! report line per interval to stdout.

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use writebench_core::{BenchConfig, Harness};
use writebench_kafka::KafkaStreamClient;

#[derive(Parser, Debug)]
#[command(name = "write-bench")]
#[command(about = "Write-throughput load generator for Kafka-compatible streaming services")]
#[command(version)]
struct Cli {
    /// Streaming service endpoint (bootstrap broker list)
    #[arg(long, default_value = "localhost:9092")]
    service_url: String,

    /// Streams are named prefix + index
    #[arg(long, default_value = "write_bench_stream_")]
    stream_name_prefix: String,

    /// Record payload size in bytes
    #[arg(long, default_value = "1024")]
    record_size: usize,

    /// Channel flush time trigger in milliseconds
    #[arg(long, default_value = "10")]
    time_trigger: u64,

    /// Channel buffer size limit in bytes
    #[arg(long, default_value = "1048576")]
    buffer_size: usize,

    /// Number of streams to create and write to
    #[arg(long, default_value = "100")]
    stream_count: usize,

    /// Number of parallel workers
    #[arg(long, default_value = "4")]
    thread_count: usize,

    /// Report interval in seconds
    #[arg(long, default_value = "3")]
    report_interval: u64,

    /// Target aggregate write rate in records per second
    #[arg(long, default_value = "100000")]
    rate_limit: u64,

    /// Delete every stream on the service before the run
    #[arg(long)]
    remove_all_streams: bool,
}

impl Cli {
    fn to_config(&self) -> BenchConfig {
        BenchConfig {
            service_url: self.service_url.clone(),
            stream_name_prefix: self.stream_name_prefix.clone(),
            record_size: self.record_size,
            flush_interval_ms: self.time_trigger,
            buffer_bytes: self.buffer_size,
            stream_count: self.stream_count,
            worker_count: self.thread_count,
            report_interval_secs: self.report_interval,
            rate_limit: self.rate_limit,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.to_config();

    info!("write-bench v{}", env!("CARGO_PKG_VERSION"));
    info!("  service-url: {}", config.service_url);
    info!("  stream-name-prefix: {}", config.stream_name_prefix);
    info!("  record-size: {} bytes", config.record_size);
    info!("  time-trigger: {} ms", config.flush_interval_ms);
    info!("  buffer-size: {} bytes", config.buffer_bytes);
    info!("  stream-count: {}", config.stream_count);
    info!("  thread-count: {}", config.worker_count);
    info!("  report-interval: {} s", config.report_interval_secs);
    info!("  rate-limit: {} record/s", config.rate_limit);

    let client = KafkaStreamClient::connect(&config.service_url)
        .context("failed to build the streaming service client")?;

    let harness = Harness::new(config, client)?;

    if cli.remove_all_streams {
        harness
            .remove_all_streams()
            .await
            .context("pre-run stream cleanup failed")?;
    }

    // Runs until the process is externally terminated.
    harness.run(CancellationToken::new()).await?;
    Ok(())
}
