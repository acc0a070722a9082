//! Command-line interface for order-sim
//!
//! # Usage Examples
//!
//! ## Streaming
//! ```bash
//! # Publish an order every 15 seconds to a local broker
//! order-sim stream --kafka-brokers localhost:9092 --topic orders
//!
//! # Publish to Azure Event Hubs every 5 seconds
//! order-sim stream --interval 5s \
//!   --eventhub-connection-string "Endpoint=sb://ns.servicebus.windows.net/;..." \
//!   --eventhub-name orders
//!
//! # Log orders instead of publishing them
//! order-sim stream --interval 1 --seed 42 --dry-run
//! ```
//!
//! ## Historical
//! ```bash
//! order-sim historical \
//!   --start-date 2025-01-01T00:00:00 \
//!   --end-date 2025-01-31T23:59:59 \
//!   --interval 15 \
//!   --output orders.csv
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use order_generator::{InMemorySequence, SimulationProfile};
use order_sequence::{FileSequence, DEFAULT_COUNTER_FILE};
use order_sim::config::{load_profile, parse_interval, HistoricalConfig};
use order_sim::historical::run_historical;
use order_sim::sink::LogSink;
use order_sim::stream::{run_stream, setup_shutdown_handler};
use order_sim::{build_simulator, KafkaOpts};
use orders_kafka::KafkaOrderPublisher;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "order-sim")]
#[command(about = "Generate synthetic restaurant point-of-sale orders")]
#[command(long_about = None)]
struct Cli {
    /// File holding the last allocated order number
    #[arg(long, global = true, default_value = DEFAULT_COUNTER_FILE)]
    counter_file: PathBuf,

    /// YAML simulation profile (restaurant, pools, initial weather)
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Seed for reproducible output; OS entropy when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish one order per interval until interrupted
    Stream {
        /// Time between orders (e.g. "15", "15s", "2m")
        #[arg(long, default_value = "15")]
        interval: String,

        #[command(flatten)]
        kafka: KafkaOpts,

        /// Log orders as JSON instead of publishing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Write one order per interval between two timestamps to CSV
    Historical {
        /// First order timestamp (e.g. "2025-01-01T00:00:00")
        #[arg(long)]
        start_date: Option<String>,

        /// Last possible order timestamp, inclusive
        #[arg(long)]
        end_date: Option<String>,

        /// Simulated time between orders (e.g. "15", "30s", "1m")
        #[arg(long, default_value = "15")]
        interval: String,

        /// Output CSV file
        #[arg(long, default_value = "orders.csv")]
        output: PathBuf,
    },
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
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let profile = load_profile(cli.profile.as_deref())?;

    match cli.command {
        Commands::Stream {
            interval,
            kafka,
            dry_run,
        } => {
            let interval = parse_interval(&interval)?;
            if dry_run {
                run_dry_stream(&profile, cli.seed, interval).await
            } else {
                run_kafka_stream(&profile, &cli.counter_file, cli.seed, interval, kafka).await
            }
        }
        Commands::Historical {
            start_date,
            end_date,
            interval,
            output,
        } => {
            let config = HistoricalConfig::new(
                start_date.as_deref(),
                end_date.as_deref(),
                parse_interval(&interval)?,
                output,
            )?;
            let sequence = open_counter(&cli.counter_file)?;
            let mut simulator = build_simulator(&profile, sequence, cli.seed)?;
            run_historical(&mut simulator, &config)?;
            Ok(())
        }
    }
}

fn open_counter(path: &Path) -> anyhow::Result<FileSequence> {
    let sequence = FileSequence::open(path)
        .with_context(|| format!("Failed to open order counter {}", path.display()))?;
    info!(
        "Order counter {} at {}",
        sequence.path().display(),
        sequence.last()
    );
    Ok(sequence)
}

async fn run_kafka_stream(
    profile: &SimulationProfile,
    counter_file: &Path,
    seed: Option<u64>,
    interval: std::time::Duration,
    kafka: KafkaOpts,
) -> anyhow::Result<()> {
    let config = kafka.to_config()?;
    let authenticated = config.is_authenticated();

    let sequence = open_counter(counter_file)?;
    let mut simulator = build_simulator(profile, sequence, seed)?;

    let publisher = KafkaOrderPublisher::new(config).context("Failed to create Kafka producer")?;
    if !authenticated {
        // managed brokers such as Event Hubs don't allow topic creation over Kafka
        publisher
            .create_topic_if_not_exists(kafka.partitions)
            .await
            .context("Failed to create topic")?;
    }

    let shutdown = setup_shutdown_handler();
    run_stream(&mut simulator, publisher, interval, shutdown).await?;
    Ok(())
}

async fn run_dry_stream(
    profile: &SimulationProfile,
    seed: Option<u64>,
    interval: std::time::Duration,
) -> anyhow::Result<()> {
    info!("Dry run: orders are logged, not published, and the counter file is not touched");
    let mut simulator = build_simulator(profile, InMemorySequence::new(), seed)?;

    let shutdown = setup_shutdown_handler();
    run_stream(&mut simulator, LogSink::new(), interval, shutdown).await?;
    Ok(())
}
