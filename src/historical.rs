//! Historical mode: backfill a CSV file over a time range.

use anyhow::Context;
use order_generator::{OrderSimulator, SequenceAllocator};
use orders_csv::{CsvPopulator, PopulateMetrics};
use tracing::info;

use crate::config::HistoricalConfig;

/// Write one order per interval from `config.start` to `config.end`
/// inclusive into `config.output`.
pub fn run_historical<S: SequenceAllocator>(
    simulator: &mut OrderSimulator<S>,
    config: &HistoricalConfig,
) -> anyhow::Result<PopulateMetrics> {
    info!(
        "Generating historical orders from {} to {} every {:?}",
        config.start.to_rfc3339(),
        config.end.to_rfc3339(),
        config.interval
    );

    let metrics = CsvPopulator::new(&config.output)
        .populate(simulator, config.range())
        .with_context(|| {
            format!(
                "Failed to write historical orders to {}",
                config.output.display()
            )
        })?;

    info!("Historical data written to {}", config.output.display());
    Ok(metrics)
}
