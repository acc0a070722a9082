//! CSV populator for historical order data.

use crate::error::CsvOrderError;
use crate::record::CsvOrderWriter;
use order_generator::{HistoricalRange, OrderSimulator, SequenceAllocator};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for CSV writing.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating orders.
    pub generation_duration: Duration,
    /// Time spent writing rows.
    pub write_duration: Duration,
    /// Output file size in bytes.
    pub file_size_bytes: u64,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Writes one order per timestamp of a [`HistoricalRange`] to a CSV file.
pub struct CsvPopulator {
    output_path: PathBuf,
    include_header: bool,
}

impl CsvPopulator {
    /// Create a populator writing to `output_path` (truncated if it exists).
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            include_header: true,
        }
    }

    /// Set whether to include a header row in the CSV output.
    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// Get the output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Generate and write one order for every timestamp in `range`.
    ///
    /// The weather advances once per row, in timestamp order. On error the
    /// rows written so far stay in the file and the simulator can continue.
    pub fn populate<S: SequenceAllocator>(
        &self,
        simulator: &mut OrderSimulator<S>,
        range: HistoricalRange,
    ) -> Result<PopulateMetrics, CsvOrderError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        info!(
            "Generating CSV file '{}' with {} orders",
            self.output_path.display(),
            range.remaining()
        );

        let file = File::create(&self.output_path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = CsvOrderWriter::new(buf_writer, self.include_header)?;

        let mut generation_time = Duration::ZERO;
        let mut write_time = Duration::ZERO;

        for timestamp in range {
            let gen_start = Instant::now();
            let order = simulator.next_order(timestamp)?;
            generation_time += gen_start.elapsed();

            let write_start = Instant::now();
            writer.write_order(&order)?;
            write_time += write_start.elapsed();

            metrics.rows_written += 1;

            if metrics.rows_written % 10000 == 0 {
                debug!("Written {} rows", metrics.rows_written);
            }
        }

        // Flush and get file size
        let inner = writer.finish()?;
        drop(inner);

        metrics.file_size_bytes = std::fs::metadata(&self.output_path)?.len();
        metrics.total_duration = start_time.elapsed();
        metrics.generation_duration = generation_time;
        metrics.write_duration = write_time;

        info!(
            "CSV generation complete: {} rows, {} bytes in {:?} ({:.2} rows/sec; generate {:?}, write {:?})",
            metrics.rows_written,
            metrics.file_size_bytes,
            metrics.total_duration,
            metrics.rows_per_second(),
            metrics.generation_duration,
            metrics.write_duration
        );

        Ok(metrics)
    }
}
