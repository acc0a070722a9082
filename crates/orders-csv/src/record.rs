//! Mapping between `OrderRecord` and CSV rows.

use crate::error::CsvOrderError;
use chrono::{DateTime, SecondsFormat, Utc};
use csv::{ReaderBuilder, Writer, WriterBuilder};
use order_generator::{
    ItemQuantities, OrderRecord, OrderSize, RegisterType, WeatherState, ORDER_FIELDS,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Flat CSV view of an order. Field order matches [`ORDER_FIELDS`].
#[derive(Debug, Serialize, Deserialize)]
struct CsvOrderRow {
    order_id: String,
    timestamp: String,
    restaurant_id: String,
    register_type: RegisterType,
    register_id: String,
    employee_id: String,
    order_size: OrderSize,
    /// JSON object, item name to quantity
    items: String,
    total_amount: String,
    processing_time: String,
    /// JSON object with temperature, humidity and condition
    #[serde(rename = "IsWeather")]
    weather: String,
}

impl CsvOrderRow {
    fn from_order(order: &OrderRecord) -> Result<Self, CsvOrderError> {
        let mut total = order.total_amount.round_dp(2);
        total.rescale(2);

        Ok(Self {
            order_id: order.order_id.clone(),
            timestamp: format_timestamp(&order.timestamp),
            restaurant_id: order.restaurant_id.clone(),
            register_type: order.register_type,
            register_id: order.register_id.clone(),
            employee_id: order.employee_id.clone(),
            order_size: order.order_size,
            items: serde_json::to_string(&order.items)?,
            total_amount: total.to_string(),
            processing_time: format_timestamp(&order.processing_time),
            weather: serde_json::to_string(&order.weather)?,
        })
    }

    fn into_order(self) -> Result<OrderRecord, CsvOrderError> {
        let items: ItemQuantities = serde_json::from_str(&self.items)?;
        let weather: WeatherState = serde_json::from_str(&self.weather)?;
        let total_amount =
            Decimal::from_str(&self.total_amount).map_err(|_| CsvOrderError::InvalidField {
                field: "total_amount",
                value: self.total_amount.clone(),
            })?;

        Ok(OrderRecord {
            order_id: self.order_id,
            timestamp: parse_timestamp("timestamp", &self.timestamp)?,
            restaurant_id: self.restaurant_id,
            register_type: self.register_type,
            register_id: self.register_id,
            employee_id: self.employee_id,
            order_size: self.order_size,
            items,
            total_amount,
            processing_time: parse_timestamp("processing_time", &self.processing_time)?,
            weather,
        })
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn parse_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, CsvOrderError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CsvOrderError::InvalidField {
            field,
            value: value.to_string(),
        })
}

/// Streaming CSV writer for orders.
pub struct CsvOrderWriter<W: Write> {
    writer: Writer<W>,
    rows_written: u64,
}

impl<W: Write> CsvOrderWriter<W> {
    /// Wrap `inner`, writing the header row first when `include_header` is set.
    pub fn new(inner: W, include_header: bool) -> Result<Self, CsvOrderError> {
        // the header is written explicitly so that an empty range still
        // produces a file with a header
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(inner);
        if include_header {
            writer.write_record(ORDER_FIELDS)?;
        }
        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Append one order row.
    pub fn write_order(&mut self, order: &OrderRecord) -> Result<(), CsvOrderError> {
        self.writer.serialize(CsvOrderRow::from_order(order)?)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Rows written so far (header excluded).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush buffered rows and return the inner writer.
    pub fn finish(mut self) -> Result<W, CsvOrderError> {
        self.writer.flush()?;
        self.writer
            .into_inner()
            .map_err(|e| CsvOrderError::Io(std::io::Error::other(e.to_string())))
    }
}

/// Read every order from a CSV file with a header row.
pub fn read_orders<P: AsRef<Path>>(path: P) -> Result<Vec<OrderRecord>, CsvOrderError> {
    let file = File::open(path)?;
    read_orders_from_reader(BufReader::new(file))
}

/// Read every order from CSV data with a header row.
///
/// Columns are matched by header name, so their order does not matter.
pub fn read_orders_from_reader<R: Read>(reader: R) -> Result<Vec<OrderRecord>, CsvOrderError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let mut orders = Vec::new();
    for row in reader.deserialize::<CsvOrderRow>() {
        orders.push(row?.into_order()?);
    }
    Ok(orders)
}
