//! CSV export of a record set.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::Decimal;

use super::error::RecordsError;
use super::types::Record;

/// File name offered for a CSV download.
pub const CSV_FILENAME: &str = "farmer_data.csv";

/// Header row of the CSV export.
pub const CSV_COLUMNS: [&str; 8] = [
    "ID",
    "Farmer Name",
    "Village Name",
    "Crop Type",
    "Area (Acres)",
    "Yield (kg)",
    "Latitude",
    "Longitude",
];

/// Writes `records` as CSV, one line per record in input order.
///
/// Text fields are always quoted and numbers never are. Missing quantities
/// are written as empty fields.
pub fn export_csv(records: &[Record]) -> Result<String, RecordsError> {
    if records.is_empty() {
        return Err(RecordsError::NoData);
    }

    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::NonNumeric)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    wtr.write_record(CSV_COLUMNS).map_err(csv_error)?;
    for record in records {
        wtr.write_record([
            record.id.to_string(),
            record.owner_label.clone(),
            record.village_label().unwrap_or_default().to_string(),
            record.crop_label().unwrap_or_default().to_string(),
            quantity(record.area),
            quantity(record.yield_kg),
            record.latitude.to_string(),
            record.longitude.to_string(),
        ])
        .map_err(csv_error)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| RecordsError::Csv(e.to_string()))?;
    String::from_utf8(data).map_err(|e| RecordsError::Csv(e.to_string()))
}

fn quantity(value: Option<Decimal>) -> String {
    value.map(|v| v.normalize().to_string()).unwrap_or_default()
}

fn csv_error(err: csv::Error) -> RecordsError {
    RecordsError::Csv(err.to_string())
}
