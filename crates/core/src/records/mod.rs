//! Plot observation records and the filters applied before aggregation.
//!
//! Records are produced by an external store and are never mutated here.

pub mod csv_export;
pub mod error;
pub mod filter;
pub mod geo;
pub mod types;

pub use csv_export::{CSV_FILENAME, export_csv};
pub use error::RecordsError;
pub use filter::{RecordFilter, distinct_crops, distinct_villages};
pub use geo::{GeoPoint, MapMarker, MapView};
pub use types::{Record, RecordField};
