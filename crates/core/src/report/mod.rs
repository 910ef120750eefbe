//! Report document assembly.
//!
//! This module turns ordered section requests into fixed-size pages:
//! - Headings
//! - Key/value and data tables, paginated by row budget with repeated headers
//! - Raster artifacts, sliced across pages with an exact partition
//! - Data tables built from aggregation series
//! - Templates for the records report and the dashboard report

pub mod assembler;
pub mod error;
pub mod geometry;
mod series;
pub mod slicing;
pub mod templates;
pub mod types;

#[cfg(test)]
mod tests;

pub use assembler::DocumentAssembler;
pub use error::ReportError;
pub use geometry::PageGeometry;
pub use slicing::{SlicePlan, slice_image};
pub use types::*;
