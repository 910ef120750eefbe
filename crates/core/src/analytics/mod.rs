//! Aggregation engine for dashboard visuals.
//!
//! Turns a flat record set into the ordered series each visual needs:
//! - Crop area and crop share
//! - Yield efficiency per crop and per village
//! - Village by crop matrix
//! - Area/yield scatter pairs
//!
//! Every view goes through one grouping and rounding implementation.

pub mod engine;
pub mod error;
pub mod summary;
pub mod types;


pub use engine::AggregationEngine;
pub use error::AnalyticsError;
pub use summary::{CropStats, DashboardSummary, SummaryService, VillageStats};
pub use types::*;
