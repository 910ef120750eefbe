//! Core analytics and report assembly for Agro.
//!
//! This crate contains pure logic with ZERO web or database dependencies.
//! Record filtering, view aggregation, and page layout all live here.
//!
//! # Modules
//!
//! - `records` - Record model, filtering, and map markers
//! - `analytics` - Derived series for every view kind and dashboard summaries
//! - `report` - Paginated document assembly and report templates
//! - `export` - Concurrent artifact rendering and document hand-off

pub mod analytics;
pub mod export;
pub mod records;
pub mod report;
