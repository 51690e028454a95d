//! Core of an interactive sales report.
//!
//! A category selector filters a monthly sales table; every change produces
//! a bar chart, a trend line, and a running total derived from the same
//! filtered records. The filtered records can be exported to CSV.

pub mod args;
pub mod charts;
pub mod controller;
pub mod csv_writer;
pub mod dataset;
pub mod errors;
pub mod export;
pub mod filter;
pub mod models;
pub mod total;
pub mod traits;

pub use controller::{Dashboard, Event, ExportScope, OutputBundle, Session};
pub use dataset::Dataset;
pub use errors::DashboardError;
pub use export::{CsvFileExporter, ExportResult};
pub use models::{SalesRecord, Selector};
