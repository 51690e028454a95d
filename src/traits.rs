use anyhow::Result;
use serde::Serialize;

use crate::{export::ExportResult, filter::FilteredView};

/// CSVWrite trait provides a method to write a record to a CSV sink.
pub trait CSVWrite {
    /// Writes a record to a CSV sink.
    ///
    /// # Arguments
    /// * `record` - The record to write to the CSV sink that is Serializable.
    ///
    /// # Returns
    /// A Result indicating success or failure.
    fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()>;

    /// Flushes buffered rows to the underlying sink.
    fn flush(&mut self) -> Result<()>;
}

/// Exporter trait provides a method to export a view of the sales table.
pub trait Exporter {
    /// Exports a view.
    ///
    /// # Arguments
    /// * `view` - The records to export.
    ///
    /// # Returns
    /// The outcome of the export. Failures are reported in the result, never raised.
    fn export(&self, view: &FilteredView<'_>) -> ExportResult;
}
