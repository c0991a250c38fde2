//! Row sinks
//!
//! The coordinator hands every exportable lead to a [`RowSink`] before the
//! lead is marked exported, so a row that could not be written never gets
//! its record flagged.

pub mod csv;

pub use self::csv::CsvSink;

use crate::domain::{ExportRow, Result, RowLayout};

/// Destination for export rows
pub trait RowSink: Send {
    /// Column layout this sink was opened with
    fn layout(&self) -> RowLayout;

    /// Append one row and push it to the destination
    ///
    /// `Ok` means the row has left the sink's own buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the row could not be written. The sink stays
    /// usable and later rows may still succeed; bytes of a failed row may
    /// still reach the destination with a later row.
    fn write_row(&mut self, row: &ExportRow) -> Result<()>;

    /// Flush buffered rows to the destination
    ///
    /// Calling it more than once is a no-op.
    fn finish(&mut self) -> Result<()>;

    /// Rows written so far (header excluded)
    fn rows_written(&self) -> usize;
}
