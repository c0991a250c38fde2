//! CSV file sink
//!
//! Writes a header line followed by one line per lead. Fields are quoted
//! only when they contain a comma, a quote or a line break, and embedded
//! quotes are doubled, so HTML bodies with newlines survive a round trip.

use super::RowSink;
use crate::domain::{ExportRow, LeadexError, Result, RowLayout};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// [`RowSink`] writing RFC 4180 style CSV to any [`Write`]
///
/// Every row is flushed to the underlying writer before `write_row`
/// returns, so an accepted row has left the process buffer.
pub struct CsvSink<W: Write> {
    writer: ::csv::Writer<W>,
    layout: RowLayout,
    rows_written: usize,
    finished: bool,
}

impl CsvSink<File> {
    /// Create (or truncate) the file at `path` and write the header
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or the header cannot
    /// be written.
    pub fn create(path: impl AsRef<Path>, layout: RowLayout) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            LeadexError::Sink(format!(
                "Failed to create output file {}: {e}",
                path.display()
            ))
        })?;

        tracing::debug!(path = %path.display(), layout = ?layout, "Opened CSV output");
        Self::from_writer(file, layout)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wrap an arbitrary writer and write the header
    ///
    /// # Errors
    ///
    /// Returns an error if the header cannot be written.
    pub fn from_writer(inner: W, layout: RowLayout) -> Result<Self> {
        let mut writer = ::csv::WriterBuilder::new()
            .quote_style(::csv::QuoteStyle::Necessary)
            .terminator(::csv::Terminator::Any(b'\n'))
            .from_writer(inner);

        writer.write_record(layout.header())?;

        Ok(Self {
            writer,
            layout,
            rows_written: 0,
            finished: false,
        })
    }

    /// Flush and return the underlying writer
    ///
    /// # Errors
    ///
    /// Returns an error if buffered rows cannot be flushed.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| LeadexError::Sink(format!("Failed to flush CSV output: {}", e.error())))
    }
}

impl<W: Write + Send> RowSink for CsvSink<W> {
    fn layout(&self) -> RowLayout {
        self.layout
    }

    fn write_row(&mut self, row: &ExportRow) -> Result<()> {
        if self.finished {
            return Err(LeadexError::Sink("CSV output already finished".to_string()));
        }

        self.writer
            .write_record(row.fields(self.layout))
            .map_err(|e| LeadexError::Sink(format!("Failed to write CSV row: {e}")))?;
        self.writer
            .flush()
            .map_err(|e| LeadexError::Sink(format!("Failed to flush CSV row: {e}")))?;
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        self.writer
            .flush()
            .map_err(|e| LeadexError::Sink(format!("Failed to flush CSV output: {e}")))?;
        self.finished = true;

        tracing::debug!(rows = self.rows_written, "Finished CSV output");
        Ok(())
    }

    fn rows_written(&self) -> usize {
        self.rows_written
    }
}
