//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::core::export::outcome::{FailureKind, RecordOutcome};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Upper bound on the error details kept in a summary; counters keep counting
pub const MAX_RECORDED_ERRORS: usize = 100;

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Keys returned by the scan and processed
    pub total_scanned: usize,

    /// Rows written and records marked
    pub exported: usize,

    /// Exported rows with both subject and body (enrichment runs only)
    pub with_content: usize,

    /// Exported rows missing subject or body (enrichment runs only)
    pub without_content: usize,

    /// Records whose `exported` flag was already set
    pub skipped_already_exported: usize,

    /// Records whose email status is not valid
    pub skipped_not_valid: usize,

    /// Valid records skipped for an empty or already exported email
    pub duplicates_skipped: usize,

    /// Records that failed (store, malformed, sink or mark conflict)
    pub failed: usize,

    /// Set when the key scan itself failed and the run stopped early
    pub scan_failed: bool,

    /// Set when a shutdown signal stopped the run early
    pub interrupted: bool,

    /// Whether the store was left untouched
    pub dry_run: bool,

    /// Whether enrichment columns were produced
    pub enrichment_enabled: bool,

    /// Duration of the export
    pub duration: Duration,

    /// First errors encountered during export
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            total_scanned: 0,
            exported: 0,
            with_content: 0,
            without_content: 0,
            skipped_already_exported: 0,
            skipped_not_valid: 0,
            duplicates_skipped: 0,
            failed: 0,
            scan_failed: false,
            interrupted: false,
            dry_run: false,
            enrichment_enabled: false,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Fold one record outcome into the counters
    pub fn record(&mut self, key: &str, outcome: &RecordOutcome) {
        self.total_scanned += 1;

        match outcome {
            RecordOutcome::Exported { with_content } => {
                self.exported += 1;
                if self.enrichment_enabled {
                    if *with_content {
                        self.with_content += 1;
                    } else {
                        self.without_content += 1;
                    }
                }
            }
            RecordOutcome::SkippedAlreadyExported => self.skipped_already_exported += 1,
            RecordOutcome::SkippedNotValid => self.skipped_not_valid += 1,
            RecordOutcome::SkippedDuplicate | RecordOutcome::SkippedEmptyEmail => {
                self.duplicates_skipped += 1
            }
            RecordOutcome::Vanished => {}
            RecordOutcome::Failed(failure) => {
                self.failed += 1;
                self.add_error(
                    ExportError::new(failure.kind.into(), failure.message.clone())
                        .with_context(format!("key={key}")),
                );
            }
        }
    }

    /// Add an error, keeping at most [`MAX_RECORDED_ERRORS`] details
    pub fn add_error(&mut self, error: ExportError) {
        if self.errors.len() < MAX_RECORDED_ERRORS {
            self.errors.push(error);
        }
    }

    /// Record a failed scan that ended the run early
    pub fn record_scan_failure(&mut self, message: String) {
        self.scan_failed = true;
        self.add_error(ExportError::new(ExportErrorType::Scan, message));
    }

    /// Failed records plus a failed scan
    pub fn error_count(&self) -> usize {
        self.failed + usize::from(self.scan_failed)
    }

    /// Check if the export was successful (no failures)
    pub fn is_successful(&self) -> bool {
        self.error_count() == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            total_scanned = self.total_scanned,
            exported = self.exported,
            with_content = self.with_content,
            without_content = self.without_content,
            skipped_already_exported = self.skipped_already_exported,
            skipped_not_valid = self.skipped_not_valid,
            duplicates_skipped = self.duplicates_skipped,
            errors = self.error_count(),
            dry_run = self.dry_run,
            interrupted = self.interrupted,
            duration_ms = self.duration.as_millis() as u64,
            "Export completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.error_count(),
                recorded = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = error.context.as_deref().unwrap_or(""),
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Reading or marking a record failed
    Store,
    /// A stored value could not be parsed
    Malformed,
    /// Writing a row failed
    Sink,
    /// A record changed before it could be marked
    Conflict,
    /// Enumerating keys failed
    Scan,
}

impl From<FailureKind> for ExportErrorType {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Store => ExportErrorType::Store,
            FailureKind::Malformed => ExportErrorType::Malformed,
            FailureKind::Sink => ExportErrorType::Sink,
            FailureKind::Conflict => ExportErrorType::Conflict,
        }
    }
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context (e.g., the record key)
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}
