//! Export orchestration
//!
//! This module provides the core export logic for Leadex, including:
//! - Lazy key scanning
//! - Export coordination and per-record outcomes
//! - Summary and reporting

pub mod coordinator;
pub mod outcome;
pub mod scan;
pub mod summary;

pub use coordinator::{ExportCoordinator, ExportOptions};
pub use outcome::{FailureKind, RecordFailure, RecordOutcome};
pub use scan::scan_keys;
pub use summary::{ExportError, ExportErrorType, ExportSummary};
