//! Export eligibility classification
//!
//! A pure decision over a single record. Duplicate emails are a run-scoped
//! concern and are handled by the coordinator, not here.

use crate::domain::record::{LeadRecord, VALID_EMAIL_STATUS};

/// Export eligibility of a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// `exported` is already true
    AlreadyExported,
    /// `emailStatus` is anything but `"valid"`
    NotValid,
    /// Candidate for a row, subject to the email checks
    Exportable,
}

/// Classify a record
///
/// The exported flag is checked first, so an exported record whose email
/// has since become invalid still counts as already exported.
pub fn classify(record: &LeadRecord) -> Classification {
    if record.is_exported() {
        Classification::AlreadyExported
    } else if record.email_status() != VALID_EMAIL_STATUS {
        Classification::NotValid
    } else {
        Classification::Exportable
    }
}
