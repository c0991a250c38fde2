//! Per-record export outcomes

use crate::domain::StoreError;
use std::fmt;

/// What went wrong with a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Reading or writing the record failed
    Store,
    /// The stored value is not a JSON object
    Malformed,
    /// The row could not be written to the output
    Sink,
    /// The record changed between read and mark; the row was still written
    Conflict,
}

/// A failed record with a human readable reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RecordFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn store(err: StoreError) -> Self {
        Self::new(FailureKind::Store, err.to_string())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, message)
    }

    pub fn sink(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Sink, message)
    }

    pub fn conflict() -> Self {
        Self::new(
            FailureKind::Conflict,
            "record changed before it could be marked exported",
        )
    }
}

impl fmt::Display for RecordFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Result of processing one scanned key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// A row was written and, unless dry-running, the record was marked
    Exported { with_content: bool },
    SkippedAlreadyExported,
    SkippedNotValid,
    /// Another record with the same email was exported earlier in the run
    SkippedDuplicate,
    SkippedEmptyEmail,
    /// The key disappeared between scan and read
    Vanished,
    Failed(RecordFailure),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = RecordFailure::store(StoreError::Timeout("GET lead_a".to_string()));
        assert_eq!(
            failure.to_string(),
            "Store: Store request timeout: GET lead_a"
        );
    }
}
