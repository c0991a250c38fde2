//! Domain models and types for Leadex.
//!
//! The domain layer provides:
//! - **Records** ([`LeadRecord`], [`EnrichmentContent`], [`ExportRow`])
//! - **Error types** ([`LeadexError`], [`StoreError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use leadex::domain::{LeadRecord, Result};
//!
//! fn example() -> Result<()> {
//!     let mut record = LeadRecord::parse(
//!         "lead_ada@example.com",
//!         r#"{"leadData":{"emailStatus":"valid","email":"ada@example.com"}}"#,
//!     )?;
//!     assert!(!record.is_exported());
//!
//!     record.mark_exported();
//!     assert!(record.is_exported());
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod errors;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{LeadexError, StoreError};
pub use record::{EnrichmentContent, ExportRow, LeadRecord, RowLayout};
pub use result::Result;
