//! Record store abstraction
//!
//! This module defines the trait that key-value store adapters must
//! implement to be scanned and updated by the export pipeline.

use crate::domain::StoreError;
use async_trait::async_trait;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One page of a cursor-based key scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Keys in this page (possibly empty even when the scan continues)
    pub keys: Vec<String>,

    /// Cursor for the next page, `None` once the scan is complete
    pub cursor: Option<String>,
}

/// Key-value store holding lead and enrichment records
///
/// Implementations must tolerate concurrent writers: a scan returns every
/// key that exists for its whole duration at least once, while keys added
/// or removed mid-scan may or may not appear.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;

    /// Test the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn ping(&self) -> StoreResult<()>;

    /// Fetch one page of keys starting with `prefix`
    ///
    /// # Arguments
    ///
    /// * `prefix` - Literal key prefix (no glob syntax)
    /// * `cursor` - `None` to start a scan, otherwise the cursor of the previous page
    /// * `count` - Page size hint
    async fn scan_page(
        &self,
        prefix: &str,
        cursor: Option<&str>,
        count: usize,
    ) -> StoreResult<ScanPage>;

    /// Get the raw value of a key
    ///
    /// Returns `Ok(None)` if the key does not exist (for instance because it
    /// was deleted after the scan returned it).
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrite the full value of a key
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Write `value` only if the key currently holds exactly `expected`
    ///
    /// Returns `Ok(false)` if the stored value differs or the key is gone.
    ///
    /// The default implementation is a plain get-compare-set and is not
    /// atomic; backends with a server-side primitive override it.
    async fn compare_and_set(&self, key: &str, expected: &str, value: &str) -> StoreResult<bool> {
        match self.get(key).await? {
            Some(current) if current == expected => {
                self.set(key, value).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
