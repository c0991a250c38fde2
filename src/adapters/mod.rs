//! External system integrations for Leadex.
//!
//! - [`store`] - Record store abstraction (trait-based) and factory
//! - [`redis`] - Redis implementation used in production
//! - [`memory`] - In-process implementation for tests and embedding
//!
//! # Design Pattern
//!
//! Adapters isolate the key-value store behind the [`store::RecordStore`]
//! trait so the export pipeline can be exercised against an in-memory store.
//!
//! ```rust
//! use leadex::adapters::memory::MemoryStore;
//! use leadex::adapters::store::RecordStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::from_entries([("lead_a", r#"{"exported":false}"#)]);
//! let page = store.scan_page("lead_", None, 100).await?;
//! assert_eq!(page.keys, vec!["lead_a".to_string()]);
//! # Ok(())
//! # }
//! ```

pub mod memory;
pub mod redis;
pub mod store;
