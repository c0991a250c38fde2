//! Record store abstraction layer
//!
//! - [`traits`] - The [`RecordStore`] trait every backend implements
//! - [`factory`] - Builds the configured backend

pub mod factory;
pub mod traits;

pub use factory::connect_store;
pub use traits::{RecordStore, ScanPage, StoreResult};
