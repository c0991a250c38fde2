//! Record store factory
//!
//! This module builds the store the export pipeline runs against.

use crate::adapters::redis::RedisStore;
use crate::adapters::store::traits::RecordStore;
use crate::config::StoreConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Connect to the configured record store and verify it answers
///
/// The returned handle is passed explicitly to the export coordinator; there
/// is no process-wide connection.
///
/// # Errors
///
/// Returns an error if the connection cannot be opened or the store does not
/// answer `PING`. Both are fatal for an export run.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn RecordStore>> {
    tracing::info!("Creating Redis store client");
    let store = RedisStore::connect(config).await?;
    store.ping().await?;

    tracing::info!(
        backend = store.backend_name(),
        lead_prefix = %config.lead_prefix,
        enrichment_prefix = %config.enrichment_prefix,
        "Record store connection test successful"
    );

    Ok(Arc::new(store) as Arc<dyn RecordStore>)
}
