//! Enrichment lookups
//!
//! Generated email content for a lead lives in a second namespace of the
//! same store, keyed by a fixed prefix followed by the email address.

use crate::adapters::store::RecordStore;
use crate::domain::EnrichmentContent;
use std::sync::Arc;

/// Looks up optional subject/body content for an email
pub struct Enricher {
    store: Arc<dyn RecordStore>,
    prefix: String,
}

impl Enricher {
    /// Create an enricher reading keys `<prefix><email>`
    pub fn new(store: Arc<dyn RecordStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Store key holding the enrichment record for `email`
    pub fn enrichment_key(&self, email: &str) -> String {
        format!("{}{}", self.prefix, email)
    }

    /// Fetch content for `email`
    ///
    /// Never fails: a missing key, a store error or a malformed value all
    /// yield empty content.
    pub async fn enrich(&self, email: &str) -> EnrichmentContent {
        let key = self.enrichment_key(email);

        let raw = match self.store.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %key, "No enrichment record");
                return EnrichmentContent::default();
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not fetch enrichment record");
                return EnrichmentContent::default();
            }
        };

        match EnrichmentContent::parse(&raw) {
            Ok(content) => {
                tracing::debug!(
                    key = %key,
                    has_subject = !content.subject.is_empty(),
                    has_body = !content.body.is_empty(),
                    "Found enrichment content"
                );
                content
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring malformed enrichment record");
                EnrichmentContent::default()
            }
        }
    }
}
