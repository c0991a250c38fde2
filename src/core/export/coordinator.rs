//! Export coordinator - main orchestrator for the export process
//!
//! Scans lead keys, classifies each record, skips duplicates, enriches,
//! writes a row and marks the record exported. Records are processed one at
//! a time; a failure on one key is recorded and the run moves on.

use crate::adapters::store::RecordStore;
use crate::config::LeadexConfig;
use crate::core::classify::{classify, Classification};
use crate::core::enrich::Enricher;
use crate::core::export::outcome::{RecordFailure, RecordOutcome};
use crate::core::export::scan::scan_keys;
use crate::core::export::summary::ExportSummary;
use crate::core::sink::RowSink;
use crate::domain::{EnrichmentContent, ExportRow, LeadRecord, LeadexError, Result, RowLayout};
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Progress is logged every this many scanned keys
const PROGRESS_INTERVAL: usize = 1000;

/// Knobs for a single export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub lead_prefix: String,
    pub enrichment_prefix: String,
    pub scan_count: usize,
    pub enrichment_enabled: bool,
    pub guarded_mark: bool,
    pub dry_run: bool,
}

impl ExportOptions {
    /// Build options from a loaded configuration
    pub fn from_config(config: &LeadexConfig) -> Self {
        Self {
            lead_prefix: config.store.lead_prefix.clone(),
            enrichment_prefix: config.store.enrichment_prefix.clone(),
            scan_count: config.store.scan_count,
            enrichment_enabled: config.export.enrichment_enabled,
            guarded_mark: config.export.guarded_mark,
            dry_run: config.export.dry_run,
        }
    }

    /// Column layout matching these options
    pub fn layout(&self) -> RowLayout {
        RowLayout::for_enrichment(self.enrichment_enabled)
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            lead_prefix: "lead_".to_string(),
            enrichment_prefix: "email_".to_string(),
            scan_count: 500,
            enrichment_enabled: true,
            guarded_mark: true,
            dry_run: false,
        }
    }
}

/// Export coordinator
pub struct ExportCoordinator {
    store: Arc<dyn RecordStore>,
    enricher: Option<Enricher>,
    options: ExportOptions,
    shutdown_signal: watch::Receiver<bool>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        store: Arc<dyn RecordStore>,
        options: ExportOptions,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        let enricher = options
            .enrichment_enabled
            .then(|| Enricher::new(store.clone(), options.enrichment_prefix.clone()));

        Self {
            store,
            enricher,
            options,
            shutdown_signal,
        }
    }

    /// Execute the export
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Streams every key under the lead prefix
    /// 2. For each key:
    ///    - Fetches, parses and classifies the record
    ///    - Skips already exported, invalid, empty and duplicate emails
    ///    - Enriches, writes the row and marks the record exported
    /// 3. Stops early on a scan failure or a shutdown signal
    /// 4. Returns the run summary
    ///
    /// The sink is not finished here; the caller flushes it on every path.
    ///
    /// # Errors
    ///
    /// Returns an error only if the sink layout does not match the
    /// enrichment setting. Record and scan failures end up in the summary.
    pub async fn execute_export(&self, sink: &mut dyn RowSink) -> Result<ExportSummary> {
        let expected = self.options.layout();
        if sink.layout() != expected {
            return Err(LeadexError::Configuration(format!(
                "sink layout {:?} does not match enrichment setting (expected {expected:?})",
                sink.layout()
            )));
        }

        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.options.dry_run;
        summary.enrichment_enabled = self.options.enrichment_enabled;

        crate::log_export_start!(
            self.store.backend_name(),
            self.options.lead_prefix,
            self.options.dry_run
        );

        let mut seen_emails: HashSet<String> = HashSet::new();
        let keys = scan_keys(
            &*self.store,
            &self.options.lead_prefix,
            self.options.scan_count,
        );
        futures::pin_mut!(keys);

        loop {
            if *self.shutdown_signal.borrow() {
                tracing::warn!(
                    total_scanned = summary.total_scanned,
                    "Shutdown requested, stopping export"
                );
                summary.interrupted = true;
                break;
            }

            let key = match keys.next().await {
                Some(Ok(key)) => key,
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Key scan failed, stopping export");
                    summary.record_scan_failure(format!("Key scan failed: {e}"));
                    break;
                }
                None => break,
            };

            let outcome = self.process_key(&key, &mut seen_emails, sink).await;
            log_outcome(&key, &outcome);
            summary.record(&key, &outcome);

            if summary.total_scanned % PROGRESS_INTERVAL == 0 {
                crate::log_export_progress!(summary.total_scanned, summary.exported);
            }
        }

        let summary = summary.with_duration(start_time.elapsed());
        crate::log_export_complete!(summary.exported, summary.duration);
        Ok(summary)
    }

    /// Run one key through fetch, classify, dedup, enrich, write and mark
    async fn process_key(
        &self,
        key: &str,
        seen_emails: &mut HashSet<String>,
        sink: &mut dyn RowSink,
    ) -> RecordOutcome {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return RecordOutcome::Vanished,
            Err(e) => return RecordOutcome::Failed(RecordFailure::store(e)),
        };

        let mut record = match LeadRecord::parse(key, &raw) {
            Ok(record) => record,
            Err(e) => return RecordOutcome::Failed(RecordFailure::malformed(e.to_string())),
        };

        match classify(&record) {
            Classification::AlreadyExported => return RecordOutcome::SkippedAlreadyExported,
            Classification::NotValid => return RecordOutcome::SkippedNotValid,
            Classification::Exportable => {}
        }

        let email = record.email();
        if email.is_empty() {
            return RecordOutcome::SkippedEmptyEmail;
        }
        if seen_emails.contains(email) {
            return RecordOutcome::SkippedDuplicate;
        }

        let content = match &self.enricher {
            Some(enricher) => enricher.enrich(email).await,
            None => EnrichmentContent::default(),
        };
        let row = ExportRow::from_record(&record, content);

        if let Err(e) = sink.write_row(&row) {
            return RecordOutcome::Failed(RecordFailure::sink(e.to_string()));
        }
        let with_content = row.content.is_complete();
        seen_emails.insert(row.email);

        if !self.options.dry_run {
            if let Err(failure) = self.mark_exported(&mut record, &raw).await {
                return RecordOutcome::Failed(failure);
            }
        }

        RecordOutcome::Exported { with_content }
    }

    /// Write the record back with `exported` set
    async fn mark_exported(
        &self,
        record: &mut LeadRecord,
        original: &str,
    ) -> std::result::Result<(), RecordFailure> {
        record.mark_exported();
        let updated = record
            .to_json()
            .map_err(|e| RecordFailure::malformed(e.to_string()))?;

        if self.options.guarded_mark {
            match self
                .store
                .compare_and_set(record.key(), original, &updated)
                .await
            {
                Ok(true) => Ok(()),
                Ok(false) => self.confirm_mark(record.key(), &updated).await,
                Err(e) => Err(RecordFailure::store(e)),
            }
        } else {
            self.store
                .set(record.key(), &updated)
                .await
                .map_err(RecordFailure::store)
        }
    }

    /// A swap that reports a mismatch may still have been applied by an
    /// earlier attempt whose reply was lost, so re-read before calling it
    /// a conflict.
    async fn confirm_mark(
        &self,
        key: &str,
        updated: &str,
    ) -> std::result::Result<(), RecordFailure> {
        match self.store.get(key).await {
            Ok(Some(current)) if current == updated => {
                tracing::debug!(key = key, "Mark already applied by an earlier attempt");
                Ok(())
            }
            Ok(_) => Err(RecordFailure::conflict()),
            Err(e) => Err(RecordFailure::store(e)),
        }
    }
}

fn log_outcome(key: &str, outcome: &RecordOutcome) {
    match outcome {
        RecordOutcome::Exported { with_content } => {
            tracing::debug!(key = key, with_content = with_content, "Exported lead");
        }
        RecordOutcome::Vanished => {
            tracing::debug!(key = key, "Key vanished before it could be read");
        }
        RecordOutcome::Failed(failure) => {
            crate::log_record_failure!(key, failure);
        }
        skipped => {
            tracing::trace!(key = key, outcome = ?skipped, "Skipped lead");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::core::sink::CsvSink;

    fn coordinator(store: Arc<MemoryStore>, options: ExportOptions) -> ExportCoordinator {
        let (_tx, rx) = watch::channel(false);
        ExportCoordinator::new(store, options, rx)
    }

    #[tokio::test]
    async fn test_rejects_mismatched_sink_layout() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(store, ExportOptions::default());
        let mut sink = CsvSink::from_writer(Vec::new(), RowLayout::Basic).unwrap();

        let result = coordinator.execute_export(&mut sink).await;
        assert!(matches!(result, Err(LeadexError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_empty_email_is_skipped() {
        let store = Arc::new(MemoryStore::from_entries([(
            "lead_a",
            r#"{"emailStatus":"valid","email":""}"#,
        )]));
        let options = ExportOptions {
            enrichment_enabled: false,
            ..ExportOptions::default()
        };
        let coordinator = coordinator(store.clone(), options);
        let mut sink = CsvSink::from_writer(Vec::new(), RowLayout::Basic).unwrap();

        let summary = coordinator.execute_export(&mut sink).await.unwrap();
        assert_eq!(summary.duplicates_skipped, 1);
        assert_eq!(summary.exported, 0);
        assert_eq!(sink.rows_written(), 0);
        assert_eq!(
            store.value("lead_a").as_deref(),
            Some(r#"{"emailStatus":"valid","email":""}"#)
        );
    }

    #[tokio::test]
    async fn test_vanished_key_is_counted_as_scanned_only() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(store, ExportOptions::default());
        let mut sink = CsvSink::from_writer(Vec::new(), RowLayout::WithContent).unwrap();
        let mut seen = HashSet::new();

        let outcome = coordinator.process_key("lead_gone", &mut seen, &mut sink).await;
        assert_eq!(outcome, RecordOutcome::Vanished);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = LeadexConfig {
            application: Default::default(),
            store: crate::config::StoreConfig::with_url("redis://localhost:6379"),
            export: Default::default(),
            logging: Default::default(),
        };
        config.export.enrichment_enabled = false;
        config.export.dry_run = true;

        let options = ExportOptions::from_config(&config);
        assert_eq!(options.lead_prefix, "lead_");
        assert!(options.dry_run);
        assert_eq!(options.layout(), RowLayout::Basic);
    }
}
