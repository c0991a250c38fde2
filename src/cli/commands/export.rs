//! Export command implementation
//!
//! This module implements the `export` command: scan valid leads, write
//! them to CSV and mark them exported in the store.

use crate::adapters::store::connect_store;
use crate::config::LeadexConfig;
use crate::core::export::{ExportCoordinator, ExportOptions, ExportSummary};
use crate::core::sink::{CsvSink, RowSink};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - write the CSV but leave records unmarked
    #[arg(long)]
    pub dry_run: bool,

    /// Override the output CSV path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Skip enrichment lookups and omit the subject/body columns
    #[arg(long)]
    pub no_enrichment: bool,
}

impl ExportArgs {
    /// Execute the export command against the configuration loaded at start-up
    pub async fn execute(
        &self,
        loaded: crate::domain::Result<LeadexConfig>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match loaded {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.export.dry_run {
            tracing::info!("Dry run mode enabled - records will not be marked exported");
            println!("🔍 DRY RUN MODE - records will not be marked exported");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !config.export.dry_run && !confirm(&config)? {
            println!("Export cancelled.");
            return Ok(0);
        }

        let store = match connect_store(&config.store).await {
            Ok(store) => store,
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to store");
                eprintln!("Failed to connect to store: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let options = ExportOptions::from_config(&config);
        let output_path = config.export.output_path.clone();
        let mut sink = match CsvSink::create(&output_path, options.layout()) {
            Ok(sink) => sink,
            Err(e) => {
                tracing::error!(error = %e, path = %output_path, "Failed to open output");
                eprintln!("Failed to open output file: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        println!("🚀 Starting export...");
        println!();

        let coordinator = ExportCoordinator::new(store, options, shutdown_signal);
        let result = coordinator.execute_export(&mut sink).await;

        // Flush whatever was written, even when the run itself failed
        let finished = sink.finish();

        let summary = match result {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(5);
            }
        };
        if let Err(e) = finished {
            tracing::error!(error = %e, path = %output_path, "Failed to finish output");
            eprintln!("Failed to finish output file: {e}");
            return Ok(5);
        }

        summary.log_summary();
        print_summary(&summary, &output_path);

        Ok(exit_code(&summary))
    }

    /// Apply command line flags on top of the loaded configuration
    fn apply_overrides(&self, config: &mut LeadexConfig) {
        if let Some(output) = &self.output {
            tracing::info!(output = %output, "Overriding output path from CLI");
            config.export.output_path = output.clone();
        }

        if self.no_enrichment {
            tracing::info!("Disabling enrichment from CLI");
            config.export.enrichment_enabled = false;
        }

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.export.dry_run = true;
        }
    }
}

fn confirm(config: &LeadexConfig) -> anyhow::Result<bool> {
    use std::io::{self, Write};

    println!("Export Configuration:");
    println!("  Lead prefix: {}", config.store.lead_prefix);
    println!("  Output: {}", config.export.output_path);
    println!(
        "  Enrichment: {}",
        if config.export.enrichment_enabled {
            format!("enabled ({}<email>)", config.store.enrichment_prefix)
        } else {
            "disabled".to_string()
        }
    );
    println!();
    print!("Proceed with export? Exported leads will be marked in the store. [y/N]: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_summary(summary: &ExportSummary, output_path: &str) {
    println!();
    println!("📊 Export Summary:");
    println!(
        "  Exported {} valid leads to {}",
        summary.exported, output_path
    );
    if summary.enrichment_enabled {
        println!("    - {} with email content", summary.with_content);
        println!("    - {} without email content", summary.without_content);
    }
    println!(
        "  Skipped {} already exported leads",
        summary.skipped_already_exported
    );
    println!("  Skipped {} not valid leads", summary.skipped_not_valid);
    println!(
        "  Skipped {} duplicate or empty emails",
        summary.duplicates_skipped
    );
    println!("  Errors: {}", summary.error_count());
    println!("  Scanned: {}", summary.total_scanned);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        if summary.error_count() > summary.errors.len() {
            println!(
                "  ... and {} more",
                summary.error_count() - summary.errors.len()
            );
        }
        println!();
    }

    if summary.dry_run {
        println!("🔍 Dry run: no records were marked exported.");
    }
}

/// Map a finished run to the process exit code
fn exit_code(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Export interrupted. Rows written so far are kept; run again to continue.");
        tracing::info!("Export interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.is_successful() {
        println!("✅ Export completed successfully!");
        0
    } else {
        println!("⚠️  Export completed with errors");
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    fn config() -> LeadexConfig {
        LeadexConfig {
            application: Default::default(),
            store: StoreConfig::with_url("redis://localhost:6379"),
            export: Default::default(),
            logging: Default::default(),
        }
    }

    #[test]
    fn test_apply_overrides() {
        let args = ExportArgs {
            yes: true,
            dry_run: true,
            output: Some("/tmp/out.csv".to_string()),
            no_enrichment: true,
        };
        let mut config = config();
        args.apply_overrides(&mut config);

        assert_eq!(config.export.output_path, "/tmp/out.csv");
        assert!(!config.export.enrichment_enabled);
        assert!(config.export.dry_run);
    }

    #[test]
    fn test_no_overrides_keeps_config() {
        let args = ExportArgs {
            yes: false,
            dry_run: false,
            output: None,
            no_enrichment: false,
        };
        let mut config = config();
        config.export.dry_run = true;
        args.apply_overrides(&mut config);

        assert_eq!(config.export.output_path, "valid_leads.csv");
        assert!(config.export.enrichment_enabled);
        assert!(config.export.dry_run);
    }

    #[test]
    fn test_exit_code() {
        let mut summary = ExportSummary::new();
        assert_eq!(exit_code(&summary), 0);

        summary.failed = 2;
        assert_eq!(exit_code(&summary), 1);

        summary.interrupted = true;
        assert_eq!(exit_code(&summary), 130);
    }

    #[tokio::test]
    async fn test_missing_config_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExportArgs {
            yes: true,
            dry_run: false,
            output: None,
            no_enrichment: false,
        };
        let (_tx, rx) = watch::channel(false);

        let loaded = crate::config::load_config(dir.path().join("missing.toml"));
        let code = args.execute(loaded, rx).await.unwrap();
        assert_eq!(code, 2);
    }

    #[tokio::test]
    async fn test_overrides_are_validated() {
        let args = ExportArgs {
            yes: true,
            dry_run: false,
            output: Some("  ".to_string()),
            no_enrichment: false,
        };
        let (_tx, rx) = watch::channel(false);

        let code = args.execute(Ok(config()), rx).await.unwrap();
        assert_eq!(code, 2);
    }
}
