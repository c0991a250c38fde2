//! Core business logic for Leadex.
//!
//! # Modules
//!
//! - [`classify`] - Export eligibility of a single lead
//! - [`enrich`] - Optional subject/body lookup per email
//! - [`export`] - Scan, coordination, outcomes and summary
//! - [`sink`] - Row sinks (CSV)
//!
//! # Export Workflow
//!
//! 1. **Scan**: Stream keys under the lead prefix, one page at a time
//! 2. **Classify**: Skip already exported and non-valid leads
//! 3. **Dedup**: Skip empty emails and emails already exported this run
//! 4. **Enrich** (optional): Fetch generated subject/body for the email
//! 5. **Write**: Append a CSV row
//! 6. **Mark**: Write the record back with `exported = true`
//! 7. **Report**: Generate export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use leadex::adapters::store::connect_store;
//! use leadex::config::load_config;
//! use leadex::core::export::{ExportCoordinator, ExportOptions};
//! use leadex::core::sink::{CsvSink, RowSink};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("leadex.toml")?;
//! let store = connect_store(&config.store).await?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let options = ExportOptions::from_config(&config);
//! let mut sink = CsvSink::create(&config.export.output_path, options.layout())?;
//!
//! let coordinator = ExportCoordinator::new(store, options, shutdown_rx);
//! let summary = coordinator.execute_export(&mut sink).await?;
//! sink.finish()?;
//!
//! println!("Exported: {}", summary.exported);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod enrich;
pub mod export;
pub mod sink;
