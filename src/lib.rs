// Leadex - Redis lead export to CSV
// Copyright (c) 2025 Leadex Contributors
// Licensed under the MIT License

//! # Leadex - Redis lead export to CSV
//!
//! Leadex scans lead records stored as JSON in Redis, writes the valid ones
//! that were never exported to a CSV file, and marks each exported record so
//! that the next run skips it.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Scanning** lead keys lazily with a cursor, one page at a time
//! - **Classifying** leads as already exported, not valid, or exportable
//! - **Deduplicating** by email within a run
//! - **Enriching** rows with generated email subject and body
//! - **Marking** exported leads with a guarded read-modify-write
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (classify, enrich, export, sinks)
//! - [`adapters`] - Record stores (Redis, in-memory)
//! - [`domain`] - Lead records, export rows and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leadex::adapters::memory::MemoryStore;
//! use leadex::core::export::{ExportCoordinator, ExportOptions};
//! use leadex::core::sink::{CsvSink, RowSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::from_entries([(
//!         "lead_1",
//!         r#"{"emailStatus":"valid","email":"ada@example.com","firstName":"Ada"}"#,
//!     )]));
//!
//!     let options = ExportOptions::default();
//!     let mut sink = CsvSink::from_writer(Vec::new(), options.layout())?;
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//!     let coordinator = ExportCoordinator::new(store, options, shutdown_rx);
//!     let summary = coordinator.execute_export(&mut sink).await?;
//!     sink.finish()?;
//!
//!     println!("Exported {} leads", summary.exported);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible library calls return [`domain::Result`], carrying a
//! [`domain::LeadexError`]. Failures of a single record never abort a run;
//! they are reported as [`core::export::RecordOutcome::Failed`] and counted
//! in the [`core::export::ExportSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
