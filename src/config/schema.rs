//! Configuration schema types
//!
//! This module defines the configuration structure for Leadex.

use crate::config::{secret_string, SecretString};
use serde::{Deserialize, Serialize};

/// Main Leadex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Record store connection and key layout
    pub store: StoreConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LeadexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.store.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Retry configuration for transient store failures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per store call (1 disables retries)
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_retries == 0 || self.max_retries > 10 {
            return Err(format!(
                "store.retry.max_retries must be between 1 and 10, got {}",
                self.max_retries
            ));
        }

        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "store.retry.backoff_multiplier must be >= 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.initial_delay_ms > self.max_delay_ms {
            return Err(format!(
                "store.retry.initial_delay_ms ({}) must not exceed max_delay_ms ({})",
                self.initial_delay_ms, self.max_delay_ms
            ));
        }

        Ok(())
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Redis connection URL (redis://, rediss:// or unix://)
    /// Stored securely in memory and automatically zeroized on drop
    pub url: SecretString,

    /// Key prefix of primary lead records
    #[serde(default = "default_lead_prefix")]
    pub lead_prefix: String,

    /// Key prefix of enrichment records; the email is appended to it
    #[serde(default = "default_enrichment_prefix")]
    pub enrichment_prefix: String,

    /// SCAN page size hint
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,

    /// Per-command timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Retry policy for transient failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl StoreConfig {
    /// Store configuration with defaults for everything but the URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: secret_string(url.into()),
            lead_prefix: default_lead_prefix(),
            enrichment_prefix: default_enrichment_prefix(),
            scan_count: default_scan_count(),
            timeout_seconds: default_timeout_seconds(),
            retry: RetryConfig::default(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        let url = self.url.expose_secret();
        if url.is_empty() {
            return Err("store.url cannot be empty".to_string());
        }

        let valid_schemes = ["redis://", "rediss://", "unix://"];
        if !valid_schemes.iter().any(|scheme| url.starts_with(scheme)) {
            return Err(format!(
                "store.url must start with one of: {}",
                valid_schemes.join(", ")
            ));
        }

        if self.lead_prefix.is_empty() {
            return Err("store.lead_prefix cannot be empty".to_string());
        }

        if self.enrichment_prefix.is_empty() {
            return Err("store.enrichment_prefix cannot be empty".to_string());
        }

        // Enrichment keys must never show up in the lead scan.
        if self.enrichment_prefix.starts_with(&self.lead_prefix) {
            return Err(format!(
                "store.enrichment_prefix '{}' must not start with store.lead_prefix '{}'",
                self.enrichment_prefix, self.lead_prefix
            ));
        }

        if self.scan_count == 0 || self.scan_count > 10_000 {
            return Err(format!(
                "store.scan_count must be between 1 and 10000, got {}",
                self.scan_count
            ));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > 300 {
            return Err(format!(
                "store.timeout_seconds must be between 1 and 300, got {}",
                self.timeout_seconds
            ));
        }

        self.retry.validate()
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// CSV file the export writes to (truncated on open)
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Look up `email_<email>` records and add subject/body columns
    #[serde(default = "default_true")]
    pub enrichment_enabled: bool,

    /// Mark records with compare-and-set against the value that was classified
    #[serde(default = "default_true")]
    pub guarded_mark: bool,

    /// Dry run mode - write the CSV but leave every record unmarked
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            enrichment_enabled: true,
            guarded_mark: true,
            dry_run: false,
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_path.trim().is_empty() {
            return Err("export.output_path cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> usize {
    3
}

fn default_initial_delay_ms() -> u64 {
    200
}

fn default_max_delay_ms() -> u64 {
    5000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_lead_prefix() -> String {
    "lead_".to_string()
}

fn default_enrichment_prefix() -> String {
    "email_".to_string()
}

fn default_scan_count() -> usize {
    500
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_output_path() -> String {
    "valid_leads.csv".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
