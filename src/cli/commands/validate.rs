//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Leadex configuration file.

use crate::config::LeadexConfig;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Report on the configuration loaded from `config_path` at start-up
    pub async fn execute(
        &self,
        config_path: &str,
        loaded: crate::domain::Result<LeadexConfig>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading already validates; a failure here covers both
        let config = match loaded {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Store URL: {}",
            redact_url(config.store.url.expose_secret().as_ref())
        );
        println!("  Lead Prefix: {}", config.store.lead_prefix);
        println!("  Enrichment Prefix: {}", config.store.enrichment_prefix);
        println!("  Scan Count: {}", config.store.scan_count);
        println!("  Timeout: {}s", config.store.timeout_seconds);
        println!("  Max Retries: {}", config.store.retry.max_retries);
        println!("  Output: {}", config.export.output_path);
        println!("  Enrichment: {}", config.export.enrichment_enabled);
        println!("  Guarded Mark: {}", config.export.guarded_mark);
        println!("  Dry Run: {}", config.export.dry_run);
        println!(
            "  File Logging: {}",
            if config.logging.local_enabled {
                format!(
                    "{} ({})",
                    config.logging.local_path, config.logging.local_rotation
                )
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}

/// Hide credentials in a connection URL
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***{}", &url[..scheme_end + 3], &url[at..])
        }
        _ => url.to_string(),
    }
}
