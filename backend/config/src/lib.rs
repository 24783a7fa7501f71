//! `textgrab-config`: TextGrab runtime configuration.
//!
//! Provides:
//! - Typed config schema (server, Google credentials, provider selection)
//! - YAML loading with `${ENV_VAR}` substitution
//! - Environment variable overrides (`PORT`, `PROJECT_ID`, ...)
//! - Default value application
//! - Fail-fast validation
//! - Redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, process_env, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_file_path, load_raw_config};
pub use redact::{collect_redacted_paths, redact};
pub use schema::TextGrabConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Load a config file, substitute and override from `env`, apply defaults.
///
/// Does not validate; commands that only inspect the config use this directly.
pub async fn load_with_env(path: &Path, env: &HashMap<String, String>) -> Result<TextGrabConfig> {
    let raw = load_raw_config(path).await?;
    let value = resolve_env_vars_with(&raw, env).context("Failed to resolve env vars in config")?;
    let config: TextGrabConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;
    let config = apply_env_overrides(config, env)?;
    Ok(apply_all_defaults(config))
}

/// Fail if the config cannot start a server. Warnings and errors are logged.
pub fn ensure_valid(config: &TextGrabConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let summary: Vec<String> = report.errors.iter().map(|e| e.to_string()).collect();
        bail!("Invalid configuration:\n  {}", summary.join("\n  "));
    }
    Ok(())
}
