//! Config file loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "textgrab.yaml";

/// Resolve the config file path.
/// Priority: `TEXTGRAB_CONFIG` > `./textgrab.yaml`
pub fn config_file_path(env: &HashMap<String, String>) -> PathBuf {
    match env.get("TEXTGRAB_CONFIG").map(|p| p.trim()) {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(CONFIG_FILE_NAME),
    }
}

/// Read the config file as a raw YAML value tree.
///
/// Returns an empty object if the file doesn't exist; env vars alone can
/// configure a server.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using environment only");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    // an empty file parses as null
    Ok(if value.is_null() {
        Value::Object(Default::default())
    } else {
        value
    })
}
