//! Environment handling for config values.
//!
//! Two passes run at load time. `${VAR_NAME}` references inside YAML string
//! values are substituted first (only uppercase `[A-Z_][A-Z0-9_]*` names match,
//! `$${VAR}` escapes to a literal `${VAR}`). Then well-known variables such as
//! `PORT` or `GOOGLE_API_KEY` override the matching config fields.

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{
    GoogleConfig, LoggingConfig, ProvidersConfig, RateLimitConfig, ServerConfig,
    SummarizerConfig, TextGrabConfig,
};

static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

static ESCAPED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in a config value tree using `env`.
///
/// Only string leaves are rewritten. A referenced variable that is unset or
/// empty is an error.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut error: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &regex::Captures| {
        if error.is_some() {
            return String::new();
        }
        // `$${VAR}` is an escape, leave it for the restore pass
        if let Some(m) = caps.get(0) {
            if m.start() > 0 && s.as_bytes().get(m.start() - 1) == Some(&b'$') {
                return caps[0].to_string();
            }
        }
        let var_name = &caps[1];
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                error = Some(MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = error {
        bail!(err);
    }

    Ok(ESCAPED_PATTERN
        .replace_all(&substituted, |caps: &regex::Captures| format!("${{{}}}", &caps[1]))
        .to_string())
}

fn lookup<'a>(env: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn parse_var<T: std::str::FromStr>(env: &HashMap<String, String>, name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(env, name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid value for {name}: {raw:?}"))
        })
        .transpose()
}

/// Override config fields from well-known environment variables.
///
/// A set, non-empty variable always wins over the file value.
pub fn apply_env_overrides(
    mut config: TextGrabConfig,
    env: &HashMap<String, String>,
) -> Result<TextGrabConfig> {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    if let Some(port) = parse_var::<u16>(env, "PORT")? {
        server.port = Some(port);
    }
    if let Some(bind) = lookup(env, "TEXTGRAB_BIND") {
        server.bind = Some(bind.to_string());
    }
    if let Some(max) = parse_var::<u32>(env, "RATE_LIMIT_PER_MINUTE")? {
        let limit = server.rate_limit.get_or_insert_with(RateLimitConfig::default);
        limit.max_requests = Some(max);
        limit.window_secs = Some(60);
    }
    if let Some(max) = parse_var::<usize>(env, "MAX_BODY_BYTES")? {
        server.max_body_bytes = Some(max);
    }

    let google = config.google.get_or_insert_with(GoogleConfig::default);
    if let Some(project) = lookup(env, "PROJECT_ID") {
        google.project_id = Some(project.to_string());
    }
    if let Some(key) = lookup(env, "GOOGLE_API_KEY") {
        google.api_key = Some(key.to_string());
    }
    if let Some(token) = lookup(env, "GOOGLE_ACCESS_TOKEN") {
        google.access_token = Some(token.to_string());
    }

    let providers = config.providers.get_or_insert_with(ProvidersConfig::default);
    if let Some(ocr) = lookup(env, "OCR_PROVIDER") {
        providers.ocr = Some(ocr.to_lowercase());
    }
    if let Some(summarizer) = lookup(env, "SUMMARIZER_PROVIDER") {
        providers.summarizer = Some(summarizer.to_lowercase());
    }
    if let Some(translator) = lookup(env, "TRANSLATION_PROVIDER") {
        providers.translator = Some(translator.to_lowercase());
    }

    let summarizer = config.summarizer.get_or_insert_with(SummarizerConfig::default);
    if let Some(ratio) = parse_var::<f32>(env, "SUMMARY_RATIO")? {
        summarizer.ratio = Some(ratio);
    }
    if let Some(key) = lookup(env, "LLM_API_KEY") {
        summarizer.api_key = Some(key.to_string());
    }
    if let Some(model) = lookup(env, "LLM_MODEL") {
        summarizer.model = Some(model.to_string());
    }
    if let Some(url) = lookup(env, "LLM_BASE_URL") {
        summarizer.base_url = Some(url.to_string());
    }

    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if let Some(level) = lookup(env, "LOG_LEVEL") {
        logging.level = Some(level.to_string());
    }
    if let Some(dir) = lookup(env, "LOG_DIR") {
        logging.dir = Some(dir.to_string());
    }

    Ok(config)
}
