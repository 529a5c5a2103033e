//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CATALOGUE_BASE_URL` | `base_url` |
//! | `CATALOGUE_DEBUG` | `debug` |
//! | `CATALOGUE_LOG_LEVEL` | `log_level` |
//! | `CATALOGUE_REQUEST_TIMEOUT` | `request_timeout_secs` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use catalogue_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/catalogue.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::CatalogueError;
use crate::settings::Settings;

/// Loads settings from a TOML string. Missing keys keep their defaults.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, CatalogueError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| CatalogueError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    merge_onto_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, CatalogueError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CatalogueError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string. Missing keys keep their defaults.
pub fn from_json_str(json_str: &str) -> Result<Settings, CatalogueError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| CatalogueError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_onto_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, CatalogueError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `CATALOGUE_*` environment variable overrides.
///
/// Unparsable numeric values are ignored with a warning.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides from an arbitrary key lookup.
///
/// [`apply_env_overrides`] calls this with the process environment; tests
/// pass a map to avoid mutating global state.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("CATALOGUE_BASE_URL") {
        settings.base_url = val;
    }

    if let Some(val) = lookup("CATALOGUE_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("CATALOGUE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("CATALOGUE_REQUEST_TIMEOUT") {
        match val.parse::<u64>() {
            Ok(secs) => settings.request_timeout_secs = secs,
            Err(_) => tracing::warn!(value = %val, "ignoring invalid CATALOGUE_REQUEST_TIMEOUT"),
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config(path: &Path, kind: &str) -> Result<String, CatalogueError> {
    std::fs::read_to_string(path).map_err(|e| {
        CatalogueError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_onto_defaults(value: serde_json::Value, kind: &str) -> Result<Settings, CatalogueError> {
    let defaults = serde_json::to_value(Settings::default()).map_err(|e| {
        CatalogueError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;
    serde_json::from_value(merge_json(defaults, value)).map_err(|e| {
        CatalogueError::ConfigurationError(format!(
            "Failed to deserialize settings from {kind}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Recursively merges `overlay` into `base`; overlay wins on conflicts.
fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    match (base, overlay) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => value,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}
