//! Tool configuration module.
//!
//! Handles loading, validating, and merging `switch-source.toml`. Stock
//! defaults are overridden by the user's file, which only needs the keys it
//! wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_layout = "TIFF"         # Layout used when -t is not given
//! # hugin_dir = "/opt/hugin*"     # Glob pattern for Hugin's directory
//!
//! [layouts.TIFF]
//! directory = "tiff16"
//! extension = "tif"
//!
//! [layouts.JPEG]
//! directory = "jpeg"
//! extension = "jpg"
//! ```
//!
//! Extra `[layouts.NAME]` tables register new layouts; the stock ones stay
//! available. Unknown keys are rejected to catch typos early.

use crate::layout::{BUILTIN_LAYOUTS, LayoutRegistry, LayoutSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "switch-source.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `switch-source.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchConfig {
    /// Layout to switch to when none is requested.
    pub default_layout: String,
    /// Glob pattern for Hugin's installation directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hugin_dir: Option<String>,
    /// Known layouts by name.
    pub layouts: BTreeMap<String, LayoutEntry>,
}

/// A `[layouts.NAME]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutEntry {
    pub directory: String,
    pub extension: String,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            default_layout: "TIFF".to_string(),
            hugin_dir: None,
            layouts: BUILTIN_LAYOUTS
                .iter()
                .map(|(name, directory, extension)| {
                    (
                        name.to_string(),
                        LayoutEntry {
                            directory: directory.to_string(),
                            extension: extension.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl SwitchConfig {
    /// Collect the configured layouts into a registry.
    pub fn layout_registry(&self) -> Result<LayoutRegistry, ConfigError> {
        let specs = self
            .layouts
            .iter()
            .map(|(name, entry)| LayoutSpec::new(name, &entry.directory, &entry.extension));
        LayoutRegistry::from_specs(specs).map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Validate layouts and that the default layout is one of them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let registry = self.layout_registry()?;
        if registry.is_empty() {
            return Err(ConfigError::Validation(
                "at least one layout must be defined".into(),
            ));
        }
        registry
            .get(&self.default_layout)
            .map_err(|e| ConfigError::Validation(format!("default_layout: {e}")))?;
        if self.hugin_dir.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "hugin_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SwitchConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `switch-source.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SwitchConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SwitchConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `switch-source.toml` in `dir`, on top of stock defaults.
pub fn load_config(dir: &Path) -> Result<SwitchConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `switch-source.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# switch-source configuration
# ===========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Layout to switch to when -t/--type is not given.
default_layout = "TIFF"

# Glob pattern (* and ? wildcards) for Hugin's installation directory.
# Defaults to "C:\Program Files*\Hugin" on Windows, "/usr/share/hugin" elsewhere.
# hugin_dir = "/opt/hugin*"

# ---------------------------------------------------------------------------
# Layouts
# ---------------------------------------------------------------------------
# Each layout maps source images to <directory>/<basename>.<extension>.
# Add a [layouts.NAME] table to register another one.

[layouts.TIFF]
directory = "tiff16"
extension = "tif"

[layouts.JPEG]
directory = "jpeg"
extension = "jpg"
"##
}
