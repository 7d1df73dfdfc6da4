//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/dyntable/config.json`, or the path given with
//! `--config <path>`.  The top-level schema uses a `"layout"` key so the
//! file can grow further sections without breaking older files.
//!
//! # Example
//!
//! ```json
//! {
//!   "layout": {
//!     "row_spacing": 8.0,
//!     "column_spacing": 12.0,
//!     "request_mode": "height-for-width"
//!   }
//! }
//! ```

use crate::geometry::RequestMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional; a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Table layout settings.
    #[serde(default)]
    pub layout: LayoutConfig,
}

/// Table layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between rows, in pixels.
    pub row_spacing: f32,
    /// Gap between columns, in pixels.
    pub column_spacing: f32,
    /// Shorthand that sets both gaps; wins over the per-axis values.
    pub spacing: Option<f32>,
    /// Request mode for scenes that do not specify one.
    pub request_mode: RequestMode,
}

/// The tool's defaults: no spacing, and height-for-width for scenes that
/// leave the request mode out.  The engine itself never falls back to a
/// mode; it always asks the container.
impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            row_spacing: 0.0,
            column_spacing: 0.0,
            spacing: None,
            request_mode: RequestMode::HeightForWidth,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e.0)))
    }

    /// Parse and validate configuration from a JSON string.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject spacing values the layout would refuse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.layout;
        for (name, value) in [
            ("row_spacing", Some(l.row_spacing)),
            ("column_spacing", Some(l.column_spacing)),
            ("spacing", l.spacing),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(ConfigError(format!(
                        "layout.{} must be finite and non-negative, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
