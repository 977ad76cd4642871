//! Tool configuration module.
//!
//! Both tools work out of the box with the conventional file names. An
//! optional `handball.toml` in the working root overrides any of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [data]
//! source = "Events.csv"         # Tabular export to convert
//! output = "data.js"            # Generated data module
//! variable = "HANDBALL_DATA"    # Variable assigned in data.js
//! team_marker = "#03 Phase "    # Column marker used for team detection
//!
//! [photos]
//! root = "Effectifs"            # One subdirectory per team
//! index_file = "index.json"     # Per-team index written inside each team dir
//! output = "photos-index.js"    # Aggregate module written at the working root
//! variable = "PHOTOS_INDEX"     # Variable assigned in photos-index.js
//! extensions = ["png", "jpg", "jpeg", "webp", "gif"]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [photos]
//! root = "Squads"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file in the working root.
pub const CONFIG_FILENAME: &str = "handball.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `handball.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Tabular-to-module converter settings.
    pub data: DataConfig,
    /// Photo-index generator settings.
    pub photos: PhotosConfig,
}

/// Converter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// CSV export, relative to the working root.
    pub source: String,
    /// Generated module, relative to the working root.
    pub output: String,
    /// JavaScript variable the records are assigned to.
    pub variable: String,
    /// Substring identifying per-team columns in the header.
    pub team_marker: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: "Events.csv".to_string(),
            output: "data.js".to_string(),
            variable: "HANDBALL_DATA".to_string(),
            team_marker: "#03 Phase ".to_string(),
        }
    }
}

/// Photo indexer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotosConfig {
    /// Photo root, relative to the working root.
    pub root: String,
    /// Per-team index file name, written inside each team directory.
    pub index_file: String,
    /// Aggregate module, relative to the working root.
    pub output: String,
    /// JavaScript variable the aggregate mapping is assigned to.
    pub variable: String,
    /// Allowed image extensions, without the leading dot.
    pub extensions: Vec<String>,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            root: "Effectifs".to_string(),
            index_file: "index.json".to_string(),
            output: "photos-index.js".to_string(),
            variable: "PHOTOS_INDEX".to_string(),
            extensions: crate::paths::IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

impl ToolConfig {
    /// Validate values and normalise extensions to lower case.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        require_file_name("data.source", &self.data.source)?;
        require_file_name("data.output", &self.data.output)?;
        require_identifier("data.variable", &self.data.variable)?;
        if self.data.team_marker.is_empty() {
            return Err(ConfigError::Validation(
                "data.team_marker must not be empty".into(),
            ));
        }

        require_file_name("photos.root", &self.photos.root)?;
        require_file_name("photos.index_file", &self.photos.index_file)?;
        require_file_name("photos.output", &self.photos.output)?;
        require_identifier("photos.variable", &self.photos.variable)?;
        if self.photos.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "photos.extensions must not be empty".into(),
            ));
        }
        for ext in &mut self.photos.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "photos.extensions entry {ext:?} must be non-empty and have no leading dot"
                )));
            }
            *ext = ext.to_lowercase();
        }
        Ok(self)
    }
}

fn require_file_name(key: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{key} must not be empty")));
    }
    Ok(())
}

fn require_identifier(key: &str, value: &str) -> Result<(), ConfigError> {
    if !crate::jsmodule::is_identifier(value) {
        return Err(ConfigError::Validation(format!(
            "{key} must be a valid JavaScript identifier, got {value:?}"
        )));
    }
    Ok(())
}

/// Load `handball.toml` from the working root.
///
/// Missing file means stock defaults. Present files are parsed sparse on top
/// of the defaults, unknown keys rejected, and the result validated.
pub fn load_config(root: &Path) -> Result<ToolConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return ToolConfig::default().validate();
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ToolConfig = toml::from_str(&content)?;
    config.validate()
}

/// Returns a fully-commented stock `handball.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# handball-prep configuration
# ===========================
#
# Place this file as handball.toml next to Events.csv and Effectifs/.
# Every key is optional; the values below are the defaults.

[data]
# CSV export produced by the stats spreadsheet.
source = "Events.csv"
# Generated module loaded by the web page.
output = "data.js"
# Variable the rows are assigned to in the generated module.
variable = "HANDBALL_DATA"
# Columns containing this marker name a team ("#03 Phase Seniors" -> "Seniors").
team_marker = "#03 Phase "

[photos]
# Directory holding one subdirectory per team.
root = "Effectifs"
# Index written inside each team directory (for pages served over HTTP).
index_file = "index.json"
# Aggregate module written next to this file (for pages opened from disk).
output = "photos-index.js"
# Variable the team -> photos mapping is assigned to.
variable = "PHOTOS_INDEX"
# Image extensions to index, matched case-insensitively.
extensions = ["png", "jpg", "jpeg", "webp", "gif"]
"##
}
