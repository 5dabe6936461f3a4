// Configuration for hierarchy building
//
// Loaded from an optional TOML file; CLI flags override individual fields.

use crate::error::{ChronoTreeError, Result};
use crate::hierarchy::{RenderOptions, DEFAULT_ROOT_LABEL};
use crate::temporal::DEFAULT_ALPHA_HOURS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Output format for the rendered forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented text blocks separated by an empty line (default)
    #[default]
    Text,
    /// One JSON object per input line
    Json,
}

/// Settings for one `build` run
///
/// # Example
/// ```
/// use chronotree::config::HierarchyConfig;
///
/// let config: HierarchyConfig = toml::from_str("alpha_hours = 6.0").unwrap();
/// assert_eq!(config.alpha_hours, 6.0);
/// assert!(config.emit_root); // unspecified keys keep their defaults
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchyConfig {
    /// Cluster half-window in hours; clusters separate on gaps > 2·alpha
    pub alpha_hours: f64,

    /// Emit the synthetic root line in text output
    pub emit_root: bool,

    /// Sentinel name of the synthetic root
    pub root_label: String,

    /// Log and skip lines that fail instead of aborting the batch
    pub keep_going: bool,

    /// Worker threads for the batch driver
    pub jobs: usize,

    pub format: OutputFormat,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            alpha_hours: DEFAULT_ALPHA_HOURS,
            emit_root: true,
            root_label: DEFAULT_ROOT_LABEL.to_string(),
            keep_going: false,
            jobs: 1,
            format: OutputFormat::Text,
        }
    }
}

impl HierarchyConfig {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ChronoTreeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.alpha_hours.is_finite() || self.alpha_hours < 0.0 {
            return Err(ChronoTreeError::InvalidConfig(format!(
                "alpha_hours must be a finite value >= 0, got {}",
                self.alpha_hours
            )));
        }

        if self.root_label.trim().is_empty() {
            return Err(ChronoTreeError::InvalidConfig(
                "root_label must not be empty".to_string(),
            ));
        }

        if self.jobs == 0 {
            return Err(ChronoTreeError::InvalidConfig(
                "jobs must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            emit_root: self.emit_root,
        }
    }
}
