//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/checktree/checktree.toml`
//! 3. Local config: `<dir>/.checktree.toml`
//! 4. Environment variables: `CHECKTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::CheckState;

/// How trees are rendered on the terminal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Marker for checked nodes
    pub checked: String,
    /// Marker for unchecked nodes
    pub unchecked: String,
    /// Marker for partially checked nodes
    pub indeterminate: String,
    /// Append the node id after its name
    pub show_ids: bool,
    /// Append checked/total leaf counts to internal nodes
    pub show_counts: bool,
    /// Colorize markers
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            checked: "[x]".into(),
            unchecked: "[ ]".into(),
            indeterminate: "[-]".into(),
            show_ids: false,
            show_counts: false,
            color: true,
        }
    }
}

impl DisplayConfig {
    /// Marker for a state.
    pub fn glyph(&self, state: CheckState) -> &str {
        match state {
            CheckState::Checked => &self.checked,
            CheckState::Unchecked => &self.unchecked,
            CheckState::Indeterminate => &self.indeterminate,
        }
    }

    /// Overlay wins where it specifies a value.
    pub fn merge(&self, overlay: &RawDisplayConfig) -> Self {
        Self {
            checked: overlay
                .checked
                .clone()
                .unwrap_or_else(|| self.checked.clone()),
            unchecked: overlay
                .unchecked
                .clone()
                .unwrap_or_else(|| self.unchecked.clone()),
            indeterminate: overlay
                .indeterminate
                .clone()
                .unwrap_or_else(|| self.indeterminate.clone()),
            show_ids: overlay.show_ids.unwrap_or(self.show_ids),
            show_counts: overlay.show_counts.unwrap_or(self.show_counts),
            color: overlay.color.unwrap_or(self.color),
        }
    }
}

/// Raw display config for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub checked: Option<String>,
    pub unchecked: Option<String>,
    pub indeterminate: Option<String>,
    pub show_ids: Option<bool>,
    pub show_counts: Option<bool>,
    pub color: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub display: RawDisplayConfig,
}

/// Unified configuration for checktree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Tree rendering
    pub display: DisplayConfig,
}

/// Get the XDG config directory for checktree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "checktree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("checktree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".checktree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            display: self.display.merge(&overlay.display),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.checktree.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("loading local config: {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply CHECKTREE_* environment variables as explicit overrides,
    /// e.g. `CHECKTREE_DISPLAY__SHOW_IDS=true`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("CHECKTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        let display = &mut settings.display;
        if let Ok(val) = config.get_string("display.checked") {
            display.checked = val;
        }
        if let Ok(val) = config.get_string("display.unchecked") {
            display.unchecked = val;
        }
        if let Ok(val) = config.get_string("display.indeterminate") {
            display.indeterminate = val;
        }
        if let Ok(val) = config.get_bool("display.show_ids") {
            display.show_ids = val;
        }
        if let Ok(val) = config.get_bool("display.show_counts") {
            display.show_counts = val;
        }
        if let Ok(val) = config.get_bool("display.color") {
            display.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# checktree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/checktree/checktree.toml
#   Local:  <dir>/.checktree.toml
#   Env:    CHECKTREE_DISPLAY__<KEY> environment variables

[display]
# Markers for each state
# checked = "[x]"
# unchecked = "[ ]"
# indeterminate = "[-]"

# Append node ids after names
# show_ids = false

# Append checked/total leaf counts to internal nodes
# show_counts = false

# Colorize markers (NO_COLOR is honored as well)
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
