//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults: `./app/` and `./config/`
//! 2. Global config: `$XDG_CONFIG_HOME/lineref/lineref.toml`
//! 3. Local config: `<project_dir>/.lineref.toml`
//! 4. Environment variables: `LINEREF_*` prefix
//!
//! Roots given on the command line replace all of the above.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Roots processed when nothing else is configured.
pub const DEFAULT_ROOTS: [&str; 2] = ["./app/", "./config/"];

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub roots: Option<Vec<PathBuf>>,
}

/// Unified configuration for lineref.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directories to traverse, in order
    pub roots: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            roots: DEFAULT_ROOTS.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Get the XDG config directory for lineref.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "lineref").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("lineref.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".lineref.toml")
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
    /// Expand shell variables and tilde in roots.
    ///
    /// Handles `~`, `$VAR`, and `${VAR}` syntax.
    pub(crate) fn expand_paths(&mut self) {
        self.roots = self
            .roots
            .iter()
            .map(|root| PathBuf::from(expand_env_vars(root.to_string_lossy().as_ref())))
            .collect();
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            roots: overlay.roots.clone().unwrap_or_else(|| self.roots.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory holding `.lineref.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), project_dir)
    }

    /// Load settings from an explicit global config path.
    ///
    /// Missing files are skipped; unreadable or malformed files are errors.
    pub fn load_layers(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Project-local config
        if let Some(project) = project_dir {
            let local_path = local_config_path(project);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply LINEREF_* environment variables as explicit overrides.
    ///
    /// `LINEREF_ROOTS` takes a comma-separated list.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let builder = Config::builder().add_source(
            Environment::with_prefix("LINEREF")
                .prefix_separator("_")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("roots"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get::<Vec<String>>("roots") {
            let roots: Vec<PathBuf> = val
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
            if !roots.is_empty() {
                debug!("load: LINEREF_ROOTS={:?}", roots);
                settings.roots = roots;
            }
        }

        Ok(settings)
    }

    /// Replace the configured roots when `roots` is non-empty.
    pub fn with_roots(mut self, roots: Vec<PathBuf>) -> Self {
        if !roots.is_empty() {
            self.roots = roots;
            self.expand_paths();
        }
        self
    }

    /// Resolve relative roots against `base`.
    pub fn resolve_roots(&self, base: &Path) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| {
                if root.is_absolute() {
                    root.clone()
                } else {
                    base.join(root)
                }
            })
            .collect()
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# lineref configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/lineref/lineref.toml
#   Local:  <project>/.lineref.toml
#   Env:    LINEREF_ROOTS=app,config
#   CLI:    lineref run <ROOT>...
#
# Each layer that sets `roots` replaces the list from the layers below it.
# Relative roots are resolved against the project directory (-C, default cwd).

# Directories to scan, in order
# roots = ["./app/", "./config/"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
