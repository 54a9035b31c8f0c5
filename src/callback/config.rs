//! GitHub Actions Callback Configuration
//!
//! Options are resolved once, before the run starts, from several sources
//! with increasing precedence:
//!
//! 1. Default values (lowest priority)
//! 2. Standard config file locations
//! 3. Explicit configuration files (TOML, YAML, or JSON)
//! 4. Environment variables
//! 5. CLI arguments (highest priority)
//!
//! A value that cannot be understood is ignored and the lower layer wins;
//! [`ConfigLoader::try_load`] turns those cases into errors instead.
//!
//! # Configuration File Format (TOML)
//!
//! ```toml
//! [github_actions]
//! # Emit error details and reclassification notices
//! verbose = false
//!
//! # Where the transcript is written at the end of the run
//! archive_file = "ansible-github-actions.log"
//!
//! # Fold strategy: "smart", "play" or "task"
//! grouping = "smart"
//! ```
//!
//! # Environment Variables
//!
//! - `GITHUB_ACTIONS_VERBOSE` - `true`/`1`/`yes` or `false`/`0`/`no`
//! - `GITHUB_ACTIONS_ARCHIVE_FILE` - Archive path
//! - `GITHUB_ACTIONS_GROUPING` - Grouping mode
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use github_actions_callback::callback::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_file("ci/gha-callback.toml")
//!     .with_grouping(GroupingMode::Task)
//!     .load();
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::types::GroupingMode;
use crate::error::{Error, Result};

/// Default archive destination, relative to the working directory.
pub const DEFAULT_ARCHIVE_FILE: &str = "ansible-github-actions.log";

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "GITHUB_ACTIONS";

// ============================================================================
// Resolved Configuration
// ============================================================================

/// Options of the GitHub Actions callback, fixed for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubActionsConfig {
    /// Emit failure details and reclassification notices
    pub verbose: bool,
    /// Where the transcript is written at the end of the run
    pub archive_file: PathBuf,
    /// Fold strategy
    pub grouping: GroupingMode,
}

impl Default for GithubActionsConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            archive_file: PathBuf::from(DEFAULT_ARCHIVE_FILE),
            grouping: GroupingMode::Smart,
        }
    }
}

impl GithubActionsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the archive destination.
    pub fn with_archive_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_file = path.into();
        self
    }

    /// Set the grouping mode.
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.grouping = grouping;
        self
    }
}

// ============================================================================
// Partial Layers
// ============================================================================

/// Values supplied by one configuration layer. Unset fields defer to the
/// layers below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub verbose: Option<bool>,
    pub archive_file: Option<PathBuf>,
    pub grouping: Option<GroupingMode>,
}

impl ConfigOverrides {
    /// Applies the set fields on top of `config`.
    pub fn apply_to(&self, config: &mut GithubActionsConfig) {
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
        if let Some(path) = &self.archive_file {
            config.archive_file = path.clone();
        }
        if let Some(grouping) = self.grouping {
            config.grouping = grouping;
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.verbose.is_none() && self.archive_file.is_none() && self.grouping.is_none()
    }
}

/// Raw `[github_actions]` table as found in a file, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOptions {
    verbose: Option<JsonValue>,
    archive_file: Option<JsonValue>,
    grouping: Option<JsonValue>,
}

/// Wrapper for config file format that nests under `[github_actions]`.
#[derive(Debug, Default, Deserialize)]
struct GithubActionsWrapper {
    #[serde(default)]
    github_actions: RawOptions,
}

// ============================================================================
// Configuration Loader
// ============================================================================

/// Builder for loading callback configuration from multiple sources.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Configuration files to load (in order)
    config_files: Vec<PathBuf>,
    /// Environment variable prefix
    env_prefix: Option<String>,
    /// CLI overrides
    cli_overrides: ConfigOverrides,
    /// Whether to load from standard locations
    load_standard_locations: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    pub fn new() -> Self {
        Self {
            config_files: Vec::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            cli_overrides: ConfigOverrides::default(),
            load_standard_locations: true,
        }
    }

    /// Add a configuration file to load.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Set the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Disable environment variable loading.
    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    /// Disable loading from standard configuration locations.
    pub fn without_standard_locations(mut self) -> Self {
        self.load_standard_locations = false;
        self
    }

    /// Set CLI override for verbose mode.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.cli_overrides.verbose = Some(verbose);
        self
    }

    /// Set CLI override for the archive destination.
    pub fn with_archive_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cli_overrides.archive_file = Some(path.into());
        self
    }

    /// Set CLI override for the grouping mode.
    pub fn with_grouping(mut self, grouping: GroupingMode) -> Self {
        self.cli_overrides.grouping = Some(grouping);
        self
    }

    /// Set all CLI overrides at once.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.cli_overrides = overrides;
        self
    }

    /// Load configuration from all sources.
    ///
    /// Unreadable files and unrecognized values are skipped.
    pub fn load(&self) -> GithubActionsConfig {
        match self.resolve(false) {
            Ok(config) => config,
            Err(err) => {
                debug!("Falling back to default callback config: {}", err);
                GithubActionsConfig::default()
            }
        }
    }

    /// Load configuration, failing on the first unreadable explicit file or
    /// unrecognized value.
    pub fn try_load(&self) -> Result<GithubActionsConfig> {
        self.resolve(true)
    }

    fn resolve(&self, strict: bool) -> Result<GithubActionsConfig> {
        let mut config = GithubActionsConfig::default();

        // Standard locations are optional even in strict mode
        if self.load_standard_locations {
            for path in Self::standard_config_paths() {
                if !path.is_file() {
                    continue;
                }
                debug!("Loading callback config from: {}", path.display());
                match Self::load_file(&path, strict) {
                    Ok(layer) => layer.apply_to(&mut config),
                    Err(err) => debug!("Ignoring config file: {}", err),
                }
            }
        }

        for path in &self.config_files {
            if !path.is_file() {
                if strict {
                    return Err(Error::config_load(path, "file not found"));
                }
                debug!("Callback config file not found: {}", path.display());
                continue;
            }
            debug!("Loading callback config from: {}", path.display());
            match Self::load_file(path, strict) {
                Ok(layer) => layer.apply_to(&mut config),
                Err(err) if strict => return Err(err),
                Err(err) => debug!("Ignoring config file: {}", err),
            }
        }

        if let Some(prefix) = &self.env_prefix {
            Self::load_from_env(prefix, strict)?.apply_to(&mut config);
        }

        self.cli_overrides.apply_to(&mut config);

        debug!(
            verbose = config.verbose,
            archive_file = %config.archive_file.display(),
            grouping = %config.grouping,
            "Resolved callback config"
        );
        Ok(config)
    }

    /// Get standard configuration file locations.
    fn standard_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/gha-callback/config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gha-callback/config.toml"));
        }

        paths.push(PathBuf::from("gha-callback.toml"));
        paths
    }

    /// Load one configuration file.
    fn load_file(path: &Path, strict: bool) -> Result<ConfigOverrides> {
        let content =
            fs::read_to_string(path).map_err(|e| Error::config_load(path, e.to_string()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        // Parse based on file extension
        let parsed: std::result::Result<GithubActionsWrapper, String> = match extension {
            "toml" => toml::from_str(&content).map_err(|e| e.to_string()),
            "yml" | "yaml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            "json" => serde_json::from_str(&content).map_err(|e| e.to_string()),
            _ => toml::from_str(&content)
                .or_else(|_| serde_yaml::from_str(&content))
                .map_err(|e| e.to_string()),
        };
        let wrapper = parsed.map_err(|message| Error::config_load(path, message))?;

        let origin = path.display().to_string();
        let raw = wrapper.github_actions;
        let mut layer = ConfigOverrides::default();

        if let Some(value) = &raw.verbose {
            layer.verbose = accept(&origin, "verbose", strict, bool_from_json(value))?;
        }
        if let Some(value) = &raw.archive_file {
            layer.archive_file = accept(&origin, "archive_file", strict, path_from_json(value))?;
        }
        if let Some(value) = &raw.grouping {
            let grouping = match value {
                JsonValue::String(s) => s.parse().ok(),
                _ => None,
            };
            layer.grouping = accept(&origin, "grouping", strict, grouping)?;
        }

        Ok(layer)
    }

    /// Load configuration from environment variables.
    fn load_from_env(prefix: &str, strict: bool) -> Result<ConfigOverrides> {
        let mut layer = ConfigOverrides::default();

        let verbose_var = format!("{}_VERBOSE", prefix);
        if let Ok(val) = env::var(&verbose_var) {
            layer.verbose = accept(&verbose_var, "verbose", strict, parse_bool(&val))?;
        }

        let archive_var = format!("{}_ARCHIVE_FILE", prefix);
        if let Ok(val) = env::var(&archive_var) {
            let path = (!val.trim().is_empty()).then(|| PathBuf::from(val));
            layer.archive_file = accept(&archive_var, "archive_file", strict, path)?;
        }

        let grouping_var = format!("{}_GROUPING", prefix);
        if let Ok(val) = env::var(&grouping_var) {
            layer.grouping = accept(&grouping_var, "grouping", strict, val.parse().ok())?;
        }

        Ok(layer)
    }
}

/// Keeps a recognized value. An unrecognized one is an error in strict mode
/// and skipped otherwise.
fn accept<T>(origin: &str, key: &str, strict: bool, value: Option<T>) -> Result<Option<T>> {
    match value {
        Some(value) => Ok(Some(value)),
        None if strict => Err(Error::config_load(
            origin,
            format!("unrecognized value for '{key}'"),
        )),
        None => {
            debug!("Ignoring unrecognized value for '{}' from {}", key, origin);
            Ok(None)
        }
    }
}

/// Parses a boolean option value.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bool_from_json(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => parse_bool(s),
        JsonValue::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

fn path_from_json(value: &JsonValue) -> Option<PathBuf> {
    match value {
        JsonValue::String(s) if !s.trim().is_empty() => Some(PathBuf::from(s)),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
