//! Bootstrap configuration loading and config file resolution
//!
//! Configuration sources, highest priority first:
//! 1. Command-line argument (`--config`)
//! 2. Environment variable (`WKMP_<MODULE>_CONFIG`)
//! 3. Per-user TOML file (`~/.config/wkmp/<module>.toml`)
//! 4. Compiled defaults
//!
//! A missing config file is never fatal: a warning is logged and the
//! compiled defaults are used. A file that exists but fails to parse is
//! reported as [`Error::Config`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Entity merge settings (optional)
    #[serde(default)]
    pub merge: MergeSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Entity merge settings
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct MergeSettings {
    /// Fail on a missing root fragment and on unmatched collection placeholders
    #[serde(default)]
    pub strict: bool,

    /// External schema file replacing the built-in entity schema
    #[serde(default)]
    pub schema: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Resolves which config file (if any) a module should read
pub struct ConfigResolver {
    module_name: String,
}

impl ConfigResolver {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
        }
    }

    /// Environment variable consulted for this module, e.g. `WKMP_EM_CONFIG`
    pub fn env_var_name(&self) -> String {
        let module = self
            .module_name
            .trim_start_matches("wkmp-")
            .replace('-', "_")
            .to_uppercase();
        format!("WKMP_{}_CONFIG", module)
    }

    /// Default per-user config file location
    pub fn default_path(&self) -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("wkmp").join(format!("{}.toml", self.module_name)))
    }

    /// Pick the config file path by priority. Returns `None` when nothing is configured
    /// and no default file exists.
    pub fn resolve(&self, cli_arg: Option<&Path>) -> Option<PathBuf> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_arg {
            return Some(path.to_path_buf());
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(self.env_var_name()) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        // Priority 3: Per-user config file
        self.default_path().filter(|p| p.exists())
    }

    /// Resolve and load the module config, falling back to defaults when the
    /// resolved file does not exist.
    ///
    /// Only a CLI or environment path can be missing here; `resolve` already
    /// drops a per-user default file that does not exist. The fallback is
    /// logged immediately, so call this after the subscriber is installed or
    /// use [`ConfigResolver::load_with_source`].
    pub fn load(&self, cli_arg: Option<&Path>) -> Result<TomlConfig> {
        let (config, source) = self.load_with_source(cli_arg)?;
        source.log(&self.module_name);
        Ok(config)
    }

    /// Like [`ConfigResolver::load`], but returns where the config came from
    /// instead of logging it, for binaries that load config before tracing
    /// is initialized.
    pub fn load_with_source(&self, cli_arg: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
        match self.resolve(cli_arg) {
            Some(path) if path.exists() => Ok((load_toml_config(&path)?, ConfigSource::File(path))),
            Some(path) => Ok((TomlConfig::default(), ConfigSource::Missing(path))),
            None => Ok((TomlConfig::default(), ConfigSource::Defaults)),
        }
    }
}

/// Where a loaded [`TomlConfig`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// This file was requested but does not exist; defaults were used
    Missing(PathBuf),
    /// No file configured; defaults were used
    Defaults,
}

impl ConfigSource {
    /// Report the config source through `tracing`
    pub fn log(&self, module: &str) {
        match self {
            ConfigSource::File(path) => {
                debug!(module = %module, path = %path.display(), "Loaded config file");
            }
            ConfigSource::Missing(path) => {
                warn!(
                    path = %path.display(),
                    "Config file not found, using compiled defaults"
                );
            }
            ConfigSource::Defaults => {
                debug!(module = %module, "No config file configured, using compiled defaults");
            }
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    parse_toml_config(&content)
}

/// Parse TOML config text
pub fn parse_toml_config(content: &str) -> Result<TomlConfig> {
    toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
}
