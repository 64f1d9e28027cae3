//! Configuration loading
//!
//! Every setting resolves in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error. An explicitly requested file that
//! cannot be read or parsed is. Problems that only cost a fallback are kept
//! in `Settings::warnings`, since resolution runs before logging is set up.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODELS_DIR: &str = "models";
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const ENV_CONFIG: &str = "MDP_CONFIG";
pub const ENV_MODELS_DIR: &str = "MDP_MODELS_DIR";
pub const ENV_BIND: &str = "MDP_BIND";
pub const ENV_PORT: &str = "MDP_PORT";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub models_dir: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset
    pub level: Option<String>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub models_dir: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved service settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub models_dir: PathBuf,
    pub bind: String,
    pub port: u16,
    pub log_level: String,
    /// Config file that contributed values, if any
    pub config_file: Option<PathBuf>,
    /// Ignored sources, for the caller to log
    pub warnings: Vec<String>,
}

impl Settings {
    pub fn resolve(cli: &Overrides) -> Result<Self, ConfigError> {
        let explicit = cli
            .config
            .clone()
            .or_else(|| env_var(ENV_CONFIG).map(PathBuf::from));
        match explicit {
            Some(path) => {
                let toml = load_toml_config(&path)?;
                Self::merge(cli, toml, Some(path))
            }
            None => Self::resolve_with_default_file(cli, default_config_path()),
        }
    }

    /// Resolution when no config file was requested; `found` is the platform
    /// config file, if one exists. An unusable one is skipped with a warning.
    pub fn resolve_with_default_file(
        cli: &Overrides,
        found: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let Some(path) = found else {
            return Self::merge(cli, TomlConfig::default(), None);
        };
        match load_toml_config(&path) {
            Ok(toml) => Self::merge(cli, toml, Some(path)),
            Err(e) => {
                let mut settings = Self::merge(cli, TomlConfig::default(), None)?;
                settings
                    .warnings
                    .insert(0, format!("Ignoring config file: {}", e));
                Ok(settings)
            }
        }
    }

    /// Apply the priority order to already loaded sources
    pub fn merge(
        cli: &Overrides,
        toml: TomlConfig,
        config_file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut warnings = Vec::new();

        let models_dir = cli
            .models_dir
            .clone()
            .or_else(|| env_var(ENV_MODELS_DIR).map(PathBuf::from))
            .or(toml.models_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODELS_DIR));

        let bind = cli
            .bind
            .clone()
            .or_else(|| env_var(ENV_BIND))
            .or(toml.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let env_port = match env_var(ENV_PORT) {
            Some(text) => match text.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    warnings.push(format!("Ignoring {}={}: not a valid port", ENV_PORT, text));
                    None
                }
            },
            None => None,
        };
        let port = cli.port.or(env_port).or(toml.port).unwrap_or(DEFAULT_PORT);

        let log_level = toml
            .logging
            .level
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            models_dir,
            bind,
            port,
            log_level,
            config_file,
            warnings,
        })
    }

    /// `host:port` string for the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// Read and parse one TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// First existing platform config file
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("mdp").join("config.toml"));
    let system_config = cfg!(target_os = "linux").then(|| PathBuf::from("/etc/mdp/config.toml"));

    user_config
        .into_iter()
        .chain(system_config)
        .find(|path| path.exists())
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
