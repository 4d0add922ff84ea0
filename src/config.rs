//! stubscan configuration management.
//!
//! Configuration is read from the first of:
//! - the path given with `--config`
//! - `./stubscan.toml` in the working directory
//! - `<config dir>/stubscan/config.toml` (e.g. `~/.config/stubscan/config.toml`)
//!
//! Every field has a default, so running without any file is supported.

use crate::error::StubscanError;
use crate::fs_utils;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "stubscan.toml";

/// stubscan configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StubscanConfig {
    /// Where the stub source tree comes from
    #[serde(default)]
    pub stubs: StubSourceConfig,

    /// Static extraction settings
    #[serde(default)]
    pub extract: ExtractConfig,

    /// Live enrichment settings
    #[serde(default)]
    pub enrich: EnrichConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Stub source tree location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubSourceConfig {
    /// Git repository holding the stubs
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch the cached checkout is reset to
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Local checkout directory
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Sub-path of the checkout containing the stub root
    #[serde(default = "default_stub_root")]
    pub stub_root: PathBuf,
}

fn default_repository() -> String {
    "https://github.com/microbit-foundation/micropython-microbit-stubs".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("temp-scripts/micropython-microbit-stubs")
}

fn default_stub_root() -> PathBuf {
    PathBuf::from("lang/en/typeshed/stdlib")
}

impl Default for StubSourceConfig {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            branch: default_branch(),
            cache_dir: default_cache_dir(),
            stub_root: default_stub_root(),
        }
    }
}

impl StubSourceConfig {
    /// Absolute-or-relative directory the extractor walks
    pub fn stub_dir(&self) -> PathBuf {
        self.cache_dir.join(&self.stub_root)
    }
}

/// Extractor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Version manifest read and rewritten by the extractor
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,

    /// Namespace root whose directory is processed before its siblings
    #[serde(default = "default_privileged_namespace")]
    pub privileged_namespace: String,
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("src/autocompletion/microbit.json")
}

fn default_privileged_namespace() -> String {
    "microbit".to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            privileged_namespace: default_privileged_namespace(),
        }
    }
}

/// Enricher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    /// Interpreter executable
    #[serde(default = "default_python")]
    pub python: String,

    /// Extra import paths prepended for the interpreter
    #[serde(default = "default_python_paths")]
    pub python_paths: Vec<PathBuf>,
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_python_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("../public/public_libraries"),
        PathBuf::from("./stubs"),
    ]
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            python: default_python(),
            python_paths: default_python_paths(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl StubscanConfig {
    /// Load configuration, honoring an explicit path first
    pub fn load(explicit: Option<&Path>) -> Result<Self, StubscanError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(StubscanError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            return Self::load_from(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Self::load_from(&local);
        }

        match fs_utils::get_config_base_dir() {
            Some(dir) => Self::load_from(&dir.join("config.toml")),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self, StubscanError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| StubscanError::IoError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| StubscanError::ConfigError {
            message: format!("Failed to parse config {}: {}", path.display(), e),
        })
    }
}
