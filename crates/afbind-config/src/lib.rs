//! afbind configuration system
//!
//! Decides which ArrayFire backend library the bindings load and how:
//! - Global user configuration (~/.afbind/config.toml)
//! - Project configuration (afbind.toml)
//! - Environment overrides (AFBIND_*, AF_PATH)
//!
//! # Configuration Hierarchy
//!
//! Sources are merged in the following order (later overrides earlier):
//! 1. Global config (~/.afbind/config.toml)
//! 2. Project config (./afbind.toml, searched upward)
//! 3. Environment variables
//!
//! # Example
//!
//! ```no_run
//! use afbind_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("backend: {}", config.settings.backend());
//! ```

pub mod engine;
pub mod loader;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub use engine::{Backend, EngineConfig, EngineSection, RandomSection};
pub use loader::{Config, ConfigLoader, PROJECT_CONFIG_FILE};
