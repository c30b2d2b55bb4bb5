//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::engine::{EngineConfig, RandomSection};
use crate::{Backend, ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// File name searched for in the start directory and its ancestors
pub const PROJECT_CONFIG_FILE: &str = "afbind.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.afbind/config.toml) - lowest priority
/// 2. Project config (./afbind.toml) - overrides global
/// 3. Environment variables (AFBIND_*, AF_PATH) - overrides project
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective settings after merging every source
    pub settings: EngineConfig,

    /// Directory where afbind.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads the global config from `path` instead of the home directory
    pub fn with_global_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find afbind.toml, merges it over the
    /// global config, then applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let mut settings = self.load_global_config()?;

        let (project_root, project_config) = self.find_project_config(start_dir)?;
        settings.merge(&project_config);

        apply_env_overrides(&mut settings)?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let mut settings = self.load_global_config()?;
        settings.merge(&EngineConfig::load_from_file(config_path)?);
        apply_env_overrides(&mut settings)?;

        Ok(Config {
            settings,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Find project configuration by walking up directory tree
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, EngineConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let config = EngineConfig::load_from_file(&config_path)?;
                return Ok((Some(current), config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, EngineConfig::default())),
            }
        }
    }

    /// Load global configuration, or defaults when there is none
    fn load_global_config(&mut self) -> ConfigResult<EngineConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => match EngineConfig::global_config_path() {
                Ok(path) => {
                    self.global_config_path = Some(path.clone());
                    path
                }
                // No home directory means no global config
                Err(ConfigError::HomeNotFound) => return Ok(EngineConfig::default()),
                Err(e) => return Err(e),
            },
        };

        if !path.exists() {
            return Ok(EngineConfig::default());
        }

        EngineConfig::load_from_file(&path)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides
///
/// - AFBIND_BACKEND: backend name
/// - AFBIND_LIBRARY: library name or path
/// - AFBIND_SEARCH_PATH: platform path list, searched before configured paths
/// - AFBIND_SEED: initial seed
/// - AF_PATH: ArrayFire install prefix, its lib dirs are searched last
pub fn apply_env_overrides(config: &mut EngineConfig) -> ConfigResult<()> {
    if let Ok(backend) = env::var("AFBIND_BACKEND") {
        config.engine_mut().backend = Some(backend.parse::<Backend>()?);
    }

    if let Ok(library) = env::var("AFBIND_LIBRARY") {
        if !library.is_empty() {
            config.engine_mut().library = Some(PathBuf::from(library));
        }
    }

    if let Some(paths) = env::var_os("AFBIND_SEARCH_PATH") {
        let mut merged: Vec<PathBuf> = env::split_paths(&paths)
            .filter(|p| !p.as_os_str().is_empty())
            .collect();
        let engine = config.engine_mut();
        merged.extend(engine.search_paths.take().unwrap_or_default());
        engine.search_paths = Some(merged);
    }

    if let Ok(seed) = env::var("AFBIND_SEED") {
        let seed = seed
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue {
                field: "AFBIND_SEED".to_string(),
                reason: e.to_string(),
            })?;
        config.random = Some(RandomSection { seed: Some(seed) });
    }

    if let Some(prefix) = env::var_os("AF_PATH") {
        let prefix = PathBuf::from(prefix);
        if !prefix.as_os_str().is_empty() {
            let engine = config.engine_mut();
            let paths = engine.search_paths.get_or_insert_with(Vec::new);
            paths.push(prefix.join("lib"));
            paths.push(prefix.join("lib64"));
        }
    }

    Ok(())
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if an afbind.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
