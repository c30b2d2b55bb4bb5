//! Engine configuration schema (afbind.toml / ~/.afbind/config.toml)
//!
//! Both files share one schema; the loader merges them.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Engine configuration as written in a TOML file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Library selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineSection>,

    /// Random number generator settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random: Option<RandomSection>,
}

/// `[engine]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Backend whose library is loaded (default: unified)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<Backend>,

    /// Explicit library name or path; takes precedence over `backend`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,

    /// Extra directories searched before the system ones
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_paths: Option<Vec<PathBuf>>,
}

/// `[random]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RandomSection {
    /// Seed applied to the engine when a context is opened
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// ArrayFire backend, one shared library each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `libaf`, dispatches to whichever backend is available at runtime
    #[default]
    Unified,
    Cpu,
    Cuda,
    Opencl,
    Oneapi,
}

impl Backend {
    pub const ALL: [Backend; 5] = [
        Backend::Unified,
        Backend::Cpu,
        Backend::Cuda,
        Backend::Opencl,
        Backend::Oneapi,
    ];

    /// Short library name, without platform prefix or extension
    pub fn library_name(&self) -> &'static str {
        match self {
            Backend::Unified => "af",
            Backend::Cpu => "afcpu",
            Backend::Cuda => "afcuda",
            Backend::Opencl => "afopencl",
            Backend::Oneapi => "afoneapi",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Unified => "unified",
            Backend::Cpu => "cpu",
            Backend::Cuda => "cuda",
            Backend::Opencl => "opencl",
            Backend::Oneapi => "oneapi",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Backend::ALL
            .into_iter()
            .find(|b| b.as_str() == lowered)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "engine.backend".to_string(),
                reason: format!(
                    "must be one of unified, cpu, cuda, opencl, oneapi, got '{}'",
                    s
                ),
            })
    }
}

impl EngineConfig {
    /// Load engine configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(engine) = &self.engine {
            if let Some(library) = &engine.library {
                if library.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidValue {
                        field: "engine.library".to_string(),
                        reason: "must not be empty".to_string(),
                    });
                }
            }
            if let Some(paths) = &engine.search_paths {
                if paths.iter().any(|p| p.as_os_str().is_empty()) {
                    return Err(ConfigError::InvalidValue {
                        field: "engine.search_paths".to_string(),
                        reason: "entries must not be empty".to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Get the global config file path (~/.afbind/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".afbind").join("config.toml"))
    }

    /// Effective backend (default: unified)
    pub fn backend(&self) -> Backend {
        self.engine
            .as_ref()
            .and_then(|e| e.backend)
            .unwrap_or_default()
    }

    /// Library to load: the explicit `library` if set, else the backend's name
    pub fn library(&self) -> PathBuf {
        self.engine
            .as_ref()
            .and_then(|e| e.library.clone())
            .unwrap_or_else(|| PathBuf::from(self.backend().library_name()))
    }

    /// Configured search paths, highest priority first
    pub fn search_paths(&self) -> &[PathBuf] {
        self.engine
            .as_ref()
            .and_then(|e| e.search_paths.as_deref())
            .unwrap_or(&[])
    }

    /// Initial random seed, if any
    pub fn seed(&self) -> Option<u64> {
        self.random.as_ref().and_then(|r| r.seed)
    }

    pub(crate) fn engine_mut(&mut self) -> &mut EngineSection {
        self.engine.get_or_insert_with(EngineSection::default)
    }

    /// Merge another config into this one
    ///
    /// Scalar fields from `other` win when set. Search paths from `other`
    /// are searched first, then the ones already present.
    pub fn merge(&mut self, other: &EngineConfig) {
        if let Some(theirs) = &other.engine {
            let ours = self.engine_mut();
            if theirs.backend.is_some() {
                ours.backend = theirs.backend;
            }
            if theirs.library.is_some() {
                ours.library = theirs.library.clone();
            }
            if let Some(paths) = &theirs.search_paths {
                let mut merged = paths.clone();
                merged.extend(ours.search_paths.take().unwrap_or_default());
                ours.search_paths = Some(merged);
            }
        }
        if let Some(seed) = other.seed() {
            self.random = Some(RandomSection { seed: Some(seed) });
        }
    }
}
