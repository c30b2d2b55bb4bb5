//! Locating and opening the ArrayFire shared library
//!
//! Backends ship as `afcpu`, `afcuda`, `afopencl`, `afoneapi` or the unified
//! `af`; each platform decorates those names differently and installs them
//! in different places.

use libloading::Library;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// No candidate file exists on any search path
    #[error("Library not found: {0}")]
    LibraryNotFound(String),
    /// The library opened but lacks an entry point the engine needs
    #[error("Symbol '{symbol}' not found in library '{library}'")]
    SymbolNotFound { library: String, symbol: String },
    /// The file exists but the platform loader rejected it
    #[error("Failed to load library: {0}")]
    LoadFailed(String),
}

/// Resolves a library name against an ordered list of directories
pub struct LibraryLoader {
    search_paths: Vec<PathBuf>,
}

impl LibraryLoader {
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
        }
    }

    /// `paths`, in order, ahead of the default locations
    pub fn with_search_paths(paths: &[PathBuf]) -> Self {
        Self {
            search_paths: paths
                .iter()
                .cloned()
                .chain(Self::default_search_paths())
                .collect(),
        }
    }

    /// The working directory, then the system library directories and the
    /// ArrayFire installer's default prefix
    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = std::env::current_dir().into_iter().collect();

        #[cfg(target_os = "linux")]
        {
            paths.extend(["/usr/lib", "/usr/local/lib", "/lib"].map(PathBuf::from));
            if cfg!(target_pointer_width = "64") {
                paths.extend(
                    [
                        "/usr/lib64",
                        "/usr/local/lib64",
                        "/lib64",
                        "/usr/lib/x86_64-linux-gnu",
                    ]
                    .map(PathBuf::from),
                );
            }
            paths.extend(["/opt/arrayfire/lib", "/opt/arrayfire/lib64"].map(PathBuf::from));
        }

        #[cfg(target_os = "macos")]
        paths.extend(
            [
                "/usr/lib",
                "/usr/local/lib",
                "/opt/homebrew/lib",
                "/opt/arrayfire/lib",
            ]
            .map(PathBuf::from),
        );

        #[cfg(target_os = "windows")]
        {
            paths.push(PathBuf::from("C:\\Program Files\\ArrayFire\\v3\\lib"));
            if let Ok(root) = std::env::var("SystemRoot") {
                paths.push(Path::new(&root).join("System32"));
            }
        }

        paths
    }

    /// File names tried for a short name such as `afcpu`
    fn candidate_file_names(name: &str) -> Vec<String> {
        if cfg!(target_os = "windows") {
            vec![format!("{}.dll", name), format!("lib{}.dll", name)]
        } else if cfg!(target_os = "macos") {
            vec![
                format!("lib{}.dylib", name),
                format!("lib{}.3.dylib", name),
                format!("lib{}.so", name),
                format!("{}.dylib", name),
            ]
        } else {
            vec![
                format!("lib{}.so", name),
                format!("lib{}.so.3", name),
                format!("{}.so", name),
            ]
        }
    }

    /// Find the file `name` refers to
    ///
    /// An existing file is taken as is and any other multi-part path finds
    /// nothing. A bare name is tried verbatim, then in its decorated forms,
    /// in each search directory in turn.
    pub fn resolve_library_path(&self, name: &Path) -> Option<PathBuf> {
        if name.is_file() {
            return Some(name.to_path_buf());
        }
        if name.components().count() > 1 || name.is_absolute() {
            return None;
        }

        let short = name.to_str()?;
        let mut file_names = vec![short.to_string()];
        file_names.extend(Self::candidate_file_names(short));

        self.search_paths.iter().find_map(|dir| {
            file_names
                .iter()
                .map(|file| dir.join(file))
                .find(|path| path.is_file())
        })
    }

    /// Resolve and open `name`, returning the path that was opened
    ///
    /// Opening runs the library's initializers in this process, so `name`
    /// must refer to a trusted ArrayFire build.
    pub fn load(&self, name: &Path) -> Result<(PathBuf, Library), LoadError> {
        let path = self
            .resolve_library_path(name)
            .ok_or_else(|| LoadError::LibraryNotFound(name.display().to_string()))?;

        let library =
            unsafe { Library::new(&path).map_err(|e| LoadError::LoadFailed(e.to_string()))? };
        tracing::debug!(path = %path.display(), "loaded engine library");
        Ok((path, library))
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }
}

impl Default for LibraryLoader {
    fn default() -> Self {
        Self::new()
    }
}
