//! Configuration file discovery
//!
//! Looks for `config.{toml,yaml,yml,json}` in the global taskboard config
//! directory and in the project's `.taskboard/` directory.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

const FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

/// A discovered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub format: ConfigFormat,
    pub scope: ConfigScope,
}

impl ConfigFile {
    /// Classify a path by its extension. Returns `None` for unknown formats.
    pub fn from_path(path: impl Into<PathBuf>, scope: ConfigScope) -> Option<Self> {
        let path = path.into();
        let format = ConfigFormat::from_extension(path.extension()?.to_str()?)?;
        Some(Self {
            path,
            format,
            scope,
        })
    }
}

/// Configuration file format detected from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Where a configuration file was found. Project files override global ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigScope {
    Global,
    Project,
    /// Passed explicitly by the caller
    Explicit,
}

/// File discovery service for finding configuration files
#[derive(Debug, Default)]
pub struct FileDiscovery {
    project_dir: Option<PathBuf>,
    global_dir: Option<PathBuf>,
}

impl FileDiscovery {
    /// Discovery rooted at the current working directory and the user config dir
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the project directory (the one containing `config.*`)
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(dir.into());
        self
    }

    /// Override the global directory
    pub fn with_global_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_dir = Some(dir.into());
        self
    }

    /// Discover all configuration files, lowest precedence first
    pub fn discover_all(&self) -> Vec<ConfigFile> {
        let global_dir = self.global_dir.clone().or_else(Self::resolve_global_dir);
        let project_dir = self.project_dir.clone().or_else(Self::resolve_project_dir);

        let mut files = Vec::new();
        if let Some(dir) = global_dir {
            files.extend(Self::search_directory(&dir, ConfigScope::Global));
        }
        if let Some(dir) = project_dir {
            files.extend(Self::search_directory(&dir, ConfigScope::Project));
        }
        files.sort_by_key(|f| f.scope);

        debug!(count = files.len(), "discovered configuration files");
        files
    }

    fn search_directory(dir: &Path, scope: ConfigScope) -> Vec<ConfigFile> {
        if !dir.exists() {
            trace!("config directory does not exist: {}", dir.display());
            return Vec::new();
        }
        if !dir.is_dir() {
            warn!("config path exists but is not a directory: {}", dir.display());
            return Vec::new();
        }

        FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .filter(|candidate| candidate.is_file())
            .filter_map(|candidate| ConfigFile::from_path(candidate, scope))
            .collect()
    }

    fn resolve_project_dir() -> Option<PathBuf> {
        std::env::current_dir().ok().map(|cwd| cwd.join(".taskboard"))
    }

    fn resolve_global_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taskboard"))
    }
}
