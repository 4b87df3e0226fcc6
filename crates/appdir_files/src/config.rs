use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, instrument};

use appdir_base::{
    AppDirError, AppDirResult, DirectoryCategory, FilePath, PalHandle, RealPal, ResultExt,
};

/// Configuration for a [`DirectoryFileService`](crate::DirectoryFileService).
///
/// ```toml
/// working_directory = "inbox"
/// root = "/srv/app-sandbox"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileServiceConfig {
    /// Category used by the working scope. Defaults to documents.
    #[serde(default)]
    pub working_directory: DirectoryCategory,
    /// Sandbox root for all categories. Platform directories are used when absent.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl FileServiceConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> AppDirResult<Self> {
        toml::from_str(text).map_err(|e| {
            Box::new(AppDirError::configuration(format!(
                "Invalid configuration: {}",
                e.message()
            )))
        })
    }

    /// Real file system access as described by this configuration.
    pub fn build_pal(&self) -> PalHandle {
        match &self.root {
            Some(root) => PalHandle::new(RealPal::with_root(root.clone())),
            None => PalHandle::new(RealPal::new()),
        }
    }
}

/// Loads configuration from a TOML file read through `pal`.
#[instrument(skip(pal), fields(path = %path))]
pub fn load_config(pal: &PalHandle, path: &FilePath) -> AppDirResult<FileServiceConfig> {
    let text = pal.read_file_to_string(path)?;
    let config = FileServiceConfig::from_toml(&text)
        .with_context(|| format!("Failed to load {}", path))?;
    debug!(?config, "loaded configuration");
    Ok(config)
}
