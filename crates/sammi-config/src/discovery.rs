//! File-based config discovery for CLI use
//!
//! Finds `sammi.config.*` in a project root and loads it into a raw JSON
//! value. Module configs need a [`ModuleLoader`]; JSON configs are read
//! directly.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::schema::ExtensionConfig;
use crate::validation::ConfigValidator;

/// Candidate config files, in lookup order.
pub const CONFIG_FILES: [&str; 5] = [
    "sammi.config.mjs",
    "sammi.config.js",
    "sammi.config.mts",
    "sammi.config.ts",
    "sammi.config.json",
];

/// How a config file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JavaScript or TypeScript module; the default export is the config.
    Module,
    Json,
}

impl ConfigFormat {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Module,
        }
    }
}

/// Evaluates a module config file and returns its default export.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load_module(&self, path: &Path) -> Result<Value>;
}

/// A config file that passed validation.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: ExtensionConfig,
}

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// # async fn demo() -> sammi_config::Result<()> {
/// use sammi_config::{ConfigDiscovery, FsValidator};
///
/// let discovery = ConfigDiscovery::new(".");
/// let loaded = discovery.load(None, &FsValidator::current_dir()).await?;
/// println!("{}", loaded.config.name);
/// # Ok(())
/// # }
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing config file, in [`CONFIG_FILES`] order.
    pub fn find(&self) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| path.is_file())
    }

    /// Read the discovered config without validating it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file exists, and
    /// `ConfigError::Load` if the file cannot be read or evaluated.
    pub async fn load_raw(&self, loader: Option<&dyn ModuleLoader>) -> Result<(PathBuf, Value)> {
        let path = self
            .find()
            .ok_or_else(|| ConfigError::NotFound(self.root.clone()))?;
        tracing::debug!("Loading config from: {}", path.display());

        let value = match ConfigFormat::of(&path) {
            ConfigFormat::Json => load_json(&path)?,
            ConfigFormat::Module => {
                let loader = loader.ok_or_else(|| {
                    ConfigError::load(&path, "module config files are not supported here")
                })?;
                loader.load_module(&path).await?
            }
        };

        Ok((path, value))
    }

    /// Read and validate the discovered config.
    pub async fn load(
        &self,
        loader: Option<&dyn ModuleLoader>,
        validator: &dyn ConfigValidator,
    ) -> Result<LoadedConfig> {
        let (path, raw) = self.load_raw(loader).await?;
        let config = validator
            .validate(&raw)
            .map_err(|errors| ConfigError::Invalid {
                path: path.clone(),
                errors,
            })?;
        Ok(LoadedConfig { path, config })
    }
}

fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|err| ConfigError::load(path, err))?;
    serde_json::from_str(&content).map_err(|err| ConfigError::load(path, format!("invalid JSON: {err}")))
}
