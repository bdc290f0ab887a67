//! Turns a validated descriptor into the absolute, fully-defaulted form a
//! build consumes.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ReferencedFile, Result};
use crate::schema::{DEFAULT_OUT_DIR, DEFAULT_OUT_JS, DEFAULT_OUT_SEF, ExtensionConfig, OutConfig};

/// Prefix of the environment variables that override `out.*`.
pub const ENV_PREFIX: &str = "SAMMI_NEXT_OUT_";

/// Output locations with every field populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOut {
    pub dir: String,
    pub js: String,
    pub sef: String,
}

impl Default for ResolvedOut {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUT_DIR.to_string(),
            js: DEFAULT_OUT_JS.to_string(),
            sef: DEFAULT_OUT_SEF.to_string(),
        }
    }
}

impl ResolvedOut {
    /// Layer defaults < file config < environment < CLI.
    pub fn layered(file: Option<&OutConfig>, cli: &OutConfig) -> Result<Self> {
        let file = file.map(OutConfig::without_empty).unwrap_or_default();

        let out: ResolvedOut = Figment::from(Serialized::defaults(ResolvedOut::default()))
            .merge(Serialized::defaults(file))
            .merge(Serialized::defaults(env_overrides().without_empty()))
            .merge(Serialized::defaults(cli.without_empty()))
            .extract()?;

        Ok(out)
    }
}

/// `SAMMI_NEXT_OUT_*` values as written. `Env` as a provider would parse
/// `2024` into a number, so the raw strings are read instead.
fn env_overrides() -> OutConfig {
    let mut out = OutConfig::default();
    for (key, value) in Env::prefixed(ENV_PREFIX).only(&["dir", "js", "sef"]).iter() {
        match key.as_str().to_ascii_lowercase().as_str() {
            "dir" => out.dir = Some(value),
            "js" => out.js = Some(value),
            "sef" => out.sef = Some(value),
            _ => {}
        }
    }
    out
}

/// A descriptor with every optional field defaulted and every path absolute.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedExtensionConfig {
    pub id: String,
    pub name: String,
    pub info: String,
    pub version: String,
    pub entry: PathBuf,
    /// `None` when no external fragment is configured.
    pub external: Option<PathBuf>,
    /// `None` when no deck fragment is configured.
    pub over: Option<PathBuf>,
    pub out: ResolvedOut,
    pub bundler_config: Map<String, Value>,
}

impl ResolvedExtensionConfig {
    pub fn out_dir(&self, root_dir: &Path) -> PathBuf {
        path_clean::clean(root_dir.join(&self.out.dir))
    }

    pub fn js_path(&self, root_dir: &Path) -> PathBuf {
        self.out_dir(root_dir).join(&self.out.js)
    }

    pub fn sef_path(&self, root_dir: &Path) -> PathBuf {
        self.out_dir(root_dir).join(&self.out.sef)
    }

    /// Paths whose changes should trigger a rebuild.
    pub fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(3);
        if let Some(dir) = self.entry.parent() {
            paths.push(dir.to_path_buf());
        }
        paths.extend(self.external.iter().cloned());
        paths.extend(self.over.iter().cloned());
        paths
    }
}

/// Resolve `config` against `root_dir`, applying `cli` output overrides.
///
/// # Errors
///
/// Returns [`ConfigError::FileMissing`] when the entry file, or a configured
/// external or over file, does not exist.
pub fn resolve(
    config: ExtensionConfig,
    cli: &OutConfig,
    root_dir: impl AsRef<Path>,
) -> Result<ResolvedExtensionConfig> {
    let root_dir = absolute_root(root_dir.as_ref())?;
    let out = ResolvedOut::layered(config.out.as_ref(), cli)?;

    let entry = absolute(&root_dir, &config.entry);
    let external = optional_path(&root_dir, config.external.as_deref());
    let over = optional_path(&root_dir, config.over.as_deref());

    require_file(ReferencedFile::Entry, &entry)?;
    if let Some(path) = &external {
        require_file(ReferencedFile::External, path)?;
    }
    if let Some(path) = &over {
        require_file(ReferencedFile::Over, path)?;
    }

    tracing::debug!(
        id = %config.id,
        entry = %entry.display(),
        out_dir = %out.dir,
        "resolved extension config"
    );

    Ok(ResolvedExtensionConfig {
        id: config.id,
        name: config.name,
        info: config.info.unwrap_or_default(),
        version: config.version,
        entry,
        external,
        over,
        out,
        bundler_config: config.bundler_config.unwrap_or_default(),
    })
}

/// Make `root` absolute against the current directory.
pub fn absolute_root(root: &Path) -> Result<PathBuf> {
    Ok(path_clean::clean(std::path::absolute(root)?))
}

fn absolute(root_dir: &Path, relative: &str) -> PathBuf {
    path_clean::clean(root_dir.join(relative))
}

fn optional_path(root_dir: &Path, value: Option<&str>) -> Option<PathBuf> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| absolute(root_dir, v))
}

fn require_file(kind: ReferencedFile, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConfigError::FileMissing {
            kind,
            path: path.to_path_buf(),
        })
    }
}
