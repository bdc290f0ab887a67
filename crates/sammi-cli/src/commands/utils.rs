//! Helpers shared by the commands.

use std::path::{Path, PathBuf};

use sammi_bundler::{BuildMode, BuildOptions, RolldownModuleLoader};
use sammi_config::{ConfigDiscovery, FsValidator, LoadedConfig};

use crate::cli::BuildFlags;
use crate::error::{CliError, Result, ResultExt};

/// The extension root as an absolute directory. Defaults to the current
/// directory.
pub(crate) fn resolve_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = sammi_config::absolute_root(root.unwrap_or(Path::new(".")))?;
    if !root.is_dir() {
        return Err::<PathBuf, _>(CliError::FileNotFound(root))
            .with_hint("The root argument must be the directory containing sammi.config.*");
    }
    Ok(root)
}

/// Find, read and validate the config in `root`.
///
/// Referenced files are checked against the current directory.
pub(crate) async fn load_config(root: &Path) -> Result<LoadedConfig> {
    let loaded = ConfigDiscovery::new(root)
        .load(Some(&RolldownModuleLoader), &FsValidator::current_dir())
        .await?;
    tracing::debug!("Loaded config from {}", loaded.path.display());
    Ok(loaded)
}

/// Load and resolve the config in `root` for a build in `mode`.
pub(crate) async fn load_build_options(
    root: &Path,
    flags: &BuildFlags,
    mode: BuildMode,
) -> Result<BuildOptions> {
    let loaded = load_config(root).await?;
    let config = sammi_config::resolve(loaded.config, &flags.out_overrides(), root)?;
    Ok(BuildOptions::new(config, root, mode))
}
