//! Miette rendering for CLI errors.

use miette::Report;
use sammi_config::ConfigError;

use crate::error::CliError;

/// Convert a [`CliError`] into a report for `main`.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bundler(e) => bundler_error_to_miette(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::Watch(e) => miette::miette!(
            help = "Check that the watched paths exist and that the system watch limit is not exhausted",
            "File watcher error: {}",
            e
        ),
        other => miette::miette!("{}", other),
    }
}

pub fn config_error_to_miette(err: ConfigError) -> Report {
    let help = match &err {
        ConfigError::NotFound(_) => {
            Some("Create a sammi.config.json in the extension root, or run `sammi-next init`")
        }
        ConfigError::Invalid { .. } => Some("Fix the listed fields in your sammi.config file"),
        ConfigError::FileMissing { .. } => {
            Some("Paths in sammi.config are relative to the extension root")
        }
        ConfigError::Load { .. } => {
            Some("Module configs must `export default` a plain object (optionally via defineConfig)")
        }
        _ => None,
    };

    match help {
        Some(help) => miette::miette!(help = help, "{}", err),
        None => miette::miette!("{}", err),
    }
}

/// Bundler errors carry their own diagnostic codes and help.
pub fn bundler_error_to_miette(err: sammi_bundler::Error) -> Report {
    match err {
        sammi_bundler::Error::Config(e) => config_error_to_miette(e),
        other => Report::new(other),
    }
}
