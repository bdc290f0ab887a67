use clap::{Args, Subcommand};
use std::path::PathBuf;

use sammi_bundler::BuildMode;
use sammi_config::OutConfig;

use crate::cli::enums::Template;
use crate::cli::validation::parse_mode;
use crate::error::{CliError, Result};

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the extension in dev mode and rebuild on file changes
    ///
    /// Watches the entry's directory and the external and over files.
    /// Stop with Ctrl+C.
    Dev(DevArgs),

    /// Create a new extension project
    Init(InitArgs),

    /// Validate the extension config without building
    ///
    /// Finds sammi.config.*, validates it and checks that every referenced
    /// file exists, then prints the resolved settings.
    Check(CheckArgs),
}

/// Flags shared by the build and `dev` commands.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildFlags {
    /// Build mode (dev or production, case-insensitive)
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Output directory [default: dist]
    #[arg(long = "outDir", visible_alias = "out-dir", value_name = "DIR")]
    pub out_dir: Option<String>,

    /// Output file name for the JS [default: extension.js]
    #[arg(long = "outJs", visible_alias = "out-js", value_name = "NAME")]
    pub out_js: Option<String>,

    /// Output file name for the SEF [default: extension.sef]
    #[arg(long = "outSef", visible_alias = "out-sef", value_name = "NAME")]
    pub out_sef: Option<String>,
}

impl BuildFlags {
    /// The `out` overrides given on the command line.
    pub fn out_overrides(&self) -> OutConfig {
        OutConfig {
            dir: self.out_dir.clone(),
            js: self.out_js.clone(),
            sef: self.out_sef.clone(),
        }
    }

    /// The `--mode` value, or `default` when absent.
    ///
    /// Checked here rather than by clap so an unknown mode fails like every
    /// other build error.
    pub fn mode_or(&self, default: BuildMode) -> Result<BuildMode> {
        match self.mode.as_deref() {
            Some(mode) => parse_mode(mode).map_err(CliError::InvalidArgument),
            None => Ok(default),
        }
    }
}

/// Arguments for a one-shot build
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Extension root directory [default: current directory]
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub flags: BuildFlags,
}

/// Arguments for the dev command
#[derive(Args, Debug, Clone, Default)]
pub struct DevArgs {
    /// Extension root directory [default: current directory]
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,

    #[command(flatten)]
    pub flags: BuildFlags,
}

/// Arguments for the init command
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Project name, also used as the extension id
    ///
    /// A directory with this name is created. Without a name the current
    /// directory is initialized and its name is used.
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// Project template
    #[arg(short, long, value_enum, default_value_t = Template::SampleJs)]
    pub template: Template,

    /// Write into a non-empty directory, overwriting template files
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Extension root directory [default: current directory]
    #[arg(value_name = "ROOT")]
    pub root: Option<PathBuf>,
}
