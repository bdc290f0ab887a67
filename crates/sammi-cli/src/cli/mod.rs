//! Command-line interface definition.
//!
//! - `sammi-next [ROOT]` - build the extension once (production by default)
//! - `sammi-next dev [ROOT]` - build, then rebuild on every change
//! - `sammi-next init [NAME]` - scaffold a new extension project
//! - `sammi-next check [ROOT]` - validate and resolve the config without building

mod commands;
pub mod enums;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, BuildFlags, CheckArgs, Command, DevArgs, InitArgs};
pub use enums::*;
pub use validation::parse_mode;

/// SAMMI Next - build SAMMI extensions from JavaScript/TypeScript
#[derive(Parser, Debug)]
#[command(
    name = "sammi-next",
    version,
    about = "Build SAMMI extensions from JavaScript/TypeScript",
    long_about = "SAMMI Next bundles an extension's entry script into a single browser script,\n\
                  then packages it with its metadata into a SAMMI Extension File (.sef)\n\
                  and a preview.html page.",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Build arguments, used when no subcommand is given
    #[command(flatten)]
    pub build: BuildArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}
