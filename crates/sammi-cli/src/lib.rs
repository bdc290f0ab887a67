//! SAMMI Next CLI.
//!
//! Drives the build pipeline from the command line: discover and validate
//! `sammi.config.*`, bundle the entry with Rolldown, then write the SEF and the
//! preview page. `dev` keeps watching the sources and rebuilds on change.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - one module per command (`build`, `dev`, `init`, `check`)
//! - [`dev`] - file watching and the debounced rebuild loop
//! - [`error`] - the CLI error type and its miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines
//!
//! # Example
//!
//! ```rust,no_run
//! use sammi_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
