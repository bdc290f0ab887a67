//! Command implementations.
//!
//! - [`build`] - one-shot build (the root command)
//! - [`dev`] - build in dev mode and watch
//! - [`init`] - project scaffolding
//! - [`check`] - config validation
//!
//! Each command module provides an `execute` function taking its parsed
//! arguments.

pub mod build;
pub mod check;
pub mod dev;
pub mod init;
mod templates;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use check::execute as check_execute;
pub use dev::execute as dev_execute;
pub use init::execute as init_execute;
