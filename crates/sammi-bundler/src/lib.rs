//! # sammi-bundler
//!
//! Builds a SAMMI extension from a resolved descriptor: bundles the entry
//! script with Rolldown into a single IIFE, then packages the result into a
//! SAMMI Extension File (SEF) and an HTML preview page.
//!
//! ```no_run
//! use sammi_bundler::{BuildMode, BuildOptions, BundlerSettings, ExtensionBundler, RolldownBundler, artifacts};
//! # async fn demo(config: sammi_config::ResolvedExtensionConfig) -> sammi_bundler::Result<()> {
//! let options = BuildOptions::new(config, "/path/to/extension", BuildMode::Production);
//! let settings = BundlerSettings::resolve(&options)?;
//! RolldownBundler.bundle(&settings).await?;
//! artifacts::generate(&options)?.write(&options)?;
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod artifacts;
pub mod bundler;
pub mod config_module;
pub mod diagnostics;
pub mod mode;
pub mod options;
pub mod settings;

pub use artifacts::{Artifacts, PREVIEW_FILE, SefDocument, SefSection};
pub use bundler::{BundledScript, ExtensionBundler, RolldownBundler};
pub use config_module::RolldownModuleLoader;
pub use mode::BuildMode;
pub use options::BuildOptions;
pub use settings::{BundlerSettings, ExportsMode, ModuleFormat, TargetPlatform, merge_values};

/// Root namespace under which every extension registers its exports.
pub const GLOBAL_NAME: &str = "SAMMIExtensions";

/// Version of this tool, embedded in every build banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for sammi-bundler operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from Rolldown bundler.
    #[error("Rolldown bundler error: {}", format_bundler_error(.0))]
    Bundler(Vec<diagnostics::ExtractedDiagnostic>),

    /// The merged bundler configuration is not usable.
    #[error("Invalid bundler configuration: {0}")]
    InvalidConfig(String),

    /// Rolldown finished without emitting an entry chunk.
    #[error("Bundle for {0} produced no entry chunk")]
    NoEntryChunk(String),

    /// The bundled script was not on disk when packaging started.
    #[error("Bundled script not found: {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// The over file is not valid JSON.
    #[error("Invalid over file {}: {source}", path.display())]
    OverInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An embedded template is missing from the binary.
    #[error("Embedded template not found: {0}")]
    TemplateMissing(&'static str),

    /// Config loading or resolution failed.
    #[error(transparent)]
    Config(#[from] sammi_config::ConfigError),

    /// I/O error with context message.
    #[error("{message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for sammi-bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a bundler error from a Rolldown error.
    pub fn from_rolldown_batch(error: &dyn std::fmt::Debug) -> Self {
        Error::Bundler(diagnostics::extract_from_rolldown_error(error))
    }

    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::IoError {
            message: message.into(),
            source,
        }
    }
}

fn format_bundler_error(diagnostics: &[diagnostics::ExtractedDiagnostic]) -> String {
    match diagnostics {
        [] => "Unknown bundler error".to_string(),
        [single] => format!("{}: {}", single.kind, single.message),
        many => format!(
            "{} errors: {}",
            many.len(),
            many.iter()
                .map(|d| format!("{}: {}", d.kind, d.message))
                .collect::<Vec<_>>()
                .join("; ")
        ),
    }
}

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Bundler(_) => "sammi_bundler::bundler",
            Error::InvalidConfig(_) => "sammi_bundler::invalid_config",
            Error::NoEntryChunk(_) => "sammi_bundler::no_entry_chunk",
            Error::ArtifactMissing(_) => "sammi_bundler::artifact_missing",
            Error::OverInvalid { .. } => "sammi_bundler::over_invalid",
            Error::TemplateMissing(_) => "sammi_bundler::template_missing",
            Error::Config(_) => "sammi_bundler::config",
            Error::IoError { .. } | Error::Io(_) => "sammi_bundler::io",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::InvalidConfig(_) => Some(Box::new(
                "Check the `bundlerConfig` section of your sammi.config file",
            )),
            Error::ArtifactMissing(_) => Some(Box::new(
                "The bundling step did not write its output. Re-run the build and check for bundler errors",
            )),
            Error::OverInvalid { .. } => Some(Box::new(
                "Production builds re-serialize the over file, so it must contain valid JSON",
            )),
            Error::Bundler(diagnostics) => match diagnostics.as_slice() {
                [single] => single
                    .help
                    .as_ref()
                    .map(|h| Box::new(h.clone()) as Box<dyn std::fmt::Display>),
                [] => None,
                _ => Some(Box::new(
                    "Multiple bundler errors occurred. See details below.".to_string(),
                )),
            },
            _ => None,
        }
    }
}
