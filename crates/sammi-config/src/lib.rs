//! Extension descriptor handling for SAMMI Next.
//!
//! A build starts here: [`ConfigDiscovery`] finds and reads `sammi.config.*`,
//! a [`ConfigValidator`] checks it, and [`resolve`] produces the
//! [`ResolvedExtensionConfig`] the bundler consumes.

pub mod discovery;
pub mod error;
pub mod resolve;
pub mod schema;
pub mod validation;

#[cfg(feature = "eval")]
pub mod eval;

pub use discovery::{CONFIG_FILES, ConfigDiscovery, ConfigFormat, LoadedConfig, ModuleLoader};
pub use error::{ConfigError, ReferencedFile, Result};
pub use resolve::{ENV_PREFIX, ResolvedExtensionConfig, ResolvedOut, absolute_root, resolve};
pub use schema::{
    DEFAULT_OUT_DIR, DEFAULT_OUT_JS, DEFAULT_OUT_SEF, ExtensionConfig, OutConfig, json_schema,
};
pub use validation::{
    ConfigValidator, FieldViolation, FsValidator, SchemaValidator, ValidationError, is_valid_id,
    validate, validate_schema,
};
