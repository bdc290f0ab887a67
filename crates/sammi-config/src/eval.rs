//! Evaluation of bundled config modules with Boa.
//!
//! A module config is first bundled into a classic script that assigns its
//! exports to a global; this module runs that script and reads the default
//! export back as JSON. Functions and other non-JSON values in the export are
//! dropped by `JSON.stringify`.

use std::path::Path;

use boa_engine::{Context, Source};
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Run `script` and return the JSON form of `<global>.default`.
///
/// `path` is only used for error messages.
///
/// # Errors
///
/// Returns `ConfigError::Load` if the script throws, if the global has no
/// default export, or if the export cannot be serialized.
pub fn evaluate_default_export(script: &str, global: &str, path: &Path) -> Result<Value> {
    let program = format!(
        "{script}\n;(function (m) {{\n  if (m === undefined || m === null || m.default === undefined) return undefined;\n  return JSON.stringify(m.default);\n}})(typeof {global} === 'undefined' ? undefined : {global});\n"
    );

    let mut context = Context::default();
    let result = context
        .eval(Source::from_bytes(program.as_bytes()))
        .map_err(|err| ConfigError::load(path, err))?;

    tracing::trace!("Config evaluation result: {}", result.display());

    let Some(json) = result.as_string() else {
        return Err(ConfigError::load(
            path,
            "config module must have a default export, e.g. `export default defineConfig({ ... })`",
        ));
    };

    serde_json::from_str(&json.to_std_string_escaped())
        .map_err(|err| ConfigError::load(path, format!("default export is not JSON-serializable: {err}")))
}
