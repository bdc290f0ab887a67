//! Extension descriptor types.
//!
//! These mirror the `sammi.config.*` file an extension author writes. They
//! carry no defaults: defaulting happens in [`crate::resolve`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default output directory, relative to the project root.
pub const DEFAULT_OUT_DIR: &str = "dist";

/// Default file name of the bundled script.
pub const DEFAULT_OUT_JS: &str = "extension.js";

/// Default file name of the packaged extension.
pub const DEFAULT_OUT_SEF: &str = "extension.sef";

/// A user-authored extension descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionConfig {
    /// Stable identifier. Used as the namespace key under `SAMMIExtensions`
    /// and as the DOM id suffix of the external section.
    pub id: String,

    /// Display name shown in SAMMI.
    pub name: String,

    /// Description shown to end users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,

    /// Version used by SAMMI's update check, e.g. `1.2.0`.
    pub version: String,

    /// Path to the extension's source script.
    pub entry: String,

    /// Path to an HTML fragment inserted into the bridge page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<String>,

    /// Path to a JSON deck fragment shipped with the extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub over: Option<String>,

    /// Output locations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<OutConfig>,

    /// Options deep-merged onto the generated bundler configuration.
    #[serde(
        default,
        alias = "tsdownConfig",
        skip_serializing_if = "Option::is_none"
    )]
    pub bundler_config: Option<Map<String, Value>>,
}

/// Output locations. Each field falls back to its default when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct OutConfig {
    /// Output directory, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// File name of the bundled script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<String>,

    /// File name of the packaged extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sef: Option<String>,
}

impl OutConfig {
    /// Drop empty values so they count as unset when layering.
    pub fn without_empty(&self) -> Self {
        let keep = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        Self {
            dir: keep(&self.dir),
            js: keep(&self.js),
            sef: keep(&self.sef),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.without_empty() == Self::default()
    }
}

/// JSON Schema of [`ExtensionConfig`], for editor completion.
pub fn json_schema() -> Value {
    let schema = schemars::schema_for!(ExtensionConfig);
    serde_json::to_value(schema).unwrap_or(Value::Null)
}
