//! Bundler configuration.
//!
//! The generated defaults and the user's `bundlerConfig` passthrough are both
//! plain JSON, merged with [`merge_values`] and then read into
//! [`BundlerSettings`]. Output location is not part of the passthrough: it
//! always comes from the descriptor's `out` section so the packaging step can
//! find the script.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rolldown::{
    BundlerOptions, GlobalsOutputOption, InputItem, IsExternal, OutputFormat, Platform,
    RawMinifyOptions,
};
use rolldown_common::OutputExports;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};

use crate::options::BuildOptions;
use crate::{Error, GLOBAL_NAME, Result, VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Browser,
    Node,
    Neutral,
}

impl From<TargetPlatform> for Platform {
    fn from(value: TargetPlatform) -> Self {
        match value {
            TargetPlatform::Browser => Platform::Browser,
            TargetPlatform::Node => Platform::Node,
            TargetPlatform::Neutral => Platform::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    Iife,
    #[serde(alias = "es")]
    Esm,
    #[serde(alias = "commonjs")]
    Cjs,
    Umd,
}

impl From<ModuleFormat> for OutputFormat {
    fn from(value: ModuleFormat) -> Self {
        match value {
            ModuleFormat::Iife => OutputFormat::Iife,
            ModuleFormat::Esm => OutputFormat::Esm,
            ModuleFormat::Cjs => OutputFormat::Cjs,
            ModuleFormat::Umd => OutputFormat::Umd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportsMode {
    Auto,
    Default,
    Named,
    None,
}

impl From<ExportsMode> for OutputExports {
    fn from(value: ExportsMode) -> Self {
        match value {
            ExportsMode::Auto => OutputExports::Auto,
            ExportsMode::Default => OutputExports::Default,
            ExportsMode::Named => OutputExports::Named,
            ExportsMode::None => OutputExports::None,
        }
    }
}

/// Fully merged bundler configuration for one build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerSettings {
    /// Entry module, absolute.
    pub input: String,
    pub cwd: PathBuf,
    pub platform: TargetPlatform,
    pub format: ModuleFormat,
    pub minify: bool,
    /// Comment placed on the first line of the output. Accepts either a
    /// string or `{ "js": "..." }`.
    #[serde(default, deserialize_with = "banner_text")]
    pub banner: Option<String>,
    /// Global the IIFE assigns its exports to.
    #[serde(default)]
    pub name: Option<String>,
    /// Extend an existing global instead of replacing it.
    #[serde(default)]
    pub extend: bool,
    pub exports: ExportsMode,
    #[serde(default)]
    pub external: Vec<String>,
    #[serde(default)]
    pub globals: BTreeMap<String, String>,

    #[serde(skip)]
    pub out_dir: PathBuf,
    #[serde(skip)]
    pub entry_file_name: String,

    /// Passthrough keys this tool does not understand.
    #[serde(flatten, skip_serializing)]
    pub unknown: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BannerValue {
    Text(String),
    PerType { js: Option<String> },
}

fn banner_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<BannerValue>::deserialize(deserializer)? {
        Some(BannerValue::Text(text)) => Some(text),
        Some(BannerValue::PerType { js }) => js,
        None => None,
    })
}

/// The comment banner prepended to every bundle.
pub fn banner(options: &BuildOptions) -> String {
    format!(
        "/* {} v{} - Built with SAMMI Next v{VERSION} */",
        options.config.name, options.config.version
    )
}

/// Tool defaults for `options`, before the user's passthrough is applied.
pub fn default_settings(options: &BuildOptions) -> Value {
    let config = &options.config;
    json!({
        "input": config.entry.to_string_lossy(),
        "cwd": options.root_dir.to_string_lossy(),
        "platform": "browser",
        "format": "iife",
        "minify": options.mode.is_production(),
        "banner": banner(options),
        "name": format!("{GLOBAL_NAME}.{}", config.id),
        "extend": true,
        "exports": "named",
        "external": [],
        "globals": {},
    })
}

/// Deep-merge `update` into `target`.
///
/// Objects merge key by key at every level; anything else in `update`,
/// arrays included, replaces the value in `target`.
pub fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

impl BundlerSettings {
    /// Merge the user's passthrough onto the defaults for `options`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if a merged value has the wrong type.
    pub fn resolve(options: &BuildOptions) -> Result<Self> {
        let mut merged = default_settings(options);
        merge_values(
            &mut merged,
            &Value::Object(options.config.bundler_config.clone()),
        );

        let mut settings: BundlerSettings = serde_json::from_value(merged)
            .map_err(|err| Error::InvalidConfig(format!("bundlerConfig: {err}")))?;
        settings.out_dir = options.out_dir();
        settings.entry_file_name = options.config.out.js.clone();

        for key in settings.unknown.keys() {
            match key.as_str() {
                "outDir" | "entry" | "entryFileNames" | "entryFileName" => tracing::warn!(
                    "Ignoring bundlerConfig.{key}; set `out.dir` / `out.js` or `entry` in the descriptor instead"
                ),
                _ => tracing::warn!("Ignoring unsupported bundlerConfig.{key}"),
            }
        }

        tracing::debug!(
            input = %settings.input,
            out_dir = %settings.out_dir.display(),
            minify = settings.minify,
            "resolved bundler settings"
        );

        Ok(settings)
    }

    /// Absolute path of the script this build writes.
    pub fn output_path(&self) -> PathBuf {
        self.out_dir.join(&self.entry_file_name)
    }

    /// Rolldown options for these settings.
    pub fn to_rolldown_options(&self) -> BundlerOptions {
        let mut options = BundlerOptions {
            input: Some(vec![InputItem {
                name: None,
                import: self.input.clone(),
            }]),
            cwd: Some(self.cwd.clone()),
            platform: Some(self.platform.into()),
            format: Some(self.format.into()),
            name: self.name.clone(),
            extend: Some(self.extend),
            exports: Some(self.exports.into()),
            ..Default::default()
        };

        if self.minify {
            options.minify = Some(RawMinifyOptions::from(true));
        }

        // Everything is inlined unless the user lists externals.
        options.external = Some(IsExternal::from(self.external.clone()));

        if !self.globals.is_empty() {
            let globals: FxHashMap<String, String> = self
                .globals
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            options.globals = Some(GlobalsOutputOption::from(globals));
        }

        options
    }
}
