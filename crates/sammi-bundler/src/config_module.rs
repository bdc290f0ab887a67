//! Loading of `sammi.config.{mjs,js,mts,ts}`.
//!
//! The config module is bundled with Rolldown into a script that assigns its
//! exports to a global, then evaluated with Boa. Imports of the
//! `sammi-next/config` helper are served by an in-memory shim so configs
//! written as `export default defineConfig({ ... })` work without
//! `node_modules`.

use std::path::Path;

use async_trait::async_trait;
use rolldown::{BundlerOptions, GlobalsOutputOption, InputItem, IsExternal, OutputFormat, Platform};
use rolldown_common::OutputExports;
use rustc_hash::FxHashMap;
use sammi_config::{ConfigError, ModuleLoader, eval};
use serde_json::Value;

use crate::bundler::generate_entry_chunk;

const CONFIG_GLOBAL: &str = "__sammi_config__";
const HELPER_GLOBAL: &str = "__sammi_next_config__";
const HELPER_MODULES: [&str; 2] = ["sammi-next/config", "sammi-next"];
const HELPER_SHIM: &str =
    "var __sammi_next_config__ = { defineConfig: function (config) { return config; } };";

/// [`ModuleLoader`] backed by Rolldown and Boa.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolldownModuleLoader;

impl RolldownModuleLoader {
    fn options(path: &Path) -> BundlerOptions {
        let helpers: Vec<String> = HELPER_MODULES.iter().map(|m| m.to_string()).collect();
        let globals: FxHashMap<String, String> = HELPER_MODULES
            .iter()
            .map(|m| (m.to_string(), HELPER_GLOBAL.to_string()))
            .collect();

        BundlerOptions {
            input: Some(vec![InputItem {
                name: None,
                import: path.to_string_lossy().into_owned(),
            }]),
            cwd: path.parent().map(Path::to_path_buf),
            platform: Some(Platform::Neutral),
            format: Some(OutputFormat::Iife),
            name: Some(CONFIG_GLOBAL.to_string()),
            exports: Some(OutputExports::Named),
            external: Some(IsExternal::from(helpers)),
            globals: Some(GlobalsOutputOption::from(globals)),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ModuleLoader for RolldownModuleLoader {
    async fn load_module(&self, path: &Path) -> sammi_config::Result<Value> {
        tracing::debug!("Bundling config module: {}", path.display());

        let code = generate_entry_chunk(Self::options(path))
            .await
            .map_err(|err| ConfigError::load(path, err))?;

        let script = format!("{HELPER_SHIM}\n{code}");
        eval::evaluate_default_export(&script, CONFIG_GLOBAL, path)
    }
}
