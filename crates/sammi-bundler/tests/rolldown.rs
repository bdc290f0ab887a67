//! End-to-end runs through Rolldown (and Boa for config modules).

use std::fs;
use std::path::Path;

use sammi_bundler::{
    BuildMode, BuildOptions, BundlerSettings, Error, ExtensionBundler, RolldownBundler,
    RolldownModuleLoader, artifacts,
};
use sammi_config::{ConfigDiscovery, ModuleLoader, ResolvedExtensionConfig, ResolvedOut};
use serde_json::json;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn options(root: &Path, mode: BuildMode) -> BuildOptions {
    let config = ResolvedExtensionConfig {
        id: "demo".into(),
        name: "Demo".into(),
        info: "A demo".into(),
        version: "1.0.0".into(),
        entry: root.join("src/main.js"),
        external: None,
        over: None,
        out: ResolvedOut::default(),
        bundler_config: Default::default(),
    };
    BuildOptions::new(config, root, mode)
}

#[tokio::test(flavor = "multi_thread")]
async fn bundles_entry_into_banner_prefixed_iife() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/greet.js", "export const greet = (n) => `hi ${n}`;\n");
    write(
        dir.path(),
        "src/main.js",
        "import { greet } from './greet.js';\nexport default function main() { return greet('sammi'); }\n",
    );
    let options = options(dir.path(), BuildMode::Dev);

    let settings = BundlerSettings::resolve(&options).unwrap();
    let script = RolldownBundler.bundle(&settings).await.unwrap();

    assert_eq!(script.path, dir.path().join("dist/extension.js"));
    let code = fs::read_to_string(&script.path).unwrap();
    assert!(code.starts_with("/* Demo v1.0.0 - Built with SAMMI Next v"));
    assert!(code.contains("SAMMIExtensions"));
    assert!(code.contains("hi "));
    assert_eq!(script.size, code.len());

    let built = artifacts::generate(&options).unwrap();
    assert!(built.sef.contains("[extension_info]\nA demo\n\n"));
    assert!(built.sef.contains(&code));
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_relative_import_is_a_bundler_error() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/main.js", "import x from './missing.js';\nexport default x;\n");
    let options = options(dir.path(), BuildMode::Production);

    let settings = BundlerSettings::resolve(&options).unwrap();
    let err = RolldownBundler.bundle(&settings).await.unwrap_err();

    assert!(matches!(err, Error::Bundler(_)), "got {err:?}");
    assert!(!dir.path().join("dist/extension.js").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn loads_module_config_with_define_config() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "sammi.config.ts",
        r#"import { defineConfig } from "sammi-next/config";

const version: string = "2.0.0";

export default defineConfig({
    id: "demo",
    name: "Demo",
    version,
    entry: "src/main.ts",
    bundlerConfig: { minify: false },
});
"#,
    );

    let value = RolldownModuleLoader
        .load_module(&dir.path().join("sammi.config.ts"))
        .await
        .unwrap();

    assert_eq!(
        value,
        json!({
            "id": "demo",
            "name": "Demo",
            "version": "2.0.0",
            "entry": "src/main.ts",
            "bundlerConfig": { "minify": false },
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn discovery_prefers_module_configs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "sammi.config.json", r#"{ "id": "from-json" }"#);
    write(dir.path(), "sammi.config.mjs", "export default { id: 'from-module' };\n");

    let (path, raw) = ConfigDiscovery::new(dir.path())
        .load_raw(Some(&RolldownModuleLoader))
        .await
        .unwrap();

    assert!(path.ends_with("sammi.config.mjs"));
    assert_eq!(raw["id"], "from-module");
}
