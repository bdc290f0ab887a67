//! Integration tests for the build pipeline with a stand-in bundler.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sammi_bundler::{BuildMode, BuildOptions, BundledScript, BundlerSettings, ExtensionBundler};
use sammi_cli::CliError;
use sammi_cli::commands::build::build_once;
use sammi_config::{ResolvedExtensionConfig, ResolvedOut};
use tempfile::TempDir;

const SCRIPT: &str = "(function(){var main_exports={};__export(main_exports, { default: () => main });SAMMIExtensions.demo=main_exports;})();";

/// Writes a fixed script where the real bundler would.
#[derive(Default)]
struct FixedBundler {
    calls: AtomicUsize,
}

#[async_trait]
impl ExtensionBundler for FixedBundler {
    async fn bundle(&self, settings: &BundlerSettings) -> sammi_bundler::Result<BundledScript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        fs::create_dir_all(&settings.out_dir)?;
        let path = settings.output_path();
        fs::write(&path, SCRIPT)?;
        Ok(BundledScript {
            path,
            size: SCRIPT.len(),
        })
    }
}

/// Fails like an unresolvable import would.
struct FailingBundler;

#[async_trait]
impl ExtensionBundler for FailingBundler {
    async fn bundle(&self, _settings: &BundlerSettings) -> sammi_bundler::Result<BundledScript> {
        Err(sammi_bundler::Error::InvalidConfig("entry could not be bundled".into()))
    }
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/script.js"), "export default function main() {}").unwrap();
    fs::write(root.join("external.html"), "<p>hi</p>").unwrap();
    fs::write(root.join("over.json"), "{ \"b\": 1 }").unwrap();
    dir
}

fn options(root: &Path, mode: BuildMode) -> BuildOptions {
    let config = ResolvedExtensionConfig {
        id: "demo".into(),
        name: "Demo".into(),
        info: String::new(),
        version: "1.0.0".into(),
        entry: root.join("src/script.js"),
        external: Some(root.join("external.html")),
        over: Some(root.join("over.json")),
        out: ResolvedOut::default(),
        bundler_config: Default::default(),
    };
    BuildOptions::new(config, root, mode)
}

#[tokio::test]
async fn production_build_writes_every_artifact() {
    let dir = project();
    let options = options(dir.path(), BuildMode::Production);
    let bundler = FixedBundler::default();

    build_once(&options, &bundler).await.unwrap();

    assert_eq!(bundler.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fs::read_to_string(options.js_path()).unwrap(), SCRIPT);

    let sef = fs::read_to_string(options.sef_path()).unwrap();
    assert!(sef.starts_with("[extension_name]\nDemo\n"));
    assert!(sef.contains("[insert_command]\nSAMMIExtensions.demo.default()\n"));
    assert!(sef.contains("[insert_over]\n{\"b\":1}\n"));

    let preview = fs::read_to_string(options.preview_path()).unwrap();
    assert!(preview.contains("<p>hi</p>"));
    assert!(preview.contains(SCRIPT));
}

#[tokio::test]
async fn dev_build_keeps_the_over_file_verbatim() {
    let dir = project();
    let options = options(dir.path(), BuildMode::Dev);

    build_once(&options, &FixedBundler::default()).await.unwrap();

    let sef = fs::read_to_string(options.sef_path()).unwrap();
    assert!(sef.contains("[insert_over]\n{ \"b\": 1 }\n"));
}

#[tokio::test]
async fn rebuilding_is_idempotent() {
    let dir = project();
    let options = options(dir.path(), BuildMode::Production);
    let bundler = FixedBundler::default();

    build_once(&options, &bundler).await.unwrap();
    let first = (
        fs::read(options.sef_path()).unwrap(),
        fs::read(options.preview_path()).unwrap(),
    );

    build_once(&options, &bundler).await.unwrap();
    let second = (
        fs::read(options.sef_path()).unwrap(),
        fs::read(options.preview_path()).unwrap(),
    );

    assert_eq!(first, second);
}

#[tokio::test]
async fn bundling_failure_skips_packaging() {
    let dir = project();
    let options = options(dir.path(), BuildMode::Production);

    let err = build_once(&options, &FailingBundler).await.unwrap_err();

    assert!(matches!(err, CliError::Bundler(_)));
    assert!(!options.sef_path().exists());
    assert!(!options.preview_path().exists());
}

#[tokio::test]
async fn invalid_over_fails_the_production_build() {
    let dir = project();
    fs::write(dir.path().join("over.json"), "{ not json").unwrap();
    let options = options(dir.path(), BuildMode::Production);

    let err = build_once(&options, &FixedBundler::default()).await.unwrap_err();

    assert!(matches!(
        err,
        CliError::Bundler(sammi_bundler::Error::OverInvalid { .. })
    ));
    assert!(options.js_path().exists());
    assert!(!options.sef_path().exists());
}
