//! The build pipeline: bundle, then write the SEF and the preview page.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use sammi_bundler::artifacts::{self, PREVIEW_FILE};
use sammi_bundler::{BuildMode, BuildOptions, BundlerSettings, ExtensionBundler, RolldownBundler, VERSION};

use crate::cli::{BuildArgs, BuildFlags};
use crate::commands::utils;
use crate::dev;
use crate::error::Result;
use crate::ui;

/// Execute the root command. Builds in production mode unless `--mode`
/// says otherwise.
pub async fn execute(args: BuildArgs) -> Result<()> {
    run(args.root.as_deref(), &args.flags, BuildMode::Production).await
}

/// Load the config in `root` and build. `default_mode` applies when `--mode`
/// is absent.
pub(crate) async fn run(root: Option<&Path>, flags: &BuildFlags, default_mode: BuildMode) -> Result<()> {
    let mode = flags.mode_or(default_mode)?;
    let root = utils::resolve_root(root)?;
    let options = utils::load_build_options(&root, flags, mode).await?;
    build_extension(options, Arc::new(RolldownBundler)).await
}

/// Build once. In dev mode, keep watching and rebuilding afterwards.
pub async fn build_extension(options: BuildOptions, bundler: Arc<dyn ExtensionBundler>) -> Result<()> {
    ui::build_header(VERSION, &options.config.name, options.mode);

    build_once(&options, bundler.as_ref()).await?;

    match options.mode {
        BuildMode::Dev => dev::watch(options, bundler).await,
        BuildMode::Production => Ok(()),
    }
}

/// Run the pipeline once: bundle, then write the SEF, then the preview.
///
/// Each step runs only after the previous one succeeded; a failure leaves
/// earlier artifacts of the previous build in place.
pub async fn build_once(options: &BuildOptions, bundler: &dyn ExtensionBundler) -> Result<()> {
    let started = Instant::now();
    let result = run_steps(options, bundler, started).await;
    if result.is_err() {
        ui::build_failed(started.elapsed());
    }
    result
}

async fn run_steps(options: &BuildOptions, bundler: &dyn ExtensionBundler, started: Instant) -> Result<()> {
    let settings = BundlerSettings::resolve(options)?;
    let script = bundler.bundle(&settings).await?;
    tracing::debug!(path = %script.path.display(), size = script.size, "bundled");
    let bundled = Instant::now();
    ui::built(&options.config.out.js, bundled - started);

    let sef = artifacts::generate_sef(options)?;
    artifacts::write_artifact(&options.sef_path(), &sef)?;
    let packaged = Instant::now();
    ui::built(&options.config.out.sef, packaged - bundled);

    let preview = artifacts::generate_preview(options)?;
    artifacts::write_artifact(&options.preview_path(), &preview)?;
    ui::built(PREVIEW_FILE, packaged.elapsed());

    Ok(())
}
