//! Dev mode: watch the sources and rebuild on change.
//!
//! - [`FileWatcher`] turns notify events into [`FileChange`]s
//! - [`WatchController`] debounces them and runs one [`Rebuild`] at a time
//! - [`watch`] wires both to the real build pipeline until Ctrl+C

mod controller;
mod watcher;

use std::sync::Arc;

use async_trait::async_trait;
use sammi_bundler::{BuildOptions, ExtensionBundler};

pub use controller::{DEBOUNCE, Rebuild, WatchController, WatchState};
pub use watcher::{FileChange, FileWatcher, IgnoreRules, WatchScope};

use crate::commands::build::build_once;
use crate::error::Result;
use crate::ui;

/// Rebuilds with an already resolved config.
pub struct PipelineRebuild {
    options: BuildOptions,
    bundler: Arc<dyn ExtensionBundler>,
}

impl PipelineRebuild {
    pub fn new(options: BuildOptions, bundler: Arc<dyn ExtensionBundler>) -> Self {
        Self { options, bundler }
    }
}

#[async_trait]
impl Rebuild for PipelineRebuild {
    async fn rebuild(&self) -> Result<()> {
        build_once(&self.options, self.bundler.as_ref()).await
    }
}

/// Watch the extension's sources and rebuild until interrupted.
pub async fn watch(options: BuildOptions, bundler: Arc<dyn ExtensionBundler>) -> Result<()> {
    let paths = options.config.watch_paths();
    let ignore = IgnoreRules::new(options.out_dir(), &paths);
    let (watcher, changes) = FileWatcher::new(&paths, ignore)?;

    ui::watching();
    tracing::debug!(paths = ?watcher.paths(), "watch started");

    let controller = WatchController::new(PipelineRebuild::new(options, bundler));
    controller.run(changes, shutdown_signal()).await?;

    drop(watcher);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {err}");
        std::future::pending::<()>().await;
    }
}
