//! The bundling step.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use rolldown::{BundlerBuilder as RolldownBundlerBuilder, BundlerOptions};
use rolldown_common::Output;

use crate::settings::BundlerSettings;
use crate::{Error, Result};

/// The script a bundling step wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledScript {
    pub path: PathBuf,
    pub size: usize,
}

/// Compiles an extension entry into a single browser script.
///
/// Implementations write the script to [`BundlerSettings::output_path`]; the
/// packaging step reads it back from there.
#[async_trait]
pub trait ExtensionBundler: Send + Sync {
    async fn bundle(&self, settings: &BundlerSettings) -> Result<BundledScript>;
}

/// Bundles with Rolldown.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolldownBundler;

#[async_trait]
impl ExtensionBundler for RolldownBundler {
    async fn bundle(&self, settings: &BundlerSettings) -> Result<BundledScript> {
        let code = generate_entry_chunk(settings.to_rolldown_options()).await?;

        let script = match settings.banner.as_deref() {
            Some(banner) if !banner.is_empty() => format!("{banner}\n{code}"),
            _ => code,
        };

        fs::create_dir_all(&settings.out_dir).map_err(|err| {
            Error::io(
                format!(
                    "Failed to create output directory '{}'",
                    settings.out_dir.display()
                ),
                err,
            )
        })?;

        let path = settings.output_path();
        fs::write(&path, &script)
            .map_err(|err| Error::io(format!("Failed to write '{}'", path.display()), err))?;

        Ok(BundledScript {
            path,
            size: script.len(),
        })
    }
}

/// Run Rolldown in memory and return the code of the entry chunk.
pub(crate) async fn generate_entry_chunk(options: BundlerOptions) -> Result<String> {
    let input = options
        .input
        .as_ref()
        .and_then(|items| items.first())
        .map(|item| item.import.clone())
        .unwrap_or_default();

    let mut bundler = RolldownBundlerBuilder::default()
        .with_options(options)
        .build()
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    let bundle = bundler
        .generate()
        .await
        .map_err(|e| Error::from_rolldown_batch(&e))?;

    let mut entry = None;
    for output in bundle.assets {
        match output {
            Output::Chunk(chunk) if chunk.is_entry && entry.is_none() => {
                entry = Some(chunk.code.clone());
            }
            Output::Chunk(chunk) => {
                tracing::debug!("Ignoring extra chunk {}", chunk.filename);
            }
            Output::Asset(asset) => {
                tracing::debug!("Ignoring emitted asset {}", asset.filename);
            }
        }
    }

    entry.ok_or(Error::NoEntryChunk(input))
}
