use std::path::{Path, PathBuf};

use sammi_config::ResolvedExtensionConfig;

use crate::artifacts::PREVIEW_FILE;
use crate::mode::BuildMode;

/// Everything one build cycle needs.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub config: ResolvedExtensionConfig,
    pub root_dir: PathBuf,
    pub mode: BuildMode,
}

impl BuildOptions {
    pub fn new(config: ResolvedExtensionConfig, root_dir: impl AsRef<Path>, mode: BuildMode) -> Self {
        Self {
            config,
            root_dir: root_dir.as_ref().to_path_buf(),
            mode,
        }
    }

    pub fn out_dir(&self) -> PathBuf {
        self.config.out_dir(&self.root_dir)
    }

    /// Where the bundler writes the script.
    pub fn js_path(&self) -> PathBuf {
        self.config.js_path(&self.root_dir)
    }

    pub fn sef_path(&self) -> PathBuf {
        self.config.sef_path(&self.root_dir)
    }

    pub fn preview_path(&self) -> PathBuf {
        self.out_dir().join(PREVIEW_FILE)
    }
}
