//! File system watcher for dev mode.
//!
//! Forwards create, modify and remove events for the watched paths into a
//! channel. Debouncing happens in the [`WatchController`](super::WatchController).

use std::path::{Component, Path, PathBuf};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

const CHANNEL_CAPACITY: usize = 100;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Created(p) | FileChange::Modified(p) | FileChange::Removed(p) => p,
        }
    }

    /// Short event name for the console.
    pub fn kind(&self) -> &'static str {
        match self {
            FileChange::Created(_) => "add",
            FileChange::Modified(_) => "change",
            FileChange::Removed(_) => "unlink",
        }
    }

    fn from_event(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// Paths whose changes never trigger a rebuild.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    out_dir: Option<PathBuf>,
    roots: Vec<PathBuf>,
}

impl IgnoreRules {
    /// Ignore the build output under `out_dir`, plus `node_modules` and
    /// hidden entries below any of `roots`. An output directory that
    /// contains a root is not ignored.
    pub fn new(out_dir: impl Into<PathBuf>, roots: &[PathBuf]) -> Self {
        let out_dir = out_dir.into();
        let out_dir = (!roots.iter().any(|root| root.starts_with(&out_dir))).then_some(out_dir);
        Self {
            out_dir,
            roots: roots.to_vec(),
        }
    }

    pub fn should_ignore(&self, path: &Path) -> bool {
        if self.out_dir.as_ref().is_some_and(|out| path.starts_with(out)) {
            return true;
        }

        let relative = self
            .roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
            .unwrap_or(path);

        relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                name == "node_modules" || name.starts_with('.')
            }
            _ => false,
        })
    }
}

/// Decides which event paths reach the channel.
///
/// Single files are watched through their parent directory so a save that
/// replaces the file (write to a temp file, then rename) keeps being seen.
/// Siblings of a watched file are dropped.
#[derive(Debug, Clone)]
pub struct WatchScope {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
    ignore: IgnoreRules,
}

impl WatchScope {
    pub fn new(dirs: Vec<PathBuf>, files: Vec<PathBuf>, ignore: IgnoreRules) -> Self {
        Self { dirs, files, ignore }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        if self.files.iter().any(|file| file == path) {
            return true;
        }
        self.dirs.iter().any(|dir| path.starts_with(dir)) && !self.ignore.should_ignore(path)
    }

    /// What to register with the platform watcher. A file's parent is
    /// skipped when a recursively watched directory already covers it.
    pub fn targets(&self) -> Vec<(PathBuf, RecursiveMode)> {
        let mut targets: Vec<(PathBuf, RecursiveMode)> = self
            .dirs
            .iter()
            .map(|dir| (dir.clone(), RecursiveMode::Recursive))
            .collect();

        for file in &self.files {
            let Some(parent) = file.parent() else {
                continue;
            };
            let covered = targets.iter().any(|(target, mode)| match mode {
                RecursiveMode::Recursive => parent.starts_with(target),
                RecursiveMode::NonRecursive => parent == target,
            });
            if !covered {
                targets.push((parent.to_path_buf(), RecursiveMode::NonRecursive));
            }
        }
        targets
    }
}

/// Watches the given files and directories until dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    paths: Vec<PathBuf>,
}

impl FileWatcher {
    /// Start watching `paths`. Directories are watched recursively, files
    /// through their parent directory.
    ///
    /// # Errors
    ///
    /// Returns `CliError::FileNotFound` for a path that does not exist, or
    /// `CliError::Watch` if the platform watcher fails.
    pub fn new(paths: &[PathBuf], ignore: IgnoreRules) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if let Some(missing) = paths.iter().find(|path| !path.exists()) {
            return Err(CliError::FileNotFound(missing.clone()));
        }

        let (dirs, files): (Vec<PathBuf>, Vec<PathBuf>) =
            paths.iter().cloned().partition(|path| path.is_dir());
        let scope = WatchScope::new(dirs, files, ignore);
        let targets = scope.targets();

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("File watcher error: {err}");
                    return;
                }
            };

            for path in event.paths {
                if !scope.accepts(&path) {
                    continue;
                }
                if let Some(change) = FileChange::from_event(&event.kind, path) {
                    // Closed receiver means the watch loop has ended.
                    if tx.blocking_send(change).is_err() {
                        return;
                    }
                }
            }
        })?;

        for (target, mode) in &targets {
            watcher.watch(target, *mode)?;
            tracing::debug!("Watching {} ({mode:?})", target.display());
        }

        Ok((
            Self {
                _watcher: watcher,
                paths: paths.to_vec(),
            },
            rx,
        ))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}
