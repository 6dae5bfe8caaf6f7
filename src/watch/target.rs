// src/watch/target.rs

//! Watch targets: the self binary plus caller-supplied directories.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{ReloadError, Result};
use crate::fs::FileSystem;

/// Work to run when an additional directory changes.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// What happens when a target's change qualifies.
#[derive(Clone)]
pub enum DirAction {
    /// Run a caller-supplied callback (e.g. reload templates).
    Callback(Callback),
    /// Restart the whole process.
    Restart,
}

impl fmt::Debug for DirAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirAction::Callback(_) => f.write_str("Callback(..)"),
            DirAction::Restart => f.write_str("Restart"),
        }
    }
}

/// An additional directory to watch, as supplied by the caller.
///
/// Directories are watched non-recursively; changes in subdirectories are
/// not reported.
///
/// Changes are attributed by whole path components: `templates` fires for
/// `templates/index.html` but not for `templates2/index.html`, even when
/// both directories are watched.
#[derive(Debug, Clone)]
pub struct WatchDir {
    pub path: PathBuf,
    pub action: DirAction,
}

impl WatchDir {
    pub fn new<F>(path: impl Into<PathBuf>, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            action: DirAction::Callback(Arc::new(callback)),
        }
    }

    /// Restart the process whenever this directory changes.
    pub fn restart(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            action: DirAction::Restart,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    SelfBinary,
    AdditionalDir,
}

/// A resolved, absolute watch target.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    path: PathBuf,
    kind: TargetKind,
    action: DirAction,
}

impl WatchTarget {
    pub fn self_binary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::SelfBinary,
            action: DirAction::Restart,
        }
    }

    pub fn additional(path: impl Into<PathBuf>, action: DirAction) -> Self {
        Self {
            path: path.into(),
            kind: TargetKind::AdditionalDir,
            action,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> TargetKind {
        self.kind
    }

    pub fn action(&self) -> &DirAction {
        &self.action
    }

    /// The directory registered with the notifier for this target.
    ///
    /// For the binary this is its parent: rebuilds usually rename a new file
    /// over the old name, which only the directory reports.
    pub fn watch_dir(&self) -> &Path {
        match self.kind {
            TargetKind::SelfBinary => self.path.parent().unwrap_or(&self.path),
            TargetKind::AdditionalDir => &self.path,
        }
    }

    /// Whether a change at `path` belongs to this target.
    pub fn matches(&self, path: &Path) -> bool {
        match self.kind {
            TargetKind::SelfBinary => path == self.path,
            TargetKind::AdditionalDir => path.starts_with(&self.path),
        }
    }
}

/// Validate caller-supplied directories and resolve them to absolute paths.
///
/// Fails on the first directory that does not exist or is not a directory;
/// nothing is registered anywhere by this function.
pub fn resolve_dirs(fs: &dyn FileSystem, dirs: Vec<WatchDir>) -> Result<Vec<WatchTarget>> {
    dirs.into_iter()
        .map(|dir| -> Result<WatchTarget> {
            let abs = fs
                .absolute(&dir.path)
                .map_err(|err| ReloadError::InvalidPath {
                    path: dir.path.clone(),
                    reason: format!("{err:#}"),
                })?;

            if !fs.exists(&abs) {
                return Err(ReloadError::NotFound { path: dir.path });
            }
            if !fs.is_dir(&abs) {
                return Err(ReloadError::NotADirectory { path: dir.path });
            }

            Ok(WatchTarget::additional(abs, dir.action))
        })
        .collect()
}
