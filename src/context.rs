// src/context.rs

//! Process-wide reload state.
//!
//! Holds the resolved self-binary path and the handle that closes the active
//! watcher. Both are written once by the watcher start-up and read by the
//! restart path, which may run on another task or thread. A replaced process
//! starts from a fresh, empty context.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::debug;

type Closer = Box<dyn FnOnce() + Send>;

#[derive(Clone, Default)]
pub struct ReloadContext {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    self_path: OnceLock<PathBuf>,
    closer: Mutex<Option<Closer>>,
}

impl fmt::Debug for ReloadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadContext")
            .field("self_path", &self.self_path())
            .field("has_watcher", &self.has_watcher())
            .finish()
    }
}

impl ReloadContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context shared by [`crate::spawn_reloader`] and [`crate::exec`].
    pub fn global() -> &'static ReloadContext {
        static GLOBAL: OnceLock<ReloadContext> = OnceLock::new();
        GLOBAL.get_or_init(ReloadContext::new)
    }

    pub fn self_path(&self) -> Option<&Path> {
        self.inner.self_path.get().map(PathBuf::as_path)
    }

    /// Record the resolved binary path. The first value wins.
    pub(crate) fn set_self_path(&self, path: PathBuf) -> &Path {
        if let Err(rejected) = self.inner.self_path.set(path) {
            debug!(
                ?rejected,
                existing = ?self.inner.self_path.get(),
                "self path already set; keeping existing value"
            );
        }
        self.inner
            .self_path
            .get()
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(""))
    }

    /// Register the action that releases the watcher's resources.
    ///
    /// A previously installed closer is run first, so at most one watcher is
    /// ever attached to a context.
    pub fn install_closer<F>(&self, closer: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let previous = self.lock_closer().replace(Box::new(closer));
        if let Some(previous) = previous {
            debug!("replacing previously installed watcher closer");
            previous();
        }
    }

    /// Close the active watcher, if any. Returns whether one was closed.
    pub fn close_watcher(&self) -> bool {
        let closer = self.lock_closer().take();
        match closer {
            Some(close) => {
                close();
                true
            }
            None => false,
        }
    }

    pub fn has_watcher(&self) -> bool {
        self.lock_closer().is_some()
    }

    fn lock_closer(&self) -> std::sync::MutexGuard<'_, Option<Closer>> {
        self.inner
            .closer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
