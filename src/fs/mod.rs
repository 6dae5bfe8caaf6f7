// src/fs/mod.rs

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// The slice of filesystem state needed to validate watch targets.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// Make `path` absolute against the current working directory without
    /// resolving symlinks. Change events are reported under the path the
    /// directory was registered with, so it must not be canonicalized.
    fn absolute(&self, path: &Path) -> Result<PathBuf>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        std::path::absolute(path).with_context(|| format!("making {:?} absolute", path))
    }
}
