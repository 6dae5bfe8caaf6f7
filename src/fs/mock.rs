// src/fs/mock.rs

use super::FileSystem;
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// In-memory filesystem for validation tests.
///
/// Relative paths are made absolute against a fixed working directory.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    cwd: PathBuf,
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl MockFileSystem {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let fs = Self {
            cwd: cwd.clone(),
            entries: Arc::new(Mutex::new(HashMap::new())),
        };
        fs.add_dir(&cwd);
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = self.join_cwd(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_dir(parent);
        }
        self.insert(path, MockEntry::File);
    }

    /// Add a directory and all of its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = self.join_cwd(path.as_ref());
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.insert(ancestor.to_path_buf(), MockEntry::Dir);
        }
    }

    fn insert(&self, path: PathBuf, entry: MockEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(path, entry);
    }

    fn get(&self, path: &Path) -> Option<MockEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(&self.join_cwd(path)).copied()
    }

    fn join_cwd(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.get(path).is_some()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.get(path) == Some(MockEntry::Dir)
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf> {
        Ok(self.join_cwd(path))
    }
}
