// src/resolve.rs

//! Locating the running executable.
//!
//! The invocation argument wins when it is already absolute, so a process
//! started as `/tmp/build/server` keeps watching exactly that path even if
//! the OS would report a different (e.g. symlink-resolved) location.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{ReloadError, Result};

/// Resolve the absolute path of the currently running binary from the real
/// process state (`argv[0]` and [`std::env::current_exe`]).
pub fn resolve_self() -> Result<PathBuf> {
    resolve_self_from(std::env::args_os().next(), std::env::current_exe)
}

/// Resolve the binary path from an explicit invocation argument, querying
/// `current_exe` only when `arg0` is missing or relative.
pub fn resolve_self_from<F>(arg0: Option<OsString>, current_exe: F) -> Result<PathBuf>
where
    F: FnOnce() -> io::Result<PathBuf>,
{
    if let Some(arg0) = arg0.as_deref().map(Path::new) {
        if arg0.is_absolute() {
            return Ok(arg0.to_path_buf());
        }
    }

    current_exe().map_err(|source| ReloadError::Resolution {
        arg0: arg0
            .map(|a| a.to_string_lossy().into_owned())
            .unwrap_or_default(),
        source,
    })
}

/// Render `path` relative to the current working directory for display.
///
/// Paths under the cwd print as `./rest`; anything else is shown unchanged.
pub fn relpath(path: &Path) -> String {
    match std::env::current_dir() {
        Ok(cwd) => relpath_from(&cwd, path),
        Err(_) => path.display().to_string(),
    }
}

pub fn relpath_from(cwd: &Path, path: &Path) -> String {
    match path.strip_prefix(cwd) {
        Ok(rest) if rest.as_os_str().is_empty() => ".".to_string(),
        Ok(rest) => format!("./{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}
