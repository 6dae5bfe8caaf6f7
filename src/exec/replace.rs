// src/exec/replace.rs

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use crate::errors::ReloadError;

/// Replace the current process image with `exe`, passing `exe` as `argv[0]`
/// followed by `args`. The environment is inherited unchanged.
///
/// On success this never returns and the PID is kept.
#[cfg(unix)]
pub fn replace_process<I>(exe: &Path, args: I) -> ReloadError
where
    I: IntoIterator<Item = OsString>,
{
    use std::os::unix::process::CommandExt;

    let source = Command::new(exe).arg0(exe).args(args).exec();
    ReloadError::Replacement {
        path: exe.to_path_buf(),
        source,
    }
}

/// Without `exec(2)` the best we can do is start a new instance and exit.
/// Unlike the Unix path this gives the new process a different PID.
#[cfg(not(unix))]
pub fn replace_process<I>(exe: &Path, args: I) -> ReloadError
where
    I: IntoIterator<Item = OsString>,
{
    match Command::new(exe).args(args).spawn() {
        Ok(_child) => std::process::exit(0),
        Err(source) => ReloadError::Replacement {
            path: exe.to_path_buf(),
            source,
        },
    }
}
