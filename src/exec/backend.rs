// src/exec/backend.rs

//! Pluggable restart action.
//!
//! The event loop talks to a `Restarter` instead of calling exec directly,
//! so tests can count restarts without replacing the test process.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use tracing::{debug, error, info};

use crate::context::ReloadContext;
use crate::errors::ReloadError;
use crate::exec::replace::replace_process;
use crate::resolve::resolve_self;
use crate::sink::{LogSink, SharedSink};

pub trait Restarter: Send + Sync {
    /// Restart the process. Production implementations do not return.
    fn restart(&self, ctx: &ReloadContext);
}

/// Replaces the current process image with a fresh copy of its binary,
/// keeping `argv[1..]` and the environment.
///
/// Failure is fatal: the message goes to the sink (if any) and stderr, and
/// the process exits with status 1. There is no retry.
#[derive(Clone, Default)]
pub struct ExecRestarter {
    sink: Option<SharedSink>,
}

impl fmt::Debug for ExecRestarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecRestarter")
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl ExecRestarter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(sink: SharedSink) -> Self {
        Self { sink: Some(sink) }
    }

    /// Replace the process, exiting on failure.
    pub fn exec(&self, ctx: &ReloadContext) -> ! {
        let err = self.try_exec(ctx, std::env::args_os().skip(1));
        self.fatal(err)
    }

    /// Close the watcher and replace the process image.
    ///
    /// Only returns if something went wrong; the returned error says what.
    pub fn try_exec<I>(&self, ctx: &ReloadContext, args: I) -> ReloadError
    where
        I: IntoIterator<Item = OsString>,
    {
        let exe: PathBuf = match ctx.self_path() {
            Some(path) => path.to_path_buf(),
            None => match resolve_self() {
                Ok(path) => path,
                Err(err) => return err,
            },
        };

        if ctx.close_watcher() {
            debug!("closed watcher before replacing process image");
        }

        info!(exe = %exe.display(), "replacing process image");
        replace_process(&exe, args)
    }

    fn fatal(&self, err: ReloadError) -> ! {
        let message = match &err {
            ReloadError::Resolution { .. } => format!("cannot restart: cannot find self: {err}"),
            _ => err.to_string(),
        };

        if let Some(sink) = &self.sink {
            sink.log(format_args!("{message}"));
        }
        error!(error = %err, "process replacement failed");
        eprintln!("selfreload: {message}");
        std::process::exit(1)
    }
}

impl Restarter for ExecRestarter {
    fn restart(&self, ctx: &ReloadContext) {
        self.exec(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[cfg(unix)]
    #[test]
    fn failed_exec_reports_error_after_closing_watcher() {
        let ctx = ReloadContext::new();
        ctx.set_self_path(PathBuf::from("/nonexistent/selfreload-test-binary"));

        let closed = Arc::new(AtomicBool::new(false));
        let c = Arc::clone(&closed);
        ctx.install_closer(move || c.store(true, Ordering::SeqCst));

        let err = ExecRestarter::new().try_exec(&ctx, Vec::<OsString>::new());

        assert!(closed.load(Ordering::SeqCst));
        assert!(!ctx.has_watcher());
        match err {
            ReloadError::Replacement { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/selfreload-test-binary"));
            }
            other => panic!("expected Replacement error, got {other:?}"),
        }
    }
}
