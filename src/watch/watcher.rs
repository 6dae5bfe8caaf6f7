// src/watch/watcher.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::context::ReloadContext;
use crate::errors::{ReloadError, Result};
use crate::exec::{ExecRestarter, Restarter};
use crate::fs::{FileSystem, RealFileSystem};
use crate::platform::{ChangeOp, PlatformFamily};
use crate::resolve::{relpath, resolve_self};
use crate::sink::{LogSink, SharedSink};
use crate::watch::dispatch::Dispatcher;
use crate::watch::event_loop::{EventLoop, NotifyMessage};
use crate::watch::target::{WatchDir, WatchTarget, resolve_dirs};

/// Delay between a qualifying event and its action, giving the writer time
/// to finish.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct ReloadOptions {
    pub grace_period: Duration,
    pub platform: PlatformFamily,
    /// Fire on this operation instead of the platform default. Useful on
    /// Linux when the build tool links or renames the new binary into place,
    /// which is reported as a create rather than a write.
    pub trigger: Option<ChangeOp>,
}

impl Default for ReloadOptions {
    fn default() -> Self {
        Self {
            grace_period: DEFAULT_GRACE_PERIOD,
            platform: PlatformFamily::current(),
            trigger: None,
        }
    }
}

/// Builder for the self-reload watcher.
///
/// ```no_run
/// # async fn demo() -> selfreload::errors::Result<()> {
/// use selfreload::{Reloader, WatchDir};
///
/// let handle = Reloader::new(|args: std::fmt::Arguments<'_>| eprintln!("{args}"))
///     .dir(WatchDir::new("templates", || println!("reload templates")))
///     .spawn()?;
/// handle.wait().await
/// # }
/// ```
pub struct Reloader {
    sink: SharedSink,
    dirs: Vec<WatchDir>,
    options: ReloadOptions,
    ctx: ReloadContext,
    restarter: Option<Arc<dyn Restarter>>,
    fs: Arc<dyn FileSystem>,
    binary: Option<PathBuf>,
}

impl fmt::Debug for Reloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reloader")
            .field("dirs", &self.dirs)
            .field("options", &self.options)
            .field("ctx", &self.ctx)
            .field("binary", &self.binary)
            .finish_non_exhaustive()
    }
}

impl Reloader {
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
            dirs: Vec::new(),
            options: ReloadOptions::default(),
            ctx: ReloadContext::global().clone(),
            restarter: None,
            fs: Arc::new(RealFileSystem),
            binary: None,
        }
    }

    pub fn dir(mut self, dir: WatchDir) -> Self {
        self.dirs.push(dir);
        self
    }

    pub fn dirs(mut self, dirs: impl IntoIterator<Item = WatchDir>) -> Self {
        self.dirs.extend(dirs);
        self
    }

    pub fn options(mut self, options: ReloadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn grace_period(mut self, grace_period: Duration) -> Self {
        self.options.grace_period = grace_period;
        self
    }

    pub fn trigger(mut self, op: Option<ChangeOp>) -> Self {
        self.options.trigger = op;
        self
    }

    /// Use a private context instead of the process-wide one.
    pub fn context(mut self, ctx: ReloadContext) -> Self {
        self.ctx = ctx;
        self
    }

    /// Replace the exec-based restart action.
    pub fn restarter(mut self, restarter: Arc<dyn Restarter>) -> Self {
        self.restarter = Some(restarter);
        self
    }

    pub fn filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    /// Watch this binary path instead of resolving the running executable.
    /// Relative paths are taken against the current directory.
    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    /// Resolve and validate every target without touching the notifier.
    pub fn prepare(&self) -> Result<Dispatcher> {
        let self_path = match &self.binary {
            Some(path) => {
                self.fs
                    .absolute(path)
                    .map_err(|err| ReloadError::InvalidPath {
                        path: path.clone(),
                        reason: format!("{err:#}"),
                    })?
            }
            None => resolve_self()?,
        };
        let additional = resolve_dirs(self.fs.as_ref(), self.dirs.clone())?;

        Ok(Dispatcher::new(
            WatchTarget::self_binary(self_path),
            additional,
            self.options.platform,
        )
        .with_trigger(self.options.trigger))
    }

    /// Arm the watcher and start the event loop on the current Tokio runtime.
    ///
    /// All validation and registration happens before this returns; on error
    /// nothing stays registered and no loop is started.
    pub fn spawn(self) -> Result<ReloadHandle> {
        let dispatcher = self.prepare()?;

        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<NotifyMessage>();

        let mut watcher = RecommendedWatcher::new(
            move |res: NotifyMessage| {
                if let Err(err) = event_tx.send(res) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("selfreload: failed to forward notify event: {err}");
                }
            },
            Config::default(),
        )
        .map_err(ReloadError::WatcherInit)?;

        let mut watched = Vec::with_capacity(dispatcher.targets().len());
        for target in dispatcher.targets() {
            let dir = target.watch_dir().to_path_buf();
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .map_err(|source| ReloadError::WatchSetup {
                    path: dir.clone(),
                    source,
                })?;
            debug!(dir = %dir.display(), kind = ?target.kind(), "watching directory");
            watched.push(dir);
        }

        // The context keeps the first binary it saw as its restart target;
        // the handle reports what this watcher actually observes.
        let self_path = dispatcher.self_binary().path().to_path_buf();
        self.ctx.set_self_path(self_path.clone());
        self.ctx.install_closer(move || drop(watcher));

        self.sink.log(format_args!("{}", startup_message(&dispatcher)));
        info!(
            binary = %self_path.display(),
            additional = dispatcher.additional().len(),
            grace_ms = self.options.grace_period.as_millis() as u64,
            "self-reload watcher armed"
        );

        let restarter: Arc<dyn Restarter> = match self.restarter {
            Some(restarter) => restarter,
            None => Arc::new(ExecRestarter::with_sink(Arc::clone(&self.sink))),
        };

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let event_loop = EventLoop::new(
            dispatcher,
            self.options.grace_period,
            self.sink,
            restarter,
            self.ctx.clone(),
        );
        let join = tokio::spawn(event_loop.run(event_rx, shutdown_rx));

        Ok(ReloadHandle {
            shutdown: Some(shutdown_tx),
            join,
            ctx: self.ctx,
            self_path,
            watched,
        })
    }

    /// Arm the watcher and wait for the event loop. In normal operation this
    /// only returns an initialization error, or never returns at all.
    pub async fn run(self) -> Result<()> {
        self.spawn()?.wait().await
    }
}

/// Handle for a running self-reload watcher.
///
/// Dropping the handle detaches the loop; it keeps running until the process
/// is replaced or exits.
pub struct ReloadHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
    ctx: ReloadContext,
    self_path: PathBuf,
    watched: Vec<PathBuf>,
}

impl fmt::Debug for ReloadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadHandle")
            .field("self_path", &self.self_path)
            .field("watched", &self.watched)
            .finish_non_exhaustive()
    }
}

impl ReloadHandle {
    /// The resolved path of the binary being watched.
    pub fn self_path(&self) -> &Path {
        &self.self_path
    }

    /// Directories registered with the notifier, in registration order.
    pub fn watched_dirs(&self) -> &[PathBuf] {
        &self.watched
    }

    pub fn context(&self) -> &ReloadContext {
        &self.ctx
    }

    /// Stop the event loop and release the notifier.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.ctx.close_watcher();
        self.join
            .await
            .map_err(|e| ReloadError::Other(anyhow!("reload event loop failed: {e}")))
    }

    /// Wait for the event loop to finish.
    pub async fn wait(self) -> Result<()> {
        self.join
            .await
            .map_err(|e| ReloadError::Other(anyhow!("reload event loop failed: {e}")))
    }
}

/// `restarting "./bin" when it changes (additional dirs: ./a, ./b)`
pub fn startup_message(dispatcher: &Dispatcher) -> String {
    let additional = dispatcher.additional();
    let add = if additional.is_empty() {
        String::new()
    } else {
        let dirs: Vec<String> = additional.iter().map(|t| relpath(t.path())).collect();
        format!(" (additional dirs: {})", dirs.join(", "))
    };

    format!(
        "restarting {:?} when it changes{}",
        relpath(dispatcher.self_binary().path()),
        add
    )
}
