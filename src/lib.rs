// src/lib.rs

//! Restart a running process in place when its own binary changes.
//!
//! The watcher observes the directory containing the executable (a rebuild
//! usually renames a fresh file over the old one) and, optionally, extra
//! directories with their own callbacks. When the binary changes the process
//! image is replaced via `exec`, keeping the PID, arguments and environment.
//!
//! ```no_run
//! # async fn demo() -> selfreload::errors::Result<()> {
//! use selfreload::{TracingSink, WatchDir};
//!
//! tokio::spawn(async {
//!     let tpl = WatchDir::new("templates", || println!("reloading templates"));
//!     if let Err(err) = selfreload::run(TracingSink, vec![tpl]).await {
//!         eprintln!("cannot start reloader: {err}");
//!     }
//! });
//! # Ok(())
//! # }
//! ```
//!
//! Callbacks run on the watcher's task. Synchronising any state they touch
//! with the rest of the program is up to the caller.

pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod platform;
pub mod resolve;
pub mod sink;
pub mod types;
pub mod watch;

use std::path::PathBuf;

use anyhow::{Context, Result as AnyResult};
use tracing::{debug, info};

pub use crate::context::ReloadContext;
pub use crate::errors::{ReloadError, Result};
pub use crate::exec::{ExecRestarter, Restarter};
pub use crate::platform::{ChangeOp, PlatformFamily};
pub use crate::sink::{LogSink, TracingSink};
pub use crate::watch::{
    DirAction, ReloadHandle, ReloadOptions, Reloader, WatchDir, WatchTarget,
};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::resolve::relpath;

/// Arm the watcher on the running binary plus `dirs` and return immediately.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_reloader(
    sink: impl LogSink + 'static,
    dirs: impl IntoIterator<Item = WatchDir>,
) -> Result<ReloadHandle> {
    Reloader::new(sink).dirs(dirs).spawn()
}

/// Arm the watcher and keep watching.
///
/// Only returns early with an initialization error; once armed it waits on
/// the event loop, which runs until the process is replaced. Spawn it as its
/// own task.
pub async fn run(
    sink: impl LogSink + 'static,
    dirs: impl IntoIterator<Item = WatchDir>,
) -> Result<()> {
    Reloader::new(sink).dirs(dirs).run().await
}

/// Replace the current process with a fresh copy of itself.
///
/// Closes the active watcher first, if there is one. Can be called from a
/// directory callback, or without any watcher at all. Exits the process if the
/// replacement fails.
pub fn exec() -> ! {
    ExecRestarter::new().exec(ReloadContext::global())
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the self-reload watcher
/// - Ctrl-C handling
pub async fn run_app(args: CliArgs) -> AnyResult<()> {
    let cfg = load_or_default(&args.config)
        .with_context(|| format!("loading config {:?}", args.config))?;
    let grace = args
        .grace_ms
        .map(std::time::Duration::from_millis)
        .unwrap_or_else(|| cfg.grace_period());
    let trigger = args.trigger.or(cfg.reload.trigger);
    let dirs = collect_dirs(&cfg, &args);

    let reloader = Reloader::new(TracingSink)
        .dirs(dirs)
        .grace_period(grace)
        .trigger(trigger);

    if args.dry_run {
        let dispatcher = reloader.prepare()?;
        print_dry_run(&dispatcher, grace);
        return Ok(());
    }

    let handle = reloader.spawn()?;
    println!(
        "[selfreload] pid {} running {} args {:?}",
        std::process::id(),
        relpath(handle.self_path()),
        std::env::args().skip(1).collect::<Vec<_>>()
    );
    info!(
        pid = std::process::id(),
        args = ?std::env::args().skip(1).collect::<Vec<_>>(),
        "running; rebuild the binary to restart in place"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Ctrl+C received; stopping watcher");
    handle.shutdown().await?;
    Ok(())
}

/// Config entries first, then `--dir`, then `--restart-dir`.
fn collect_dirs(cfg: &ConfigFile, args: &CliArgs) -> Vec<WatchDir> {
    let mut dirs = cfg.watch_dirs();

    for path in &args.dirs {
        let dir: PathBuf = path.clone();
        dirs.push(WatchDir::new(path, move || {
            info!(dir = %dir.display(), "watched directory changed");
        }));
    }
    dirs.extend(args.restart_dirs.iter().map(WatchDir::restart));

    debug!(count = dirs.len(), "collected additional directories");
    dirs
}

/// Simple dry-run output: what would be watched and how.
fn print_dry_run(dispatcher: &watch::Dispatcher, grace: std::time::Duration) {
    println!("selfreload dry-run");
    println!("  platform = {}", dispatcher.platform().name());
    println!("  trigger  = {:?}", dispatcher.trigger_op());
    println!("  grace    = {}ms", grace.as_millis());
    println!("  binary   = {}", relpath(dispatcher.self_binary().path()));
    println!();

    println!("additional dirs ({}):", dispatcher.additional().len());
    for target in dispatcher.additional() {
        println!("  - {} ({:?})", relpath(target.path()), target.action());
    }
}
