// src/watch/mod.rs

//! Change watching.
//!
//! This module is responsible for:
//! - Validating and resolving the watch targets (self binary + directories).
//! - Deciding, per platform, which events count as a change.
//! - Wiring up the `notify` watcher and the event loop that fires restarts
//!   and directory callbacks after a grace period.
//!
//! It does **not** replace the process itself; that is [`crate::exec`].

pub mod dispatch;
pub mod event_loop;
pub mod target;
pub mod watcher;

pub use dispatch::Dispatcher;
pub use event_loop::{EventLoop, NotifyMessage};
pub use target::{Callback, DirAction, TargetKind, WatchDir, WatchTarget, resolve_dirs};
pub use watcher::{DEFAULT_GRACE_PERIOD, ReloadHandle, ReloadOptions, Reloader, startup_message};
