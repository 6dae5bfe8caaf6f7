// src/watch/event_loop.rs

//! The long-running loop that turns notifier events into actions.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::Event;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::context::ReloadContext;
use crate::errors::ReloadError;
use crate::exec::Restarter;
use crate::platform::ChangeOp;
use crate::sink::SharedSink;
use crate::watch::dispatch::Dispatcher;
use crate::watch::target::DirAction;

/// Raw notifier output, errors included.
pub type NotifyMessage = notify::Result<Event>;

/// Consumes notifier messages strictly in delivery order.
///
/// Each fired action waits for the grace period first, and the loop does not
/// read further events while waiting. Bursts stay queued in the channel.
pub struct EventLoop {
    dispatcher: Dispatcher,
    grace_period: Duration,
    sink: SharedSink,
    restarter: Arc<dyn Restarter>,
    ctx: ReloadContext,
    warned_untested: bool,
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("dispatcher", &self.dispatcher)
            .field("grace_period", &self.grace_period)
            .finish_non_exhaustive()
    }
}

impl EventLoop {
    pub fn new(
        dispatcher: Dispatcher,
        grace_period: Duration,
        sink: SharedSink,
        restarter: Arc<dyn Restarter>,
        ctx: ReloadContext,
    ) -> Self {
        Self {
            dispatcher,
            grace_period,
            sink,
            restarter,
            ctx,
            warned_untested: false,
        }
    }

    /// Run until the event channel closes or `shutdown` fires.
    ///
    /// Dropping the shutdown sender without sending does not stop the loop.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<NotifyMessage>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        info!(
            platform = self.dispatcher.platform().name(),
            trigger = ?self.dispatcher.trigger_op(),
            targets = self.dispatcher.targets().len(),
            "reload event loop started"
        );

        // A dropped sender completes the receiver with an error; it must not
        // be polled again after that.
        let mut shutdown_open = true;

        loop {
            tokio::select! {
                res = &mut shutdown, if shutdown_open => {
                    shutdown_open = false;
                    if res.is_ok() {
                        info!("reload event loop shutdown requested");
                        break;
                    }
                    debug!("shutdown sender dropped; loop detached");
                }
                msg = events.recv() => match msg {
                    Some(Ok(event)) => self.handle_event(event).await,
                    Some(Err(err)) => {
                        let err = ReloadError::Notification(err);
                        warn!(error = %err, "file watch error");
                        self.sink.log(format_args!("{err}"));
                    }
                    None => {
                        info!("notify channel closed; exiting event loop");
                        break;
                    }
                },
            }
        }

        debug!("reload event loop finished");
    }

    async fn handle_event(&mut self, event: Event) {
        let op = ChangeOp::from(&event.kind);
        debug!(?event, ?op, "received notify event");

        let platform = self.dispatcher.platform();
        if platform.is_untested() && !self.warned_untested {
            self.warned_untested = true;
            self.sink.log(format_args!(
                "reload: untested OS {:?}; this package may not work correctly",
                platform.name()
            ));
        }

        for path in &event.paths {
            for idx in self.dispatcher.plan(op, path) {
                // Wait for writes to finish.
                tokio::time::sleep(self.grace_period).await;
                self.fire(idx, path);
            }
        }
    }

    fn fire(&self, idx: usize, path: &Path) {
        let Some(target) = self.dispatcher.target(idx) else {
            return;
        };

        debug!(
            target = %target.path().display(),
            kind = ?target.kind(),
            changed = %path.display(),
            "watch match -> firing action"
        );

        match target.action() {
            DirAction::Restart => self.restarter.restart(&self.ctx),
            DirAction::Callback(callback) => {
                if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                    warn!(dir = %target.path().display(), "directory callback panicked");
                    self.sink.log(format_args!(
                        "reload error: callback for {:?} panicked",
                        target.path()
                    ));
                }
            }
        }
    }
}
