#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use selfreload::watch::{Dispatcher, EventLoop, NotifyMessage};
use selfreload::{PlatformFamily, ReloadContext, WatchTarget};
use selfreload_test_utils::{FakeRestarter, RecordingSink};

pub use selfreload_test_utils::{init_tracing, wait_until, with_timeout};

pub const TEST_GRACE: Duration = Duration::from_millis(20);

/// An event loop driven by hand instead of by `notify`.
pub struct LoopHarness {
    pub events: mpsc::UnboundedSender<NotifyMessage>,
    pub shutdown: Option<oneshot::Sender<()>>,
    pub join: JoinHandle<()>,
    pub restarter: Arc<FakeRestarter>,
    pub sink: RecordingSink,
    pub ctx: ReloadContext,
}

impl LoopHarness {
    pub fn start(
        self_binary: &str,
        additional: Vec<WatchTarget>,
        platform: PlatformFamily,
    ) -> Self {
        let dispatcher = Dispatcher::new(WatchTarget::self_binary(self_binary), additional, platform);
        let restarter = FakeRestarter::new();
        let sink = RecordingSink::new();
        let ctx = ReloadContext::new();

        let (events, events_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();

        let event_loop = EventLoop::new(
            dispatcher,
            TEST_GRACE,
            Arc::new(sink.clone()),
            restarter.clone(),
            ctx.clone(),
        );
        let join = tokio::spawn(event_loop.run(events_rx, shutdown_rx));

        Self {
            events,
            shutdown: Some(shutdown),
            join,
            restarter,
            sink,
            ctx,
        }
    }

    pub fn send(&self, msg: NotifyMessage) {
        self.events.send(msg).expect("event loop is running");
    }

    /// Close the channel and wait until every queued event was handled.
    pub async fn drain(self) -> (Arc<FakeRestarter>, RecordingSink) {
        let LoopHarness {
            events,
            shutdown,
            join,
            restarter,
            sink,
            ..
        } = self;
        drop(events);
        join.await.expect("event loop panicked");
        drop(shutdown);
        (restarter, sink)
    }
}
