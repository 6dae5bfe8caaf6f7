use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use selfreload::{LogSink, ReloadContext, Restarter};

/// A restarter that records restarts instead of replacing the process.
#[derive(Debug, Default)]
pub struct FakeRestarter {
    restarts: AtomicUsize,
    /// Whether the context still had an active watcher at each restart.
    watcher_seen: Mutex<Vec<bool>>,
    at: Mutex<Vec<Instant>>,
}

impl FakeRestarter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn count(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn watcher_seen(&self) -> Vec<bool> {
        self.watcher_seen.lock().unwrap().clone()
    }

    pub fn times(&self) -> Vec<Instant> {
        self.at.lock().unwrap().clone()
    }
}

impl Restarter for FakeRestarter {
    fn restart(&self, ctx: &ReloadContext) {
        self.watcher_seen.lock().unwrap().push(ctx.has_watcher());
        self.at.lock().unwrap().push(Instant::now());
        self.restarts.fetch_add(1, Ordering::SeqCst);
    }
}

/// A log sink that keeps every message.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }
}

impl LogSink for RecordingSink {
    fn log(&self, message: fmt::Arguments<'_>) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

/// A directory callback that counts its invocations.
#[derive(Debug, Clone, Default)]
pub struct CountingCallback {
    calls: Arc<AtomicUsize>,
}

impl CountingCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A closure suitable for `WatchDir::new`.
    pub fn callback(&self) -> impl Fn() + Send + Sync + 'static {
        let calls = Arc::clone(&self.calls);
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }
}
