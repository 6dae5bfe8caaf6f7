// src/sink.rs

//! Caller-supplied log sink for status and error messages.
//!
//! Any `Fn(fmt::Arguments<'_>) + Send + Sync` closure is a sink, so callers
//! can route messages into whatever they already log with:
//!
//! ```no_run
//! let sink = |args: std::fmt::Arguments<'_>| eprintln!("{args}");
//! # let _ = sink;
//! ```

use std::fmt;
use std::sync::Arc;

pub trait LogSink: Send + Sync {
    /// Emit one message. Must not panic.
    fn log(&self, message: fmt::Arguments<'_>);
}

impl<F> LogSink for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn log(&self, message: fmt::Arguments<'_>) {
        self(message)
    }
}

/// Default sink: forwards every message to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, message: fmt::Arguments<'_>) {
        tracing::info!(target: "selfreload", "{}", message);
    }
}

pub type SharedSink = Arc<dyn LogSink>;

