pub mod builders;
pub mod fakes;

use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

pub use builders::EventBuilder;
pub use fakes::{CountingCallback, FakeRestarter, RecordingSink};

static INIT: Once = Once::new();

/// Initialise tracing for tests, once per test binary.
///
/// Output goes through the test writer, so it only shows for failing tests.
/// `RUST_LOG=selfreload=debug` turns on the per-event traces.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("selfreload=info,notify=warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init()
            .ok();
    });
}

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Poll `cond` every 10ms until it holds or `timeout` elapses.
pub async fn wait_until<F>(timeout: std::time::Duration, mut cond: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if cond() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
}
