// tests/process_replace.rs

//! The restart path with a real watcher attached.
#![cfg(unix)]

mod common;

use std::ffi::OsString;
use std::fs;

use selfreload::{ExecRestarter, ReloadContext, ReloadError, Reloader};
use selfreload_test_utils::{FakeRestarter, RecordingSink};

use common::{TEST_GRACE, init_tracing, with_timeout};

#[tokio::test]
async fn failed_replacement_closes_watcher_and_reports_path() {
    init_tracing();
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(tmp.path().join("bin")).expect("bin dir");
    // Never created, so exec must fail.
    let binary = tmp.path().join("bin").join("server");

    let ctx = ReloadContext::new();
    let handle = Reloader::new(RecordingSink::new())
        .context(ctx.clone())
        .restarter(FakeRestarter::new())
        .grace_period(TEST_GRACE)
        .binary(&binary)
        .spawn()
        .expect("start watcher");
    assert!(ctx.has_watcher());

    let args = vec![OsString::from("--port"), OsString::from("8080")];
    let err = ExecRestarter::new().try_exec(&ctx, args);

    match err {
        ReloadError::Replacement { path, .. } => assert_eq!(path, binary),
        other => panic!("expected Replacement, got {other:?}"),
    }
    assert!(!ctx.has_watcher(), "watcher is closed before exec");

    // With the watcher gone the event loop has nothing left to read.
    with_timeout(handle.wait()).await.expect("loop finished");
}
