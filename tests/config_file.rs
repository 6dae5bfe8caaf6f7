// tests/config_file.rs

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use selfreload::config::{load_and_validate, load_or_default};
use selfreload::types::WatchAction;
use selfreload::{ChangeOp, DirAction, ReloadError};

fn demo_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join("Reload.toml")
}

#[test]
fn demo_config_loads() {
    let cfg = load_and_validate(demo_config()).expect("demo config is valid");

    assert_eq!(cfg.grace_period(), Duration::from_millis(150));
    assert_eq!(cfg.reload.trigger, Some(ChangeOp::Create));
    assert_eq!(cfg.watch.len(), 2);
    assert_eq!(cfg.watch[0].path, PathBuf::from("templates"));
    assert_eq!(cfg.watch[0].action, WatchAction::Log);
    assert_eq!(cfg.watch[1].action, WatchAction::Restart);

    let dirs = cfg.watch_dirs();
    assert!(matches!(dirs[0].action, DirAction::Callback(_)));
    assert!(matches!(dirs[1].action, DirAction::Restart));
}

#[test]
fn missing_file_means_defaults() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let cfg = load_or_default(tmp.path().join("Reload.toml")).expect("defaults");

    assert_eq!(cfg.grace_period(), Duration::from_millis(100));
    assert!(cfg.reload.trigger.is_none());
    assert!(cfg.watch.is_empty());
}

#[test]
fn unknown_keys_are_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("Reload.toml");
    fs::write(&path, "[reload]\ngrace_ms = 5\n").expect("config");

    let err = load_and_validate(&path).expect_err("typo must not pass silently");
    assert!(matches!(err, ReloadError::Toml(_)), "got {err:?}");
}

#[test]
fn duplicate_directories_are_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("Reload.toml");
    fs::write(
        &path,
        r#"
[[watch]]
path = "templates"

[[watch]]
path = "templates"
action = "restart"
"#,
    )
    .expect("config");

    let err = load_and_validate(&path).expect_err("duplicate entry");
    assert!(matches!(err, ReloadError::Config(_)), "got {err:?}");
}
