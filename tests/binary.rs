// tests/binary.rs

//! Runs the `selfreload` binary itself.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_selfreload");

#[test]
fn dry_run_lists_targets_without_watching() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(tmp.path().join("templates")).expect("templates dir");
    fs::create_dir(tmp.path().join("config")).expect("config dir");

    let output = Command::new(BIN)
        .current_dir(tmp.path())
        .args(["--dry-run", "--dir", "templates", "--restart-dir", "config"])
        .args(["--grace-ms", "250", "--trigger", "create"])
        .output()
        .expect("run selfreload");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("selfreload dry-run"));
    assert!(stdout.contains("grace    = 250ms"));
    assert!(stdout.contains("trigger  = Create"));
    assert!(stdout.contains("additional dirs (2):"));
    assert!(stdout.contains("./templates"));
    assert!(stdout.contains("./config (Restart)"));
}

#[test]
fn missing_directory_is_fatal_at_startup() {
    let tmp = tempfile::tempdir().expect("tempdir");

    let output = Command::new(BIN)
        .current_dir(tmp.path())
        .args(["--dry-run", "--dir", "nope"])
        .output()
        .expect("run selfreload");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::write(
        tmp.path().join("Reload.toml"),
        "[reload]\ngrace_period_ms = 999999\n",
    )
    .expect("config");

    let output = Command::new(BIN)
        .current_dir(tmp.path())
        .arg("--dry-run")
        .output()
        .expect("run selfreload");

    assert_eq!(output.status.code(), Some(1));
}

/// Replace the binary on disk and watch the same PID come back with the same
/// arguments.
#[cfg(target_os = "linux")]
#[test]
fn rebuilt_binary_replaces_process_in_place() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(tmp.path().join("bin")).expect("bin dir");
    let copy = tmp.path().join("bin").join("selfreload");
    fs::copy(BIN, &copy).expect("copy binary");

    let mut child = Command::new(&copy)
        .current_dir(tmp.path())
        .args(["--grace-ms", "300"])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("start selfreload");

    let stdout = child.stdout.take().expect("piped stdout");
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if line.starts_with("[selfreload] pid") && tx.send(line).is_err() {
                break;
            }
        }
    });

    let first = rx.recv_timeout(Duration::from_secs(10));

    // A fresh inode is written, as a compiler would; the running image is
    // never opened for writing.
    if first.is_ok() {
        fs::remove_file(&copy).expect("remove old binary");
        fs::copy(BIN, &copy).expect("write new binary");
    }
    let second = rx.recv_timeout(Duration::from_secs(10));

    let _ = child.kill();
    let _ = child.wait();

    let first = first.expect("first start-up line");
    let second = second.expect("start-up line after replacement");
    assert_eq!(first, second, "same pid, same arguments");
    assert!(first.contains("--grace-ms"));
}

/// A replacement that cannot be executed takes the process down with a
/// diagnostic instead of leaving it running unwatched.
#[cfg(unix)]
#[test]
fn unexecutable_replacement_exits_with_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    fs::create_dir(tmp.path().join("bin")).expect("bin dir");
    let copy = tmp.path().join("bin").join("selfreload");
    fs::copy(BIN, &copy).expect("copy binary");

    let mut child = Command::new(&copy)
        .current_dir(tmp.path())
        .args(["--trigger", "create", "--grace-ms", "100"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("start selfreload");

    let mut stdout = BufReader::new(child.stdout.take().expect("piped stdout"));
    let mut line = String::new();
    stdout.read_line(&mut line).expect("start-up line");
    assert!(line.starts_with("[selfreload] pid"), "got {line:?}");

    // Plain data file, no execute bit.
    fs::remove_file(&copy).expect("remove old binary");
    fs::write(&copy, b"not a program").expect("write replacement");

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().expect("poll child") {
            break Some(status);
        }
        if Instant::now() >= deadline {
            break None;
        }
        std::thread::sleep(Duration::from_millis(20));
    };
    let Some(status) = status else {
        let _ = child.kill();
        let _ = child.wait();
        panic!("process kept running after a failed replacement");
    };

    let mut stderr = String::new();
    child
        .stderr
        .take()
        .expect("piped stderr")
        .read_to_string(&mut stderr)
        .expect("read stderr");

    assert_eq!(status.code(), Some(1));
    assert!(stderr.contains("cannot restart"), "{stderr}");
}
