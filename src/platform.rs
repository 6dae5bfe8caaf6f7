// src/platform.rs

//! Platform-dependent interpretation of filesystem change events.
//!
//! Replacing a binary is reported differently per kernel: kqueue-based
//! systems see the new directory entry as a create, while inotify on Linux
//! reports the content write. Everything here is pure so it can be tested
//! without touching the filesystem.

use std::str::FromStr;

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};
use serde::Deserialize;

/// Kernel family, as far as change notification semantics are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Darwin and the FreeBSD/OpenBSD/NetBSD/DragonFly descendants.
    Bsd,
    Linux,
    /// Anything else, carrying the `std::env::consts::OS` name.
    Other(&'static str),
}

impl PlatformFamily {
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    pub fn from_os(os: &'static str) -> Self {
        match os {
            "macos" | "ios" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
                PlatformFamily::Bsd
            }
            "linux" | "android" => PlatformFamily::Linux,
            other => PlatformFamily::Other(other),
        }
    }

    /// The operation that signals "a file was replaced" on this family.
    pub fn trigger_op(self) -> ChangeOp {
        match self {
            PlatformFamily::Bsd => ChangeOp::Create,
            PlatformFamily::Linux => ChangeOp::Write,
            PlatformFamily::Other(_) => ChangeOp::Create,
        }
    }

    /// Platforms we have not verified the trigger semantics on.
    pub fn is_untested(self) -> bool {
        matches!(self, PlatformFamily::Other(_))
    }

    pub fn name(self) -> &'static str {
        match self {
            PlatformFamily::Bsd => "bsd",
            PlatformFamily::Linux => "linux",
            PlatformFamily::Other(os) => os,
        }
    }
}

impl Default for PlatformFamily {
    fn default() -> Self {
        Self::current()
    }
}

/// Normalised operation kind of a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeOp {
    Create,
    Write,
    Remove,
    Rename,
    Metadata,
    Other,
}

impl From<&EventKind> for ChangeOp {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeOp::Create,
            // A rename onto a watched name makes a new entry appear.
            EventKind::Modify(ModifyKind::Name(RenameMode::To)) => ChangeOp::Create,
            EventKind::Modify(ModifyKind::Name(_)) => ChangeOp::Rename,
            EventKind::Modify(ModifyKind::Metadata(_)) => ChangeOp::Metadata,
            EventKind::Modify(_) => ChangeOp::Write,
            EventKind::Remove(_) => ChangeOp::Remove,
            EventKind::Access(_) | EventKind::Any | EventKind::Other => ChangeOp::Other,
        }
    }
}

impl FromStr for ChangeOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(ChangeOp::Create),
            "write" => Ok(ChangeOp::Write),
            "remove" => Ok(ChangeOp::Remove),
            "rename" => Ok(ChangeOp::Rename),
            "metadata" => Ok(ChangeOp::Metadata),
            other => Err(format!(
                "invalid trigger operation: {other} (expected create, write, remove, rename or metadata)"
            )),
        }
    }
}

/// Whether `op` should trigger an action on `family`.
pub fn is_trigger(family: PlatformFamily, op: ChangeOp) -> bool {
    op == family.trigger_op()
}
