// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::platform::ChangeOp;
use crate::types::WatchAction;
use crate::watch::WatchDir;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [reload]
/// grace_period_ms = 100
/// trigger = "create"
///
/// [[watch]]
/// path = "templates"
/// action = "log"
///
/// [[watch]]
/// path = "config"
/// action = "restart"
/// ```
///
/// All sections are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub reload: ReloadSection,

    /// Additional directories, in registration order.
    #[serde(default)]
    pub watch: Vec<WatchEntry>,
}

/// `[reload]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReloadSection {
    /// Delay between a qualifying change and its action.
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Operation that fires actions (`"create"`, `"write"`, ...). Defaults to
    /// the platform's usual trigger.
    #[serde(default)]
    pub trigger: Option<ChangeOp>,
}

fn default_grace_period_ms() -> u64 {
    crate::watch::DEFAULT_GRACE_PERIOD.as_millis() as u64
}

impl Default for ReloadSection {
    fn default() -> Self {
        Self {
            grace_period_ms: default_grace_period_ms(),
            trigger: None,
        }
    }
}

/// One `[[watch]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatchEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub action: WatchAction,
}

/// Validated configuration. Build it with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub reload: ReloadSection,
    pub watch: Vec<WatchEntry>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(reload: ReloadSection, watch: Vec<WatchEntry>) -> Self {
        Self { reload, watch }
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.reload.grace_period_ms)
    }

    /// Turn the `[[watch]]` entries into watch descriptors.
    pub fn watch_dirs(&self) -> Vec<WatchDir> {
        self.watch
            .iter()
            .map(|entry| match entry.action {
                WatchAction::Restart => WatchDir::restart(&entry.path),
                WatchAction::Log => {
                    let dir = entry.path.clone();
                    WatchDir::new(&entry.path, move || {
                        info!(dir = %dir.display(), "watched directory changed");
                    })
                }
            })
            .collect()
    }
}
