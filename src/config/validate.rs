// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReloadError, Result};

/// Upper bound for the grace period; anything longer is almost certainly a
/// unit mistake (seconds given as milliseconds).
pub const MAX_GRACE_PERIOD_MS: u64 = 10_000;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ReloadError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.reload, raw.watch))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_grace_period(cfg)?;
    validate_watch_entries(cfg)?;
    Ok(())
}

fn validate_grace_period(cfg: &RawConfigFile) -> Result<()> {
    if cfg.reload.grace_period_ms > MAX_GRACE_PERIOD_MS {
        return Err(ReloadError::Config(format!(
            "[reload].grace_period_ms must be <= {} (got {})",
            MAX_GRACE_PERIOD_MS, cfg.reload.grace_period_ms
        )));
    }
    Ok(())
}

// Existence is checked when the watcher starts, not here: the config may be
// loaded before the directories are created.
fn validate_watch_entries(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in cfg.watch.iter() {
        if entry.path.as_os_str().is_empty() {
            return Err(ReloadError::Config(
                "[[watch]] entry has an empty `path`".to_string(),
            ));
        }
        if !seen.insert(entry.path.as_path()) {
            return Err(ReloadError::Config(format!(
                "directory {:?} is listed more than once in [[watch]]",
                entry.path
            )));
        }
    }
    Ok(())
}
