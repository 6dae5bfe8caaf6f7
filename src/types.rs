// src/types.rs

use serde::Deserialize;

/// What a configured directory does when its contents change.
///
/// - `Log`: report the change and keep running (default).
/// - `Restart`: replace the process, exactly as if the binary had changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchAction {
    #[default]
    Log,
    Restart,
}
