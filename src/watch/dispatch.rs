// src/watch/dispatch.rs

//! Pure mapping from a change event to the targets it fires.
//!
//! No IO, no clocks: the event loop asks the dispatcher what to do and then
//! performs the (delayed) actions itself.

use std::path::Path;

use crate::platform::{ChangeOp, PlatformFamily, is_trigger};
use crate::watch::target::WatchTarget;

/// The ordered set of watch targets. Index 0 is always the self binary.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    targets: Vec<WatchTarget>,
    platform: PlatformFamily,
    trigger_override: Option<ChangeOp>,
}

impl Dispatcher {
    pub fn new(
        self_binary: WatchTarget,
        additional: Vec<WatchTarget>,
        platform: PlatformFamily,
    ) -> Self {
        let mut targets = Vec::with_capacity(additional.len() + 1);
        targets.push(self_binary);
        targets.extend(additional);
        Self {
            targets,
            platform,
            trigger_override: None,
        }
    }

    /// Fire on `op` instead of the platform's usual trigger.
    pub fn with_trigger(mut self, op: Option<ChangeOp>) -> Self {
        self.trigger_override = op;
        self
    }

    pub fn platform(&self) -> PlatformFamily {
        self.platform
    }

    /// The operation that fires actions.
    pub fn trigger_op(&self) -> ChangeOp {
        self.trigger_override
            .unwrap_or_else(|| self.platform.trigger_op())
    }

    fn fires_on(&self, op: ChangeOp) -> bool {
        match self.trigger_override {
            Some(trigger) => op == trigger,
            None => is_trigger(self.platform, op),
        }
    }

    pub fn self_binary(&self) -> &WatchTarget {
        &self.targets[0]
    }

    pub fn additional(&self) -> &[WatchTarget] {
        &self.targets[1..]
    }

    pub fn targets(&self) -> &[WatchTarget] {
        &self.targets
    }

    pub fn target(&self, index: usize) -> Option<&WatchTarget> {
        self.targets.get(index)
    }

    /// Indices of the targets fired by a change of kind `op` at `path`.
    ///
    /// Non-trigger operations fire nothing. The self binary, if it matches,
    /// comes first; additional directories follow in registration order and
    /// may all match the same path.
    pub fn plan(&self, op: ChangeOp, path: &Path) -> Vec<usize> {
        if !self.fires_on(op) {
            return Vec::new();
        }

        self.targets
            .iter()
            .enumerate()
            .filter(|(_, target)| target.matches(path))
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watch::target::{DirAction, TargetKind};

    fn dispatcher(platform: PlatformFamily) -> Dispatcher {
        Dispatcher::new(
            WatchTarget::self_binary("/app/bin/server"),
            vec![
                WatchTarget::additional("/app/templates", DirAction::Restart),
                WatchTarget::additional("/app", DirAction::Restart),
            ],
            platform,
        )
    }

    #[test]
    fn self_change_on_bsd_create() {
        let d = dispatcher(PlatformFamily::Bsd);
        // "/app" is also registered, so it fires after the binary.
        assert_eq!(
            d.plan(ChangeOp::Create, Path::new("/app/bin/server")),
            vec![0, 2]
        );
        assert_eq!(d.self_binary().kind(), TargetKind::SelfBinary);
    }

    #[test]
    fn template_write_on_linux_fires_every_matching_dir() {
        let d = dispatcher(PlatformFamily::Linux);
        assert_eq!(
            d.plan(ChangeOp::Write, Path::new("/app/templates/index.html")),
            vec![1, 2]
        );
    }

    #[test]
    fn wrong_op_for_platform_fires_nothing() {
        let linux = dispatcher(PlatformFamily::Linux);
        assert!(linux.plan(ChangeOp::Create, Path::new("/app/bin/server")).is_empty());

        let bsd = dispatcher(PlatformFamily::Bsd);
        assert!(bsd.plan(ChangeOp::Write, Path::new("/app/bin/server")).is_empty());
        assert!(bsd.plan(ChangeOp::Metadata, Path::new("/app/bin/server")).is_empty());
    }

    #[test]
    fn trigger_override_replaces_platform_default() {
        let d = dispatcher(PlatformFamily::Linux).with_trigger(Some(ChangeOp::Create));
        assert_eq!(d.trigger_op(), ChangeOp::Create);
        assert_eq!(d.plan(ChangeOp::Create, Path::new("/app/bin/server")), vec![0, 2]);
        assert!(d.plan(ChangeOp::Write, Path::new("/app/bin/server")).is_empty());
    }

    #[test]
    fn unrelated_path_fires_nothing() {
        let d = dispatcher(PlatformFamily::Linux);
        assert!(d.plan(ChangeOp::Write, Path::new("/var/log/syslog")).is_empty());
    }

    #[test]
    fn accessors_split_self_from_additional() {
        let d = dispatcher(PlatformFamily::Linux);
        assert_eq!(d.targets().len(), 3);
        assert_eq!(d.additional().len(), 2);
        assert_eq!(d.target(1).map(|t| t.path()), Some(Path::new("/app/templates")));
        assert!(d.target(3).is_none());
    }
}
