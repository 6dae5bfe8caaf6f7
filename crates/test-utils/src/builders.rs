#![allow(dead_code)]

use std::path::PathBuf;

use notify::Event;
use notify::event::{CreateKind, DataChange, EventKind, MetadataKind, ModifyKind, RemoveKind};

/// Builder for synthetic `notify` events fed straight into the event loop.
pub struct EventBuilder {
    kind: EventKind,
    paths: Vec<PathBuf>,
}

impl EventBuilder {
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self::new(EventKind::Create(CreateKind::File), path)
    }

    pub fn write(path: impl Into<PathBuf>) -> Self {
        Self::new(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            path,
        )
    }

    pub fn chmod(path: impl Into<PathBuf>) -> Self {
        Self::new(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)),
            path,
        )
    }

    pub fn remove(path: impl Into<PathBuf>) -> Self {
        Self::new(EventKind::Remove(RemoveKind::File), path)
    }

    pub fn new(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            paths: vec![path.into()],
        }
    }

    pub fn also(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    pub fn build(self) -> Event {
        self.paths
            .into_iter()
            .fold(Event::new(self.kind), |event, path| event.add_path(path))
    }

    /// The event wrapped as the loop receives it.
    pub fn message(self) -> notify::Result<Event> {
        Ok(self.build())
    }
}
