// src/config/mod.rs

//! Optional `Reload.toml` configuration for the `selfreload` binary.
//!
//! The library itself takes everything through [`crate::Reloader`]; this
//! module only maps a file (plus CLI overrides) onto it.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, RawConfigFile, ReloadSection, WatchEntry};
