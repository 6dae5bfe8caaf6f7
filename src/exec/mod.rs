// src/exec/mod.rs

//! In-place process replacement.
//!
//! - [`backend`] provides the `Restarter` trait the watcher calls on a
//!   qualifying self-change, and the production `ExecRestarter`.
//! - [`replace`] performs the actual image replacement.

pub mod backend;
pub mod replace;

pub use backend::{ExecRestarter, Restarter};
pub use replace::replace_process;
