//! Storage layer: atomic file writes, the JSON store and file naming.

mod atomic_toml;
mod file_ops;
mod json_store;
pub mod naming;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use file_ops::FileLock;
pub use json_store::{ChildEntry, EnumerateOptions, JsonStore, JsonStoreError};
