//! Domain core for worksets: records, validation, and the workspace synchronizer.
//!
//! Nothing in this crate touches the file system except the validator's path
//! and integrity checks. Storage lives in `worksets-infrastructure` and the
//! orchestration of user actions in `worksets-application`.

pub mod chooser;
pub mod config;
pub mod desktop;
pub mod error;
pub mod model;
pub mod prompt;
pub mod repository;
pub mod validator;
pub mod workspace;

pub use error::{Result, WorksetsError};
