//! Keeps the desktop's workspaces and the session's slot assignments in step.

mod synchronizer;

pub use synchronizer::{Activation, WorkspaceSynchronizer, required_workspaces};
