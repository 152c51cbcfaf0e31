//! Application layer for worksets.
//!
//! This crate ties the domain core to storage and to the desktop: the
//! session manager runs every user action and desktop event against the live
//! session, and the application context owns it between enable and disable.

pub mod context;
pub mod session;

pub use context::AppContext;
pub use session::{SessionFactory, SessionManager};
