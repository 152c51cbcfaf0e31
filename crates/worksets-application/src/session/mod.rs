//! Session application services.
//!
//! The factory builds new sessions and worksets from prototypes; the manager
//! owns the live session and serializes every operation on it.

mod factory;
mod manager;

#[cfg(test)]
mod manager_test;

pub use factory::SessionFactory;
pub use manager::SessionManager;
