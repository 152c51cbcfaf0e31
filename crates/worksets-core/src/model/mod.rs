//! Domain records persisted in `session.json` and the saved object files.
//!
//! Records serialize with the on-disk field names but do not
//! implement `Deserialize`: every record read from JSON goes through
//! [`crate::validator`], which is the only way to construct one from
//! untrusted data.

mod collection;
mod fav_app;
mod options;
mod session;
mod workset;
mod workspace_map;

pub use collection::Collection;
pub use fav_app::FavApp;
pub use options::{BoolOption, Options};
pub use session::Session;
pub use workset::{BackgroundStyle, Workset};
pub use workspace_map::{SLOT_COUNT, WorkspaceMapEntry, WorkspaceMaps, WorkspaceSlot};
