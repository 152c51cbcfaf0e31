use serde::Serialize;

/// A favorite application pinned by a workset.
///
/// `name` is the desktop-entry id (e.g. `firefox.desktop`) and doubles as the
/// identity used for de-duplication. `exec` has always been through
/// [`crate::validator::validate_exec_string`] and is either empty or safe to
/// tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavApp {
    pub name: String,
    pub display_name: String,
    pub icon: String,
    pub exec: String,
}

impl FavApp {
    /// Creates an entry that only carries the application id.
    pub fn from_id(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            ..Default::default()
        }
    }
}
