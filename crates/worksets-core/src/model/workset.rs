use serde::Serialize;
use std::fmt;

use super::FavApp;

/// How a background image is laid out on the desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BackgroundStyle {
    None,
    Wallpaper,
    Centered,
    Scaled,
    #[default]
    Zoom,
    Stretched,
    Spanned,
}

impl BackgroundStyle {
    pub const ALL: [BackgroundStyle; 7] = [
        BackgroundStyle::None,
        BackgroundStyle::Wallpaper,
        BackgroundStyle::Centered,
        BackgroundStyle::Scaled,
        BackgroundStyle::Zoom,
        BackgroundStyle::Stretched,
        BackgroundStyle::Spanned,
    ];

    /// Canonical names, in the order the desktop lists them.
    pub const NAMES: [&'static str; 7] = [
        "NONE",
        "WALLPAPER",
        "CENTERED",
        "SCALED",
        "ZOOM",
        "STRETCHED",
        "SPANNED",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackgroundStyle::None => "NONE",
            BackgroundStyle::Wallpaper => "WALLPAPER",
            BackgroundStyle::Centered => "CENTERED",
            BackgroundStyle::Scaled => "SCALED",
            BackgroundStyle::Zoom => "ZOOM",
            BackgroundStyle::Stretched => "STRETCHED",
            BackgroundStyle::Spanned => "SPANNED",
        }
    }

    /// Looks up a canonical (upper-case) style name.
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == name)
    }
}

impl fmt::Display for BackgroundStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named bundle of favorites and background settings bound to a workspace.
///
/// `active` and `active_workspace_index` are runtime bookkeeping owned by the
/// workspace synchronizer. They are never written to disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Workset {
    pub workset_name: String,
    pub background_image: String,
    pub background_image_dark: String,
    pub background_style: BackgroundStyle,
    pub background_style_dark: BackgroundStyle,
    pub fav_apps: Vec<FavApp>,
    #[serde(skip)]
    pub active: bool,
    #[serde(skip)]
    pub active_workspace_index: Option<usize>,
}

impl Workset {
    /// Creates an empty workset with default styles.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            workset_name: name.into(),
            background_image: String::new(),
            background_image_dark: String::new(),
            background_style: BackgroundStyle::default(),
            background_style_dark: BackgroundStyle::default(),
            fav_apps: Vec::new(),
            active: false,
            active_workspace_index: None,
        }
    }

    pub fn has_favorite(&self, app_id: &str) -> bool {
        self.fav_apps.iter().any(|app| app.name == app_id)
    }

    /// Favorite ids in display order, skipping entries without an id.
    pub fn favorite_ids(&self) -> Vec<String> {
        self.fav_apps
            .iter()
            .filter(|app| !app.name.is_empty())
            .map(|app| app.name.clone())
            .collect()
    }

    /// Returns the background image and style for the given color scheme.
    ///
    /// The dark variant is used only when one is configured.
    pub fn background_for(&self, prefers_dark: bool) -> (&str, BackgroundStyle) {
        if prefers_dark && !self.background_image_dark.is_empty() {
            (&self.background_image_dark, self.background_style_dark)
        } else {
            (&self.background_image, self.background_style)
        }
    }

    pub(crate) fn clear_runtime_state(&mut self) {
        self.active = false;
        self.active_workspace_index = None;
    }
}
