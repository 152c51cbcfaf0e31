use serde::Serialize;

/// Boolean session options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOption {
    ShowNotifications,
    ShowHelpers,
    IsolateWorkspaces,
    ShowPanelIndicator,
    ShowWorkspaceOverlay,
    ShowOverlayThumbnailLabels,
    HideAppList,
    DisableWallpaperManagement,
    ReverseMenu,
    DebugMode,
    GrayscaleIcon,
}

impl BoolOption {
    pub const ALL: [BoolOption; 11] = [
        BoolOption::ShowNotifications,
        BoolOption::ShowHelpers,
        BoolOption::IsolateWorkspaces,
        BoolOption::ShowPanelIndicator,
        BoolOption::ShowWorkspaceOverlay,
        BoolOption::ShowOverlayThumbnailLabels,
        BoolOption::HideAppList,
        BoolOption::DisableWallpaperManagement,
        BoolOption::ReverseMenu,
        BoolOption::DebugMode,
        BoolOption::GrayscaleIcon,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            BoolOption::ShowNotifications => "ShowNotifications",
            BoolOption::ShowHelpers => "ShowHelpers",
            BoolOption::IsolateWorkspaces => "IsolateWorkspaces",
            BoolOption::ShowPanelIndicator => "ShowPanelIndicator",
            BoolOption::ShowWorkspaceOverlay => "ShowWorkspaceOverlay",
            BoolOption::ShowOverlayThumbnailLabels => "ShowOverlayThumbnailLabels",
            BoolOption::HideAppList => "HideAppList",
            BoolOption::DisableWallpaperManagement => "DisableWallpaperManagement",
            BoolOption::ReverseMenu => "ReverseMenu",
            BoolOption::DebugMode => "DebugMode",
            BoolOption::GrayscaleIcon => "GrayscaleIcon",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|option| option.key() == key)
    }
}

/// Session-wide flags. Absent keys are omitted from the JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_notifications: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_helpers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolate_workspaces: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_panel_indicator: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_workspace_overlay: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_overlay_thumbnail_labels: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_app_list: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_wallpaper_management: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_menu: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grayscale_icon: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cli_switch: Option<String>,
}

impl Options {
    pub fn flag(&self, option: BoolOption) -> Option<bool> {
        match option {
            BoolOption::ShowNotifications => self.show_notifications,
            BoolOption::ShowHelpers => self.show_helpers,
            BoolOption::IsolateWorkspaces => self.isolate_workspaces,
            BoolOption::ShowPanelIndicator => self.show_panel_indicator,
            BoolOption::ShowWorkspaceOverlay => self.show_workspace_overlay,
            BoolOption::ShowOverlayThumbnailLabels => self.show_overlay_thumbnail_labels,
            BoolOption::HideAppList => self.hide_app_list,
            BoolOption::DisableWallpaperManagement => self.disable_wallpaper_management,
            BoolOption::ReverseMenu => self.reverse_menu,
            BoolOption::DebugMode => self.debug_mode,
            BoolOption::GrayscaleIcon => self.grayscale_icon,
        }
    }

    /// Whether the option is set to `true`; absent counts as off.
    pub fn is_enabled(&self, option: BoolOption) -> bool {
        self.flag(option).unwrap_or(false)
    }

    pub fn set_flag(&mut self, option: BoolOption, value: bool) {
        let slot = match option {
            BoolOption::ShowNotifications => &mut self.show_notifications,
            BoolOption::ShowHelpers => &mut self.show_helpers,
            BoolOption::IsolateWorkspaces => &mut self.isolate_workspaces,
            BoolOption::ShowPanelIndicator => &mut self.show_panel_indicator,
            BoolOption::ShowWorkspaceOverlay => &mut self.show_workspace_overlay,
            BoolOption::ShowOverlayThumbnailLabels => &mut self.show_overlay_thumbnail_labels,
            BoolOption::HideAppList => &mut self.hide_app_list,
            BoolOption::DisableWallpaperManagement => &mut self.disable_wallpaper_management,
            BoolOption::ReverseMenu => &mut self.reverse_menu,
            BoolOption::DebugMode => &mut self.debug_mode,
            BoolOption::GrayscaleIcon => &mut self.grayscale_icon,
        };
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_flags_are_omitted() {
        let mut options = Options::default();
        options.set_flag(BoolOption::ShowHelpers, true);
        options.cli_switch = Some("dash".into());

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({ "ShowHelpers": true, "CliSwitch": "dash" })
        );
    }

    #[test]
    fn keys_match_serialized_names() {
        let mut options = Options::default();
        for option in BoolOption::ALL {
            options.set_flag(option, true);
        }
        let value = serde_json::to_value(&options).unwrap();
        for option in BoolOption::ALL {
            assert_eq!(value[option.key()], json!(true), "{}", option.key());
            assert_eq!(BoolOption::from_key(option.key()), Some(option));
        }
    }
}
