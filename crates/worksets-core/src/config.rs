//! Application configuration (`config.toml`).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct WorksetsConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Also write logs to `debug.log` in the config directory.
    #[serde(default = "default_true")]
    pub debug_log: bool,
    #[serde(default)]
    pub app_chooser: AppChooserConfig,
    #[serde(default)]
    pub prototypes: PrototypeConfig,
}

impl Default for WorksetsConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            debug_log: true,
            app_chooser: AppChooserConfig::default(),
            prototypes: PrototypeConfig::default(),
        }
    }
}

/// Location and pinned hash of the application-chooser helper.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AppChooserConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_sha256: Option<String>,
}

/// JSON templates overriding the built-in session and workset prototypes.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct PrototypeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workset: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: WorksetsConfig = toml::from_str("").unwrap();
        assert_eq!(config, WorksetsConfig::default());
        assert_eq!(config.log_level, "info");
        assert!(config.debug_log);
    }

    #[test]
    fn parses_helper_and_prototypes() {
        let config: WorksetsConfig = toml::from_str(
            r#"
            log_level = "debug"
            debug_log = false

            [app_chooser]
            path = "/usr/lib/worksets/chooser"
            expected_sha256 = "abc"

            [prototypes]
            workset = '{"BackgroundStyle":"SPANNED"}'
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert!(!config.debug_log);
        assert_eq!(
            config.app_chooser.path.as_deref(),
            Some(std::path::Path::new("/usr/lib/worksets/chooser"))
        );
        assert_eq!(config.prototypes.session, None);
        assert!(config.prototypes.workset.unwrap().contains("SPANNED"));
    }
}
