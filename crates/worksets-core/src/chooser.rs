//! The external application-chooser helper.
//!
//! The helper is a separate executable started as
//! `<path> --workset <name>`. It prints the picked application as a JSON
//! object on the first non-empty line of stdout, or nothing on cancel.
//! `<path> --version` only prints its version.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use tracing::warn;

use crate::error::Result;
use crate::model::FavApp;
use crate::validator;

#[async_trait]
pub trait AppChooser: Send + Sync {
    /// Runs the helper for `workset_name` and returns its raw stdout.
    ///
    /// `Ok(None)` means the user cancelled or the helper printed nothing.
    async fn choose_app(&self, workset_name: &str) -> Result<Option<String>>;
}

/// What the helper is started for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChooserRequest<'a> {
    /// Pick an application for the named workset.
    Pick { workset_name: &'a str },
    Version,
}

/// Argument vector for launching the helper.
pub fn chooser_argv(helper: &Path, request: ChooserRequest<'_>) -> Vec<String> {
    let mut argv = vec![helper.to_string_lossy().into_owned()];
    match request {
        ChooserRequest::Pick { workset_name } => {
            argv.push("--workset".to_string());
            argv.push(workset_name.to_string());
        }
        ChooserRequest::Version => argv.push("--version".to_string()),
    }
    argv
}

/// Parses the helper's stdout into a validated favorite.
pub fn parse_chooser_output(stdout: &str) -> Option<FavApp> {
    let line = stdout.lines().map(str::trim).find(|line| !line.is_empty())?;
    match serde_json::from_str::<Value>(line) {
        Ok(value) => validator::validate_fav_app(&value, 0),
        Err(e) => {
            warn!("[AppChooser] ignoring unparsable output: {}", e);
            None
        }
    }
}
