use serde::Serialize;

use super::Workset;

/// A named group of worksets saved together under `collections/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Collection {
    pub collection_name: String,
    pub worksets: Vec<Workset>,
}
