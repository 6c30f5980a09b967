//! Project domain types

use serde::{Deserialize, Serialize};

use super::Fields;

/// A project as listed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: Option<String>,
    /// Resource model provider settings, when the server includes them
    pub resources: Option<Fields>,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub extra: Fields,
}
