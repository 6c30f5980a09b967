//! Node resource types
//!
//! A node is a host the server can dispatch commands to. Only the fields
//! declared here survive a read/write cycle; anything else the server reports
//! for a node is dropped.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A node resource in a project's resource model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique within a project
    pub name: String,
    pub hostname: String,
    /// User for remote connections
    pub username: String,
    pub description: Option<String>,
    pub os_arch: Option<String>,
    pub os_family: Option<String>,
    pub os_name: Option<String>,
    /// Filtering tags
    pub tags: Option<BTreeSet<String>>,
    /// URL to an external resource model editor
    pub edit_url: Option<String>,
    /// URL to an external resource model service
    pub remote_url: Option<String>,
    /// Custom name/value attributes; empty when the node has none
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl Node {
    /// Creates a node with only the mandatory fields set
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            username: username.into(),
            description: None,
            os_arch: None,
            os_family: None,
            os_name: None,
            tags: None,
            edit_url: None,
            remote_url: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds a filtering tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(BTreeSet::new).insert(tag.into());
        self
    }

    /// Adds a custom attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
