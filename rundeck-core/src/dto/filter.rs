//! Node filters

use serde::{Deserialize, Serialize};

use super::{Params, push_opt};

/// Node inclusion and exclusion filters shared by job runs, adhoc executions
/// and resource listings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFilter {
    pub hostname: Option<String>,
    pub tags: Option<String>,
    pub os_name: Option<String>,
    pub os_family: Option<String>,
    pub os_arch: Option<String>,
    pub os_version: Option<String>,
    pub name: Option<String>,

    pub exclude_hostname: Option<String>,
    pub exclude_tags: Option<String>,
    pub exclude_os_name: Option<String>,
    pub exclude_os_family: Option<String>,
    pub exclude_os_arch: Option<String>,
    pub exclude_os_version: Option<String>,
    pub exclude_name: Option<String>,

    /// Whether exclusion filters win over inclusion filters
    pub exclude_precedence: Option<bool>,
}

impl NodeFilter {
    /// Whether no filter is set
    pub fn is_empty(&self) -> bool {
        *self == NodeFilter::default()
    }

    pub fn append_params(&self, params: &mut Params) {
        let fields = [
            ("hostname", &self.hostname),
            ("tags", &self.tags),
            ("os-name", &self.os_name),
            ("os-family", &self.os_family),
            ("os-arch", &self.os_arch),
            ("os-version", &self.os_version),
            ("name", &self.name),
            ("exclude-hostname", &self.exclude_hostname),
            ("exclude-tags", &self.exclude_tags),
            ("exclude-os-name", &self.exclude_os_name),
            ("exclude-os-family", &self.exclude_os_family),
            ("exclude-os-arch", &self.exclude_os_arch),
            ("exclude-os-version", &self.exclude_os_version),
            ("exclude-name", &self.exclude_name),
        ];
        for (key, value) in fields {
            push_opt(params, key, value.as_ref());
        }
        push_opt(params, "exclude-precedence", self.exclude_precedence.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::lookup;

    #[test]
    fn test_empty_filter_adds_nothing() {
        let mut params = Params::new();
        NodeFilter::default().append_params(&mut params);
        assert!(params.is_empty());
        assert!(NodeFilter::default().is_empty());
    }

    #[test]
    fn test_filter_uses_wire_keys() {
        let filter = NodeFilter {
            os_family: Some("unix".to_string()),
            exclude_tags: Some("canary".to_string()),
            exclude_precedence: Some(false),
            ..Default::default()
        };
        let mut params = Params::new();
        filter.append_params(&mut params);

        assert_eq!(params.len(), 3);
        assert_eq!(lookup(&params, "os-family"), Some("unix"));
        assert_eq!(lookup(&params, "exclude-tags"), Some("canary"));
        assert_eq!(lookup(&params, "exclude-precedence"), Some("false"));
        assert!(!filter.is_empty());
    }
}
