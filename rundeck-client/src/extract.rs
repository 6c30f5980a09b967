//! Field extraction helpers
//!
//! Turn XML elements into flat key/value mappings. None of these touch the
//! element they read.

use rundeck_core::domain::{Attributes, Fields};

use crate::xml::Element;

/// All attributes of an element
pub fn attributes_of(node: &Element) -> Attributes {
    node.attributes()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

/// Direct children's text keyed by tag; a repeated tag keeps its last value
pub fn child_text_of(node: &Element) -> Fields {
    node.children()
        .iter()
        .map(|child| (child.tag().to_string(), child.text().map(str::to_string)))
        .collect()
}

/// Attributes merged with child text; child text wins on a shared key
pub fn node_to_mapping(node: &Element) -> Fields {
    let mut fields: Fields = attributes_of(node)
        .into_iter()
        .map(|(name, value)| (name, Some(value)))
        .collect();
    fields.extend(child_text_of(node));
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(doc: &str) -> Element {
        Element::parse(doc).unwrap()
    }

    #[test]
    fn test_attributes_of() {
        let node = element(r#"<job id="abc" href="http://x/job/abc"><name>n</name></job>"#);
        let attrs = attributes_of(&node);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["id"], "abc");
        assert_eq!(attrs["href"], "http://x/job/abc");
        assert!(attributes_of(&element("<empty/>")).is_empty());
    }

    #[test]
    fn test_child_text_of_absent_text_and_repeats() {
        let node = element(
            "<job><name>backup</name><description/><tag>a</tag><tag>b</tag></job>",
        );
        let fields = child_text_of(&node);
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["name"].as_deref(), Some("backup"));
        assert_eq!(fields["description"], None);
        assert_eq!(fields["tag"].as_deref(), Some("b"));
    }

    #[test]
    fn test_node_to_mapping_child_text_wins() {
        let node = element(r#"<execution id="7" status="running"><status>succeeded</status></execution>"#);
        let fields = node_to_mapping(&node);
        assert_eq!(fields["id"].as_deref(), Some("7"));
        assert_eq!(fields["status"].as_deref(), Some("succeeded"));
    }

    #[test]
    fn test_extraction_is_idempotent_and_non_mutating() {
        let node = element(r#"<project url="u"><name>demo</name><resources><providerURL>p</providerURL></resources></project>"#);
        let before = node.clone();

        assert_eq!(node_to_mapping(&node), node_to_mapping(&node));
        assert_eq!(child_text_of(&node), child_text_of(&node));
        assert_eq!(attributes_of(&node), attributes_of(&node));
        assert_eq!(node, before);
    }
}
