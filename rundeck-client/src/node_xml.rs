//! Node resource XML codec
//!
//! Reads `<node>` elements from resource listings and writes the `<nodes>`
//! document accepted by the resource update endpoint.

use std::collections::{BTreeMap, BTreeSet};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use rundeck_core::domain::node::Node;

use crate::error::{ClientError, Result};
use crate::xml::Element;

const KIND: &str = "node";

/// Build a [`Node`] from a `<node>` element; unknown attributes are dropped
pub fn parse_node(element: &Element) -> Result<Node> {
    let required = |name: &str| {
        element
            .attr(name)
            .map(str::to_string)
            .ok_or_else(|| ClientError::missing(KIND, name))
    };
    let optional = |name: &str| element.attr(name).map(str::to_string);

    let tags = element.attr("tags").map(|tags| {
        tags.split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
    });

    let attributes: BTreeMap<String, String> = element
        .find_all("attribute")
        .filter_map(|attr| Some((attr.attr("name")?.to_string(), attr.attr("value")?.to_string())))
        .collect();

    Ok(Node {
        name: required("name")?,
        hostname: required("hostname")?,
        username: required("username")?,
        description: optional("description"),
        os_arch: optional("osArch"),
        os_family: optional("osFamily"),
        os_name: optional("osName"),
        tags,
        edit_url: optional("editUrl"),
        remote_url: optional("remoteUrl"),
        attributes,
    })
}

/// Serialize one node as a `<node .../>` fragment
pub fn serialize_node(node: &Node) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_node(&mut writer, node)?;
    into_string(writer)
}

/// Serialize nodes as a `<nodes>` document
pub fn serialize_nodes(nodes: &[Node]) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    emit(&mut writer, Event::Start(BytesStart::new("nodes")))?;
    for node in nodes {
        write_node(&mut writer, node)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("nodes")))?;
    into_string(writer)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<()> {
    let mut start = BytesStart::new("node");
    start.push_attribute(("name", node.name.as_str()));
    start.push_attribute(("hostname", node.hostname.as_str()));
    start.push_attribute(("username", node.username.as_str()));

    let optional = [
        ("description", &node.description),
        ("osArch", &node.os_arch),
        ("osFamily", &node.os_family),
        ("osName", &node.os_name),
        ("editUrl", &node.edit_url),
        ("remoteUrl", &node.remote_url),
    ];
    for (name, value) in optional {
        if let Some(value) = value {
            start.push_attribute((name, value.as_str()));
        }
    }
    if let Some(tags) = &node.tags {
        let joined = tags.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        start.push_attribute(("tags", joined.as_str()));
    }

    if node.attributes.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for (name, value) in &node.attributes {
        let mut attribute = BytesStart::new("attribute");
        attribute.push_attribute(("name", name.as_str()));
        attribute.push_attribute(("value", value.as_str()));
        emit(writer, Event::Empty(attribute))?;
    }
    emit(writer, Event::End(BytesEnd::new("node")))
}

pub(crate) fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| ClientError::InvalidRequest(format!("Failed to write XML: {}", e)))
}

pub(crate) fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner())
        .map_err(|e| ClientError::InvalidRequest(format!("XML output is not UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_node() -> Node {
        let mut node = Node::new("web01", "10.0.0.1", "deploy")
            .with_description("Front & center <web>")
            .with_tag("web")
            .with_tag("prod")
            .with_attribute("rack", "r12")
            .with_attribute("quote", "say \"hi\"");
        node.os_arch = Some("amd64".to_string());
        node.os_family = Some("unix".to_string());
        node.os_name = Some("Linux".to_string());
        node.edit_url = Some("http://cmdb/edit?id=1&x=2".to_string());
        node.remote_url = Some("http://cmdb/remote".to_string());
        node
    }

    #[test]
    fn test_round_trip_full_node() {
        let node = full_node();
        let xml = serialize_node(&node).unwrap();
        let parsed = parse_node(&Element::parse(&xml).unwrap()).unwrap();
        assert_eq!(parsed, node);
    }

    #[test]
    fn test_round_trip_minimal_node() {
        let node = Node::new("db01", "db.internal", "root");
        let xml = serialize_node(&node).unwrap();
        assert!(!xml.contains("tags"));
        assert!(!xml.contains("<attribute"));
        assert_eq!(parse_node(&Element::parse(&xml).unwrap()).unwrap(), node);
    }

    #[test]
    fn test_node_with_cleared_attributes_round_trips() {
        let mut node = full_node();
        node.attributes.clear();
        let xml = serialize_node(&node).unwrap();
        assert!(!xml.contains("<attribute"));
        assert_eq!(parse_node(&Element::parse(&xml).unwrap()).unwrap(), node);
    }

    #[test]
    fn test_serialize_nodes_document() {
        let nodes = vec![full_node(), Node::new("db01", "db.internal", "root")];
        let xml = serialize_nodes(&nodes).unwrap();

        let root = Element::parse(&xml).unwrap();
        assert_eq!(root.tag(), "nodes");
        let parsed: Vec<Node> = root.find_all("node").map(|e| parse_node(e).unwrap()).collect();
        assert_eq!(parsed, nodes);

        let first = root.find("node").unwrap();
        let attrs: Vec<_> = first.find_all("attribute").filter_map(|a| a.attr("name")).collect();
        assert_eq!(attrs, vec!["quote", "rack"]);
    }

    #[test]
    fn test_serialize_empty_nodes_document() {
        let root = Element::parse(&serialize_nodes(&[]).unwrap()).unwrap();
        assert_eq!(root.tag(), "nodes");
        assert!(root.children().is_empty());
    }

    #[test]
    fn test_parse_drops_unknown_attributes() {
        let element = Element::parse(
            r#"<node name="n" hostname="h" username="u" osVersion="5.1" tags=" a , ,b "><attribute name="k" value="v"/><attribute name="nameless"/></node>"#,
        )
        .unwrap();
        let node = parse_node(&element).unwrap();
        assert_eq!(node.tags, Some(["a", "b"].into_iter().map(String::from).collect()));
        assert_eq!(node.attributes.len(), 1);
        assert_eq!(node.os_name, None);
    }

    #[test]
    fn test_parse_requires_identity_fields() {
        let element = Element::parse(r#"<node name="n" hostname="h"/>"#).unwrap();
        assert!(matches!(
            parse_node(&element),
            Err(ClientError::MissingField { kind: "node", ref field }) if field == "username"
        ));
    }
}
