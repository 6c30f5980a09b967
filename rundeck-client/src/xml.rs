//! Owned XML element tree
//!
//! Responses are parsed once with `roxmltree` and converted into an owned tree
//! so that envelopes can outlive the source text and travel inside errors.

/// An XML element with its attributes, leading text and element children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element
    pub fn parse(document: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(document)?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            text: node.text().map(str::to_string),
            children: node
                .children()
                .filter(|child| child.is_element())
                .map(Self::from_node)
                .collect(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attributes in document order
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Leading text content; `None` when absent, empty or whitespace only
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.trim().is_empty())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First direct child with the given tag
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// All direct children with the given tag, in document order
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Text of the first direct child with the given tag
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.find(tag).and_then(Element::text)
    }

    /// Remove and return the first direct child with the given tag
    pub fn detach(&mut self, tag: &str) -> Option<Element> {
        let index = self.children.iter().position(|child| child.tag == tag)?;
        Some(self.children.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<result success="true" apiversion="11">
        <item id="1"><name>first</name></item>
        <other/>
        <item id="2"><name>  </name></item>
    </result>"#;

    #[test]
    fn test_parse_keeps_element_children_only() {
        let root = Element::parse(DOC).unwrap();
        assert_eq!(root.tag(), "result");
        assert_eq!(root.attr("apiversion"), Some("11"));
        assert_eq!(root.children().len(), 3);
        assert_eq!(root.text(), None);
    }

    #[test]
    fn test_find_and_find_all() {
        let root = Element::parse(DOC).unwrap();
        let ids: Vec<_> = root.find_all("item").filter_map(|e| e.attr("id")).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(root.find("item").and_then(|e| e.child_text("name")), Some("first"));
        assert!(root.find("missing").is_none());
    }

    #[test]
    fn test_whitespace_text_is_absent() {
        let root = Element::parse(DOC).unwrap();
        let second = root.find_all("item").nth(1).unwrap();
        assert_eq!(second.child_text("name"), None);
    }

    #[test]
    fn test_detach_removes_first_match() {
        let mut root = Element::parse(DOC).unwrap();
        let detached = root.detach("item").unwrap();
        assert_eq!(detached.attr("id"), Some("1"));
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.find("item").and_then(|e| e.attr("id")), Some("2"));
        assert!(root.detach("missing").is_none());
    }

    #[test]
    fn test_rejects_malformed_document() {
        assert!(Element::parse("<result><unclosed></result>").is_err());
        assert!(Element::parse("").is_err());
    }
}
