//! XML content types for tree nodes.
//!
//! An element owns its children as one flattened sequence: leading text,
//! then every sub-element followed by its tail text.

use std::collections::BTreeMap;

use super::Node;

/// Attribute map of an element, keyed by (possibly `{uri}`-qualified) name.
pub type Attributes = BTreeMap<String, String>;

/// Prefix to namespace URI bindings.
pub type NamespaceMap = BTreeMap<String, String>;

/// An XML element with a qualified name, attributes and flattened children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// The element name, either `local` or `{uri}local`.
    name: String,
    /// Attributes as key-value pairs.
    attributes: Attributes,
    /// In-scope prefix bindings, present only on namespace-aware trees.
    namespaces: Option<NamespaceMap>,
    /// Text and element children in document order.
    children: Vec<Node>,
}

impl XmlElement {
    /// Creates an element with no attributes and no children.
    pub fn new(name: impl Into<String>) -> Self {
        XmlElement {
            name: name.into(),
            attributes: Attributes::new(),
            namespaces: None,
            children: Vec::new(),
        }
    }

    /// Creates an element from parts, as the parser does.
    pub fn with_parts(
        name: String,
        attributes: Attributes,
        namespaces: Option<NamespaceMap>,
    ) -> Self {
        XmlElement {
            name,
            attributes,
            namespaces,
            children: Vec::new(),
        }
    }

    /// Builder: sets an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: binds a prefix in this element's namespace scope.
    pub fn bind(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces
            .get_or_insert_with(NamespaceMap::new)
            .insert(prefix.into(), uri.into());
        self
    }

    /// Builder: appends a child node.
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.push_child(node.into());
        self
    }

    /// Builder: appends a text child.
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Node::Text(text.into()))
    }

    /// Appends a child node.
    pub fn push_child(&mut self, node: Node) {
        self.children.push(node);
    }

    /// Returns the qualified name of the element.
    pub fn qname(&self) -> &str {
        &self.name
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the in-scope namespace bindings, if the tree recorded them.
    pub fn namespaces(&self) -> Option<&NamespaceMap> {
        self.namespaces.as_ref()
    }

    /// Returns the flattened children.
    pub fn children(&self) -> &[Node] {
        &self.children
    }
}

/// XML comment content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlComment {
    text: String,
}

impl XmlComment {
    /// Creates a comment from its text (without the `<!--`/`-->` markers).
    pub fn new(text: impl Into<String>) -> Self {
        XmlComment { text: text.into() }
    }

    /// Returns the comment text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// XML processing instruction content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlProcessingInstruction {
    /// The target of the PI (e.g., "xml-stylesheet").
    target: String,
    /// Everything after the target.
    content: String,
}

impl XmlProcessingInstruction {
    /// Creates a new PI from target and content strings.
    pub fn new(target: impl Into<String>, content: impl Into<String>) -> Self {
        XmlProcessingInstruction {
            target: target.into(),
            content: content.into(),
        }
    }

    /// Returns the PI target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the PI content.
    pub fn content(&self) -> &str {
        &self.content
    }
}
