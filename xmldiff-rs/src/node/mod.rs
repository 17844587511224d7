//! Node structures for XML tree representation.
//!
//! The diff engine works against the [`XmlNode`] trait so any parsed tree
//! can be compared. [`Node`] is the owned tree the bundled parser builds.
//!
//! Trees come in two capability levels. A *rich* tree reports the in-scope
//! prefix bindings of each element through
//! [`XmlNode::namespace_bindings`], which lets the report reuse the
//! document's own prefixes. A *minimal* tree leaves that method at its
//! default and the report falls back to the caller's seed table and
//! synthesized `nsN` prefixes.

mod key;
pub mod namespace;
mod xml_content;

pub use key::NodeKey;
pub use xml_content::{Attributes, NamespaceMap, XmlComment, XmlElement, XmlProcessingInstruction};

/// Read access to a node, as needed by the diff engine.
pub trait XmlNode: Sized {
    /// Classifies the node and exposes its content.
    fn content(&self) -> NodeContent<'_, Self>;

    /// In-scope prefix bindings of an element.
    ///
    /// Minimal trees keep the default and report none.
    fn namespace_bindings(&self) -> Option<&NamespaceMap> {
        None
    }
}

/// Borrowed view of a node's content.
#[derive(Debug)]
pub enum NodeContent<'a, N> {
    /// An element.
    Element(ElementRef<'a, N>),
    /// A text run.
    Text(&'a str),
    /// Anything else; the string names the kind for error reporting.
    Other(&'a str),
}

/// Borrowed view of an element.
#[derive(Debug)]
pub struct ElementRef<'a, N> {
    /// Plain or `{uri}local` name.
    pub tag: &'a str,
    /// Attributes keyed by plain or `{uri}local` name.
    pub attributes: &'a Attributes,
    /// Flattened text and element children.
    pub children: &'a [N],
}

impl<N> Clone for ElementRef<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for ElementRef<'_, N> {}

impl<'a, N: XmlNode> ElementRef<'a, N> {
    /// Returns true if at least one child is not text.
    pub fn has_element_children(&self) -> bool {
        self.children
            .iter()
            .any(|child| !matches!(child.content(), NodeContent::Text(_)))
    }

    /// Concatenated text of a text-only child list.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child.content() {
                NodeContent::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

/// A node of a parsed XML tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with flattened children.
    Element(XmlElement),
    /// A text run (element text or tail text).
    Text(String),
    /// A comment, kept only when the parser is asked to.
    Comment(XmlComment),
    /// A processing instruction, kept only when the parser is asked to.
    ProcessingInstruction(XmlProcessingInstruction),
}

impl Node {
    /// Creates a text node.
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the text, if this is a text node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }
}

impl From<XmlElement> for Node {
    fn from(element: XmlElement) -> Self {
        Node::Element(element)
    }
}

impl XmlNode for Node {
    fn content(&self) -> NodeContent<'_, Self> {
        match self {
            Node::Element(e) => NodeContent::Element(ElementRef {
                tag: e.qname(),
                attributes: e.attributes(),
                children: e.children(),
            }),
            Node::Text(t) => NodeContent::Text(t),
            Node::Comment(_) => NodeContent::Other("comment"),
            Node::ProcessingInstruction(_) => NodeContent::Other("processing instruction"),
        }
    }

    fn namespace_bindings(&self) -> Option<&NamespaceMap> {
        self.as_element().and_then(XmlElement::namespaces)
    }
}
