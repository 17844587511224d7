//! Identity keys used to align sibling sequences.

use md5::{Digest, Md5};

use super::{Attributes, NodeContent, XmlNode};
use crate::constants::IDENTITY_ATTRIBUTES;
use crate::error::{Error, Result};

/// MD5 identity of a node.
///
/// Elements hash their tag plus the first identity attribute present
/// (`id`, `full-path`, then `name`); every other attribute and all
/// descendants are ignored. Text hashes its full content. Two nodes with
/// equal keys are aligned as the same logical node, so collisions merge
/// unrelated nodes and are not corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey([u8; 16]);

impl NodeKey {
    /// Computes the key of a node.
    pub fn of<N: XmlNode>(node: &N) -> Result<Self> {
        match node.content() {
            NodeContent::Element(e) => Ok(Self::element(e.tag, e.attributes)),
            NodeContent::Text(text) => Ok(Self::text(text)),
            NodeContent::Other(kind) => Err(Error::UnsupportedNodeKind(kind.to_string())),
        }
    }

    /// Key of an element with the given tag and attributes.
    pub fn element(tag: &str, attributes: &Attributes) -> Self {
        let mut hasher = Md5::new();
        hasher.update(b"E");
        hasher.update(tag.as_bytes());
        hasher.update(b"\0");
        if let Some((marker, value)) = IDENTITY_ATTRIBUTES
            .iter()
            .find_map(|(name, marker)| attributes.get(*name).map(|v| (*marker, v)))
        {
            hasher.update([marker]);
            hasher.update(value.as_bytes());
        }
        NodeKey(hasher.finalize().into())
    }

    /// Key of a text run.
    pub fn text(text: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(b"T");
        hasher.update(text.as_bytes());
        NodeKey(hasher.finalize().into())
    }
}
