//! Constants used throughout xmldiff.

/// Indentation added per nesting level of the report.
pub const DEFAULT_INDENT: &str = "  ";

/// Marker column for lines present in both trees.
pub const MARK_UNCHANGED: char = ' ';

/// Marker column for lines only present in the first tree.
pub const MARK_REMOVED: char = '-';

/// Marker column for lines only present in the second tree.
pub const MARK_ADDED: char = '+';

/// The namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The reserved prefix for [`XML_NAMESPACE`].
pub const XML_PREFIX: &str = "xml";

/// Prefix stem for synthesized namespace prefixes (`ns0`, `ns1`, ...).
pub const SYNTHETIC_PREFIX: &str = "ns";

/// Attributes that identify an element for alignment, in priority order.
///
/// Each entry pairs the attribute name with the tag byte mixed into the key.
pub const IDENTITY_ATTRIBUTES: [(&str, u8); 3] = [("id", b'I'), ("full-path", b'F'), ("name", b'N')];

/// Namespace seeds the command-line tool starts from.
pub const DEFAULT_NAMESPACES: [(&str, &str); 1] =
    [("office", "urn:oasis:names:tc:opendocument:xmlns:office:1.0")];
