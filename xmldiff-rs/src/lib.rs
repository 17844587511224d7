//! xmldiff - structural XML tree diff
//!
//! This library compares two XML documents as trees rather than as lines of
//! text and prints a readable report of what changed.
//!
//! # Overview
//!
//! Children of each matched element pair are aligned with a longest common
//! subsequence over identity keys: the tag plus the first of the `id`,
//! `full-path` or `name` attributes. Aligned pairs are compared recursively;
//! unaligned nodes are printed whole as removed or added.
//!
//! The report looks like a unified diff of the XML itself:
//!
//! ```text
//!  <a>
//! -  <b/>
//!    <c/>
//! +  <d/>
//!  </a>
//! ```
//!
//! Namespaced names are printed as `prefix:local`. Prefixes come from the
//! caller's seed table, from the documents' own declarations, or are
//! invented as `ns0`, `ns1`, and so on.
//!
//! # Example
//!
//! ```
//! use xmldiff::{parse_str, xml_diff_to_string, DiffOptions};
//!
//! let a = parse_str(r#"<a x="1"/>"#).unwrap();
//! let b = parse_str(r#"<a x="2"/>"#).unwrap();
//! let report = xml_diff_to_string(&a, &b, &DiffOptions::default()).unwrap();
//! assert_eq!(report, " <a\n-  x=\"1\"\n+  x=\"2\"/>\n");
//! ```

pub mod constants;
pub mod diff;
pub mod error;
pub mod matching;
pub mod node;
pub mod xml;

// Re-export commonly used types
pub use constants::*;
pub use error::{Error, Result};
pub use matching::{align, lcs_length, Slot};
pub use node::{
    Attributes, ElementRef, NamespaceMap, Node, NodeContent, NodeKey, XmlComment, XmlElement,
    XmlNode, XmlProcessingInstruction,
};
pub use xml::{parse_file, parse_str, ParserOptions, XmlParser};

// Re-export diff types
pub use diff::{
    xml_diff, xml_diff_to_string, AcceptAll, DiffOptions, FilterTarget, NodeFilter, TagFilter,
    Verdict,
};
