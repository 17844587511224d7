//! XML parsing.
//!
//! Builds [`Node`](crate::node::Node) trees with flattened children and
//! `{uri}local` names, ready for the diff engine.

mod parser;

pub use parser::{parse_file, parse_str, ParserOptions, XmlParser};
