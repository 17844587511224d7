//! Error types for xmldiff.

use thiserror::Error;

/// Result type alias for xmldiff operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or diffing XML trees.
///
/// Every variant is terminal for the diff invocation that raised it; the
/// engine never produces a partial report.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A `{uri}local` name without the closing brace.
    #[error("malformed qualified name: {0}")]
    MalformedQualifiedName(String),

    /// A node that is neither an element nor text reached the engine.
    #[error("unsupported node type: {0}")]
    UnsupportedNodeKind(String),

    /// The render pass tried to allocate a prefix the plan pass never saw.
    #[error("namespace allocation is closed, cannot allocate a prefix for {0}")]
    NamespaceAllocationClosed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
