//! Structural diff of two XML trees.
//!
//! This module compares two trees node by node and writes a line oriented
//! report: every line carries a marker column (` `, `-` or `+`), the
//! indentation of its depth and a fragment of XML. Unchanged subtrees
//! collapse to nothing; changes are shown with their enclosing open and
//! close tags.
//!
//! A diff runs twice over the same trees. The first pass writes to a
//! discarding sink and only allocates namespace prefixes; once every prefix
//! is known the allocation is closed and the second pass renders the report,
//! so the root line can declare every prefix the report uses.

mod attributes;
mod differ;
mod escape;
mod filter;
mod formatter;
mod namespaces;

use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use tracing::debug;

pub use attributes::{AttributeDelta, AttributeEdit};
pub use escape::{escape_attribute, escape_text};
pub use filter::{AcceptAll, FilterTarget, NodeFilter, TagFilter, Verdict};
pub use formatter::{Formatter, Marker, OpenSection, Subsection};
pub use namespaces::{AllocationPhase, NamespaceState, NsDecl, Side};

use crate::constants::DEFAULT_INDENT;
use crate::error::Result;
use crate::node::{NamespaceMap, XmlNode};
use differ::TreeDiffer;

/// Settings of one diff invocation.
#[derive(Clone)]
pub struct DiffOptions {
    /// Indentation added per nesting level.
    pub indent: String,
    /// Prefixes the report uses before any it invents.
    pub namespaces: NamespaceMap,
    /// Decides which nodes take part; everything when unset.
    pub filter: Option<Rc<dyn NodeFilter>>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            indent: DEFAULT_INDENT.to_string(),
            namespaces: NamespaceMap::new(),
            filter: None,
        }
    }
}

impl fmt::Debug for DiffOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiffOptions")
            .field("indent", &self.indent)
            .field("namespaces", &self.namespaces)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .finish()
    }
}

impl DiffOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a prefix for a namespace URI.
    pub fn with_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), uri.into());
        self
    }

    /// Seeds several prefixes at once.
    pub fn with_namespaces<I, P, U>(mut self, namespaces: I) -> Self
    where
        I: IntoIterator<Item = (P, U)>,
        P: Into<String>,
        U: Into<String>,
    {
        self.namespaces
            .extend(namespaces.into_iter().map(|(p, u)| (p.into(), u.into())));
        self
    }

    /// Uses `unit` as the indentation step.
    pub fn with_indent(mut self, unit: impl Into<String>) -> Self {
        self.indent = unit.into();
        self
    }

    /// Indents by `width` spaces per level.
    pub fn with_indent_width(self, width: usize) -> Self {
        self.with_indent(" ".repeat(width))
    }

    /// Restricts the report with a filter.
    pub fn with_filter(mut self, filter: impl NodeFilter + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    fn root_filter(&self) -> Rc<dyn NodeFilter> {
        match &self.filter {
            Some(filter) => Rc::clone(filter),
            None => Rc::new(AcceptAll),
        }
    }
}

/// Diffs `a` against `b` and writes the report to `sink`.
///
/// Returns the sink once everything is written. Identical trees produce no
/// output at all.
///
/// # Example
///
/// ```
/// use xmldiff::{parse_str, xml_diff, DiffOptions};
///
/// let a = parse_str("<a><b/><c/></a>").unwrap();
/// let b = parse_str("<a><c/><d/></a>").unwrap();
/// let out = xml_diff(&a, &b, &DiffOptions::default(), Vec::new()).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     " <a>\n-  <b/>\n   <c/>\n+  <d/>\n </a>\n"
/// );
/// ```
pub fn xml_diff<N, W>(a: &N, b: &N, options: &DiffOptions, sink: W) -> Result<W>
where
    N: XmlNode,
    W: Write,
{
    let mut ns = NamespaceState::new(&options.namespaces);
    let filter = options.root_filter();

    debug!(seeds = options.namespaces.len(), "plan pass");
    run_pass(a, b, options, &filter, &mut ns, io::sink())?;

    ns.close_allocation();
    debug!("render pass");
    run_pass(a, b, options, &filter, &mut ns, sink)
}

/// Diffs `a` against `b` and returns the report as a string.
pub fn xml_diff_to_string<N: XmlNode>(a: &N, b: &N, options: &DiffOptions) -> Result<String> {
    let out = xml_diff(a, b, options, Vec::new())?;
    // Every line is built from `&str` fragments.
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn run_pass<N: XmlNode, W: Write>(
    a: &N,
    b: &N,
    options: &DiffOptions,
    filter: &Rc<dyn NodeFilter>,
    ns: &mut NamespaceState,
    sink: W,
) -> Result<W> {
    let fmt = Formatter::with_indent(sink, options.indent.as_str());
    let mut differ = TreeDiffer::new(fmt, ns);
    differ.diff(Some(a), Some(b), filter)?;
    differ.finish()
}
