//! Node filters.
//!
//! A filter is asked about element pairs (using the first tree's element)
//! and about every node of a wholly inserted or deleted subtree.

use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::node::Attributes;

/// What a filter sees of a node.
#[derive(Debug, Clone, Copy)]
pub enum FilterTarget<'a> {
    /// An element.
    Element {
        /// Plain or `{uri}local` tag.
        tag: &'a str,
        /// The element's attributes.
        attributes: &'a Attributes,
    },
    /// A text run.
    Text(&'a str),
}

/// A filter's decision about one node.
#[derive(Clone)]
pub enum Verdict {
    /// Show this node and everything below it without asking again.
    ShowAll,
    /// Emit nothing for this node or its subtree.
    Skip,
    /// Show this node and keep asking the same filter below it.
    Descend,
    /// Show this node and ask the given filter below it.
    Narrow(Rc<dyn NodeFilter>),
}

impl std::fmt::Debug for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::ShowAll => write!(f, "ShowAll"),
            Verdict::Skip => write!(f, "Skip"),
            Verdict::Descend => write!(f, "Descend"),
            Verdict::Narrow(_) => write!(f, "Narrow(..)"),
        }
    }
}

/// Decides which parts of the trees take part in the report.
pub trait NodeFilter {
    /// Judges one node.
    fn check(&self, target: &FilterTarget<'_>) -> Verdict;
}

impl<F> NodeFilter for F
where
    F: Fn(&FilterTarget<'_>) -> Verdict,
{
    fn check(&self, target: &FilterTarget<'_>) -> Verdict {
        self(target)
    }
}

/// The filter that shows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl NodeFilter for AcceptAll {
    fn check(&self, _target: &FilterTarget<'_>) -> Verdict {
        Verdict::ShowAll
    }
}

/// Skips elements by tag.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    skipped: FxHashSet<String>,
}

impl TagFilter {
    /// Creates a filter skipping the given plain or `{uri}local` tags.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TagFilter {
            skipped: tags.into_iter().map(Into::into).collect(),
        }
    }
}

impl NodeFilter for TagFilter {
    fn check(&self, target: &FilterTarget<'_>) -> Verdict {
        match target {
            FilterTarget::Element { tag, .. } if self.skipped.contains(*tag) => Verdict::Skip,
            _ => Verdict::Descend,
        }
    }
}

/// The filter to use below a node, or `None` if the node is skipped.
pub(crate) fn next_filter(
    current: &Rc<dyn NodeFilter>,
    target: &FilterTarget<'_>,
) -> Option<Rc<dyn NodeFilter>> {
    match current.check(target) {
        Verdict::Skip => None,
        Verdict::ShowAll => Some(Rc::new(AcceptAll)),
        Verdict::Descend => Some(Rc::clone(current)),
        Verdict::Narrow(filter) => Some(filter),
    }
}
