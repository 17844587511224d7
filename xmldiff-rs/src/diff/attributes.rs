//! Attribute comparison of an element pair.

use crate::node::Attributes;

/// How an attribute differs between the two elements of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeEdit {
    /// Only on the first element.
    Removed,
    /// Only on the second element.
    Added,
    /// On both, with different values.
    Changed,
}

/// Four-way partition of the attribute names of an element pair.
///
/// Every name of either element lands in exactly one set; each set is in
/// name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDelta<'a> {
    /// On both with equal values.
    pub unchanged: Vec<&'a str>,
    /// On both with different values.
    pub changed: Vec<&'a str>,
    /// Only on the first element.
    pub removed: Vec<&'a str>,
    /// Only on the second element.
    pub added: Vec<&'a str>,
}

impl<'a> AttributeDelta<'a> {
    /// Partitions the names of `a` and `b`.
    pub fn partition(a: &'a Attributes, b: &'a Attributes) -> Self {
        let mut delta = AttributeDelta::default();
        for (name, value) in a {
            match b.get(name) {
                Some(other) if other == value => delta.unchanged.push(name.as_str()),
                Some(_) => delta.changed.push(name.as_str()),
                None => delta.removed.push(name.as_str()),
            }
        }
        for name in b.keys() {
            if !a.contains_key(name) {
                delta.added.push(name.as_str());
            }
        }
        delta
    }

    /// True if no attribute differs.
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty() && self.added.is_empty()
    }

    /// Every differing name with its kind, in name order.
    pub fn edits(&self) -> Vec<(&'a str, AttributeEdit)> {
        let mut edits: Vec<(&'a str, AttributeEdit)> = self
            .removed
            .iter()
            .map(|name| (*name, AttributeEdit::Removed))
            .chain(self.added.iter().map(|name| (*name, AttributeEdit::Added)))
            .chain(self.changed.iter().map(|name| (*name, AttributeEdit::Changed)))
            .collect();
        edits.sort_by(|x, y| x.0.cmp(y.0));
        edits
    }
}
