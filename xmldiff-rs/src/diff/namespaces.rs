//! Namespace prefix bookkeeping for the report.
//!
//! The report has to print `prefix:local` names and the `xmlns:prefix`
//! declarations that make them valid. [`NamespaceState`] keeps one global
//! prefix table shared by both trees plus, for each tree, a stack of the
//! bindings already declared by enclosing report lines.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::formatter::Marker;
use crate::constants::{SYNTHETIC_PREFIX, XML_NAMESPACE, XML_PREFIX};
use crate::error::{Error, Result};
use crate::node::namespace::split_clark_name;
use crate::node::{NamespaceMap, XmlNode};

/// Which input tree a stack frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first (old) tree.
    A,
    /// The second (new) tree.
    B,
}

/// Whether new prefixes may still be allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationPhase {
    /// The plan pass: unknown URIs get fresh prefixes.
    Planning,
    /// The render pass: every prefix must already exist.
    Rendering,
}

/// One namespace declaration line of an element pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// Unchanged, removed or added.
    pub marker: Marker,
    /// The declared prefix.
    pub prefix: String,
    /// The namespace URI it binds.
    pub uri: String,
}

impl NsDecl {
    fn new(marker: Marker, prefix: &str, uri: &str) -> Self {
        NsDecl {
            marker,
            prefix: prefix.to_string(),
            uri: uri.to_string(),
        }
    }
}

/// Prefix table and per-tree declaration stacks.
#[derive(Debug)]
pub struct NamespaceState {
    /// Global prefix -> URI table.
    fwd: NamespaceMap,
    /// Global URI -> prefix table.
    rev: FxHashMap<String, String>,
    /// URIs resolved through a node's own bindings.
    used: FxHashSet<String>,
    /// Next synthetic prefix number to try.
    nsid: usize,
    /// Declared bindings per depth, first tree.
    a: Vec<NamespaceMap>,
    /// Declared bindings per depth, second tree.
    b: Vec<NamespaceMap>,
    phase: AllocationPhase,
}

impl NamespaceState {
    /// Creates a state seeded with caller-supplied prefixes.
    pub fn new(seed: &NamespaceMap) -> Self {
        let mut state = NamespaceState {
            fwd: NamespaceMap::new(),
            rev: FxHashMap::default(),
            used: FxHashSet::default(),
            nsid: 0,
            a: vec![NamespaceMap::new()],
            b: vec![NamespaceMap::new()],
            phase: AllocationPhase::Planning,
        };
        for (prefix, uri) in seed {
            state.register(prefix, uri);
        }
        state
    }

    fn register(&mut self, prefix: &str, uri: &str) {
        self.fwd.insert(prefix.to_string(), uri.to_string());
        self.rev.insert(uri.to_string(), prefix.to_string());
    }

    /// The current allocation phase.
    pub fn phase(&self) -> AllocationPhase {
        self.phase
    }

    /// Forbids further allocation; the render pass may only resolve.
    pub fn close_allocation(&mut self) {
        debug!(prefixes = self.fwd.len(), "namespace allocation closed");
        self.phase = AllocationPhase::Rendering;
    }

    /// The global prefix table.
    pub fn prefixes(&self) -> &NamespaceMap {
        &self.fwd
    }

    /// Stack depth of both trees.
    pub fn depth(&self) -> (usize, usize) {
        (self.a.len(), self.b.len())
    }

    /// Finds a prefix for `uri` without allocating.
    ///
    /// The global table wins; otherwise the node's own bindings are searched
    /// and a hit marks the URI as used so later frames declare it. A node
    /// binding cannot take a prefix the global table holds for another URI.
    pub fn lookup<N: XmlNode>(&mut self, uri: &str, node: &N) -> Option<String> {
        if uri == XML_NAMESPACE {
            return Some(XML_PREFIX.to_string());
        }
        if let Some(prefix) = self.rev.get(uri) {
            return Some(prefix.clone());
        }
        let bindings = node.namespace_bindings()?;
        let (prefix, _) = bindings
            .iter()
            .find(|(prefix, bound)| bound.as_str() == uri && !self.shadows(prefix, uri))?;
        self.used.insert(uri.to_string());
        Some(prefix.clone())
    }

    /// Allocates the next free `nsN` prefix for `uri`.
    ///
    /// Prefixes already in the global table or bound on the node are
    /// skipped. Fails once allocation is closed.
    pub fn add<N: XmlNode>(&mut self, uri: &str, node: &N) -> Result<String> {
        if self.phase == AllocationPhase::Rendering {
            return Err(Error::NamespaceAllocationClosed(uri.to_string()));
        }
        let bound = node.namespace_bindings();
        let mut prefix = format!("{}{}", SYNTHETIC_PREFIX, self.nsid);
        while self.fwd.contains_key(&prefix) || bound.is_some_and(|b| b.contains_key(&prefix)) {
            self.nsid += 1;
            prefix = format!("{}{}", SYNTHETIC_PREFIX, self.nsid);
        }
        self.nsid += 1;
        debug!(%prefix, uri, "allocated namespace prefix");
        self.register(&prefix, uri);
        Ok(prefix)
    }

    /// Renders a plain or `{uri}local` name as it appears in the report.
    pub fn qualify<N: XmlNode>(&mut self, name: &str, node: &N) -> Result<String> {
        match split_clark_name(name)? {
            None => Ok(name.to_string()),
            Some((uri, local)) => {
                let prefix = match self.lookup(uri, node) {
                    Some(prefix) => prefix,
                    None => self.add(uri, node)?,
                };
                Ok(format!("{}:{}", prefix, local))
            }
        }
    }

    /// The bindings a node's report line should have in effect.
    pub fn target_state<N: XmlNode>(&self, node: &N) -> NamespaceMap {
        let mut target = self.fwd.clone();
        if let Some(bindings) = node.namespace_bindings() {
            for (prefix, uri) in bindings {
                if self.used.contains(uri) && !self.shadows(prefix, uri) {
                    target.insert(prefix.clone(), uri.clone());
                }
            }
        }
        target
    }

    /// True if `prefix` is globally bound to some URI other than `uri`.
    fn shadows(&self, prefix: &str, uri: &str) -> bool {
        self.fwd.get(prefix).is_some_and(|bound| bound != uri)
    }

    fn stack_mut(&mut self, side: Side) -> &mut Vec<NamespaceMap> {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Declarations a node needs on one side, sorted by prefix.
    ///
    /// With `push` the node's target state becomes that side's new frame;
    /// pair it with [`pop_side`](Self::pop_side).
    pub fn ns_attrs<N: XmlNode>(&mut self, node: &N, side: Side, push: bool) -> Vec<(String, String)> {
        let target = self.target_state(node);
        let stack = self.stack_mut(side);
        let needed = stack.last().map(|top| needed(&target, top)).unwrap_or_default();
        if push {
            stack.push(target);
        }
        needed
    }

    /// Declaration delta of an element pair.
    ///
    /// Unchanged entries come first, then removed, then changed (a removed
    /// and an added line), then added; each group sorted by prefix. Always
    /// pushes a frame on both stacks; pair it with
    /// [`pop_state`](Self::pop_state).
    pub fn diff_ns_attrs<N: XmlNode>(&mut self, a: &N, b: &N) -> Vec<NsDecl> {
        let ta = self.target_state(a);
        let tb = self.target_state(b);
        let da: NamespaceMap = self
            .a
            .last()
            .map(|top| needed(&ta, top))
            .unwrap_or_default()
            .into_iter()
            .collect();
        let db: NamespaceMap = self
            .b
            .last()
            .map(|top| needed(&tb, top))
            .unwrap_or_default()
            .into_iter()
            .collect();

        let mut decls = Vec::new();
        for (prefix, uri) in &da {
            if db.get(prefix) == Some(uri) {
                decls.push(NsDecl::new(Marker::Unchanged, prefix, uri));
            }
        }
        for (prefix, uri) in &da {
            if !db.contains_key(prefix) {
                decls.push(NsDecl::new(Marker::Removed, prefix, uri));
            }
        }
        for (prefix, uri) in &da {
            if let Some(other) = db.get(prefix).filter(|other| *other != uri) {
                decls.push(NsDecl::new(Marker::Removed, prefix, uri));
                decls.push(NsDecl::new(Marker::Added, prefix, other));
            }
        }
        for (prefix, uri) in &db {
            if !da.contains_key(prefix) {
                decls.push(NsDecl::new(Marker::Added, prefix, uri));
            }
        }

        self.a.push(ta);
        self.b.push(tb);
        decls
    }

    /// Pops one frame off both stacks.
    pub fn pop_state(&mut self) {
        self.a.pop();
        self.b.pop();
    }

    /// Pops one frame off one stack.
    pub fn pop_side(&mut self, side: Side) {
        self.stack_mut(side).pop();
    }
}

/// Entries of `target` missing from, or different in, `current`.
fn needed(target: &NamespaceMap, current: &NamespaceMap) -> Vec<(String, String)> {
    target
        .iter()
        .filter(|(prefix, uri)| current.get(*prefix) != Some(*uri))
        .map(|(prefix, uri)| (prefix.clone(), uri.clone()))
        .collect()
}
