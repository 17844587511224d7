//! Namespace handling for XML names.
//!
//! Qualified names travel through the engine in Clark notation,
//! `{namespace-uri}local`. [`NamespaceContext`] resolves the prefixed names
//! found in a document into that form while parsing.

use super::NamespaceMap;
use crate::constants::{XML_NAMESPACE, XML_PREFIX};
use crate::error::{Error, Result};

/// Splits a `{uri}local` name into its namespace URI and local part.
///
/// Returns `Ok(None)` for plain names. A name that opens with `{` but has
/// no closing `}` is malformed. The last `}` ends the URI.
pub fn split_clark_name(name: &str) -> Result<Option<(&str, &str)>> {
    let Some(rest) = name.strip_prefix('{') else {
        return Ok(None);
    };
    match rest.rfind('}') {
        Some(pos) => Ok(Some((&rest[..pos], &rest[pos + 1..]))),
        None => Err(Error::MalformedQualifiedName(name.to_string())),
    }
}

/// Builds a `{uri}local` name.
pub fn clark_name(uri: &str, local: &str) -> String {
    format!("{{{}}}{}", uri, local)
}

/// Prefix bindings in effect while a document is read.
///
/// Every open element owns a full copy of the bindings visible inside it,
/// so lookups never walk outer scopes and a snapshot for a rich tree is one
/// filtered clone.
#[derive(Debug, Clone)]
pub struct NamespaceContext {
    scopes: Vec<NamespaceMap>,
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceContext {
    /// Creates a context where only `xml` is bound.
    pub fn new() -> Self {
        let mut document = NamespaceMap::new();
        document.insert(XML_PREFIX.to_string(), XML_NAMESPACE.to_string());
        NamespaceContext {
            scopes: vec![document],
        }
    }

    /// Enters an element; it inherits everything bound outside it.
    pub fn push_scope(&mut self) {
        let inherited = self.scopes.last().cloned().unwrap_or_default();
        self.scopes.push(inherited);
    }

    /// Leaves an element. The document scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Binds a prefix in the innermost scope.
    ///
    /// The empty prefix is the default namespace; binding it to the empty
    /// URI undeclares it.
    pub fn bind(&mut self, prefix: &str, uri: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(prefix.to_string(), uri.to_string());
        }
    }

    /// The URI bound to `prefix`, if any.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.scopes
            .last()
            .and_then(|scope| scope.get(prefix))
            .map(String::as_str)
    }

    /// The default namespace, unless undeclared.
    pub fn default_namespace(&self) -> Option<&str> {
        self.resolve("").filter(|uri| !uri.is_empty())
    }

    /// Resolves a document name (`prefix:local` or `local`) to Clark notation.
    ///
    /// Unprefixed element names take the default namespace; unprefixed
    /// attribute names never do.
    pub fn expand(&self, qname: &str, is_attribute: bool) -> Result<String> {
        match split_qname(qname) {
            (Some(prefix), local) => match self.resolve(prefix) {
                Some(uri) if !uri.is_empty() => Ok(clark_name(uri, local)),
                _ => Err(Error::Parse(format!("unbound namespace prefix: {}", prefix))),
            },
            (None, local) if !is_attribute => Ok(self
                .default_namespace()
                .map_or_else(|| local.to_string(), |uri| clark_name(uri, local))),
            (None, local) => Ok(local.to_string()),
        }
    }

    /// Prefixed bindings visible in the innermost scope.
    ///
    /// The reserved `xml` prefix and the default namespace are left out.
    pub fn in_scope(&self) -> NamespaceMap {
        self.scopes
            .last()
            .map(|scope| {
                scope
                    .iter()
                    .filter(|(prefix, uri)| {
                        !prefix.is_empty() && prefix.as_str() != XML_PREFIX && !uri.is_empty()
                    })
                    .map(|(prefix, uri)| (prefix.clone(), uri.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Splits `prefix:local` at the first colon; plain names have no prefix.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, qname),
    }
}

/// The prefix an `xmlns` attribute declares, or `None` for other
/// attributes. The default namespace declares the empty prefix.
pub fn xmlns_prefix(name: &str) -> Option<&str> {
    match name {
        "xmlns" => Some(""),
        _ => name.strip_prefix("xmlns:"),
    }
}
