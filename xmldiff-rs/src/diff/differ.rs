//! Recursive tree comparison.

use std::io::Write;
use std::rc::Rc;

use tracing::trace;

use super::attributes::{AttributeDelta, AttributeEdit};
use super::escape::{escape_attribute, escape_text};
use super::filter::{next_filter, FilterTarget, NodeFilter};
use super::formatter::{Formatter, Marker, Subsection};
use super::namespaces::{NamespaceState, Side};
use crate::error::{Error, Result};
use crate::matching::align;
use crate::node::{Attributes, ElementRef, NodeContent, NodeKey, XmlNode};

/// Walks two trees in step and writes the report through a [`Formatter`].
pub(crate) struct TreeDiffer<'s, W: Write> {
    fmt: Formatter<W>,
    ns: &'s mut NamespaceState,
}

impl<'s, W: Write> TreeDiffer<'s, W> {
    pub(crate) fn new(fmt: Formatter<W>, ns: &'s mut NamespaceState) -> Self {
        TreeDiffer { fmt, ns }
    }

    /// Flushes the report and returns the sink.
    pub(crate) fn finish(self) -> Result<W> {
        Ok(self.fmt.finish()?)
    }

    /// Compares an aligned slot.
    pub(crate) fn diff<N: XmlNode>(
        &mut self,
        a: Option<&N>,
        b: Option<&N>,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        match (a, b) {
            (None, None) => Ok(()),
            (None, Some(b)) => self.dump(Marker::Added, Side::B, b, filter),
            (Some(a), None) => self.dump(Marker::Removed, Side::A, a, filter),
            (Some(a), Some(b)) => self.diff_pair(a, b, filter),
        }
    }

    fn diff_pair<N: XmlNode>(&mut self, a: &N, b: &N, filter: &Rc<dyn NodeFilter>) -> Result<()> {
        match (a.content(), b.content()) {
            (NodeContent::Other(kind), _) | (_, NodeContent::Other(kind)) => {
                Err(Error::UnsupportedNodeKind(kind.to_string()))
            }
            (NodeContent::Text(x), NodeContent::Text(y)) if x == y => {
                // Context only: shown if a change in the same section is.
                self.write_text(x, true, Marker::Unchanged)
            }
            (NodeContent::Element(x), NodeContent::Element(y)) if x.tag == y.tag => {
                self.diff_elements(a, x, b, y, filter)
            }
            _ => {
                trace!("replacing node");
                self.dump(Marker::Removed, Side::A, a, filter)?;
                self.dump(Marker::Added, Side::B, b, filter)
            }
        }
    }

    fn diff_elements<N: XmlNode>(
        &mut self,
        a_node: &N,
        a: ElementRef<'_, N>,
        b_node: &N,
        b: ElementRef<'_, N>,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        let target = FilterTarget::Element {
            tag: a.tag,
            attributes: a.attributes,
        };
        let Some(child_filter) = next_filter(filter, &target) else {
            trace!(tag = a.tag, "element pair filtered out");
            return Ok(());
        };

        let tag = self.ns.qualify(a.tag, a_node)?;
        let attributes = AttributeDelta::partition(a.attributes, b.attributes);

        let mut unchanged_attrs = String::new();
        for name in &attributes.unchanged {
            unchanged_attrs.push(' ');
            unchanged_attrs.push_str(&self.format_attr(name, &a.attributes[*name], a_node)?);
        }
        let mut attr_lines = Vec::new();
        for (name, edit) in attributes.edits() {
            if matches!(edit, AttributeEdit::Removed | AttributeEdit::Changed) {
                let line = self.format_attr(name, &a.attributes[name], a_node)?;
                attr_lines.push((Marker::Removed, line));
            }
            if matches!(edit, AttributeEdit::Added | AttributeEdit::Changed) {
                let line = self.format_attr(name, &b.attributes[name], b_node)?;
                attr_lines.push((Marker::Added, line));
            }
        }

        // Pushes a frame on both stacks.
        let decls = self.ns.diff_ns_attrs(a_node, b_node);
        let mut unchanged_ns = String::new();
        let mut delta = Vec::new();
        for decl in decls {
            let line = format_ns_attr(&decl.prefix, &decl.uri);
            if decl.marker == Marker::Unchanged {
                unchanged_ns.push(' ');
                unchanged_ns.push_str(&line);
            } else {
                delta.push((decl.marker, line));
            }
        }
        delta.extend(attr_lines);

        let open = format!("<{}{}{}", tag, unchanged_ns, unchanged_attrs);
        let result = if delta.is_empty() {
            self.unchanged_element(&tag, open, a, b, &child_filter)
        } else {
            self.changed_element(&tag, open, delta, a, b, &child_filter)
        };
        self.ns.pop_state();
        result
    }

    /// An element pair whose own tag line is identical on both sides.
    fn unchanged_element<N: XmlNode>(
        &mut self,
        tag: &str,
        open: String,
        a: ElementRef<'_, N>,
        b: ElementRef<'_, N>,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        if !a.has_element_children() && !b.has_element_children() {
            let text = a.text();
            if text == b.text() && !text.contains('\n') {
                let line = if text.is_empty() {
                    format!("{}/>", open)
                } else {
                    format!("{}>{}</{}>", open, escape_text(&text), tag)
                };
                self.fmt.write(&line, true, Marker::Unchanged)?;
                return Ok(());
            }
        }

        let section = self.fmt.open(
            Subsection::new()
                .heading(Marker::Unchanged, format!("{}>", open))
                .tail(Marker::Unchanged, format!("</{}>", tag)),
        )?;
        self.diff_children(a, b, filter)?;
        self.fmt.close(section)?;
        Ok(())
    }

    /// An element pair with differing attributes or declarations.
    ///
    /// The open tag keeps what both sides share; each difference gets its
    /// own line one level deeper, and the last of them closes the tag.
    fn changed_element<N: XmlNode>(
        &mut self,
        tag: &str,
        open: String,
        mut delta: Vec<(Marker, String)>,
        a: ElementRef<'_, N>,
        b: ElementRef<'_, N>,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        let leaf = a.children.is_empty() && b.children.is_empty();
        if let Some((_, last)) = delta.last_mut() {
            last.push_str(if leaf { "/>" } else { ">" });
        }

        let mut section = Subsection::new().heading(Marker::Unchanged, open);
        if !leaf {
            section = section.tail(Marker::Unchanged, format!("</{}>", tag));
        }
        let section = self.fmt.open(section)?;
        for (marker, line) in &delta {
            self.fmt.write(line, false, *marker)?;
        }
        self.diff_children(a, b, filter)?;
        self.fmt.close(section)?;
        Ok(())
    }

    fn diff_children<N: XmlNode>(
        &mut self,
        a: ElementRef<'_, N>,
        b: ElementRef<'_, N>,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        let a_keyed = keyed(a.children)?;
        let b_keyed = keyed(b.children)?;
        let slots = align(&a_keyed, &b_keyed);
        trace!(a = a_keyed.len(), b = b_keyed.len(), slots = slots.len(), "aligned children");

        for (x, y) in slots {
            self.diff(x, y, filter)?;
        }
        Ok(())
    }

    /// Writes a whole subtree that exists on one side only.
    fn dump<N: XmlNode>(
        &mut self,
        marker: Marker,
        side: Side,
        node: &N,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        match node.content() {
            NodeContent::Other(kind) => Err(Error::UnsupportedNodeKind(kind.to_string())),
            NodeContent::Text(text) => {
                if next_filter(filter, &FilterTarget::Text(text)).is_some() {
                    self.write_text(text, false, marker)?;
                }
                Ok(())
            }
            NodeContent::Element(element) => {
                let target = FilterTarget::Element {
                    tag: element.tag,
                    attributes: element.attributes,
                };
                match next_filter(filter, &target) {
                    Some(child_filter) => {
                        self.dump_element(marker, side, node, element, &child_filter)
                    }
                    None => Ok(()),
                }
            }
        }
    }

    fn dump_element<N: XmlNode>(
        &mut self,
        marker: Marker,
        side: Side,
        node: &N,
        element: ElementRef<'_, N>,
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        let tag = self.ns.qualify(element.tag, node)?;
        let attrs = self.format_attrs(element.attributes, node)?;

        let text = element.text();
        if !element.has_element_children() && !text.contains('\n') {
            let decls = self.ns.ns_attrs(node, side, false);
            let open = format!("<{}{}{}", tag, format_ns_attrs(&decls), attrs);
            let line = if element.children.is_empty() {
                format!("{}/>", open)
            } else {
                format!("{}>{}</{}>", open, escape_text(&text), tag)
            };
            self.fmt.write(&line, false, marker)?;
            return Ok(());
        }

        // Pushes a frame on this side's stack.
        let decls = self.ns.ns_attrs(node, side, true);
        let open = format!("<{}{}{}>", tag, format_ns_attrs(&decls), attrs);
        let result = self.dump_children(marker, side, &tag, open, element.children, filter);
        self.ns.pop_side(side);
        result
    }

    fn dump_children<N: XmlNode>(
        &mut self,
        marker: Marker,
        side: Side,
        tag: &str,
        open: String,
        children: &[N],
        filter: &Rc<dyn NodeFilter>,
    ) -> Result<()> {
        let section = self.fmt.open(
            Subsection::new()
                .heading(marker, open)
                .tail(marker, format!("</{}>", tag)),
        )?;
        for child in children {
            self.dump(marker, side, child, filter)?;
        }
        self.fmt.close(section)?;
        Ok(())
    }

    /// Writes text one report line per source line.
    fn write_text(&mut self, text: &str, conditional: bool, marker: Marker) -> Result<()> {
        for line in text.split('\n') {
            self.fmt.write(&escape_text(line), conditional, marker)?;
        }
        Ok(())
    }

    fn format_attr<N: XmlNode>(&mut self, name: &str, value: &str, node: &N) -> Result<String> {
        Ok(format!(
            "{}=\"{}\"",
            self.ns.qualify(name, node)?,
            escape_attribute(value)
        ))
    }

    fn format_attrs<N: XmlNode>(&mut self, attributes: &Attributes, node: &N) -> Result<String> {
        let mut out = String::new();
        for (name, value) in attributes {
            out.push(' ');
            out.push_str(&self.format_attr(name, value, node)?);
        }
        Ok(out)
    }
}

/// Pairs every child with its identity key.
fn keyed<N: XmlNode>(children: &[N]) -> Result<Vec<(NodeKey, &N)>> {
    children
        .iter()
        .map(|child| Ok((NodeKey::of(child)?, child)))
        .collect()
}

fn format_ns_attr(prefix: &str, uri: &str) -> String {
    format!("xmlns:{}=\"{}\"", prefix, escape_attribute(uri))
}

fn format_ns_attrs(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(prefix, uri)| format!(" {}", format_ns_attr(prefix, uri)))
        .collect()
}
