//! XML parser that builds node trees.
//!
//! This parser uses quick-xml's streaming API and resolves namespace
//! prefixes itself, so names come out in `{uri}local` form and every element
//! can record the bindings in scope where it appears.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{Error, Result};
use crate::node::namespace::{xmlns_prefix, NamespaceContext};
use crate::node::{Attributes, Node, XmlComment, XmlElement, XmlProcessingInstruction};

/// Options controlling how documents become trees.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Record in-scope prefix bindings on every element (rich trees).
    pub expose_namespaces: bool,
    /// Keep text runs that contain only whitespace.
    pub keep_blank_text: bool,
    /// Keep comments as nodes.
    pub keep_comments: bool,
    /// Keep processing instructions as nodes.
    pub keep_processing_instructions: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            expose_namespaces: true,
            keep_blank_text: false,
            keep_comments: false,
            keep_processing_instructions: false,
        }
    }
}

impl ParserOptions {
    /// Options for a tree without namespace introspection.
    pub fn minimal() -> Self {
        ParserOptions {
            expose_namespaces: false,
            ..Self::default()
        }
    }
}

/// XML parser that builds node trees.
#[derive(Debug, Clone, Default)]
pub struct XmlParser {
    options: ParserOptions,
}

/// Parse state shared by the event handlers.
struct TreeBuilder {
    namespaces: NamespaceContext,
    /// Open elements, innermost last.
    stack: Vec<XmlElement>,
    /// Finished document element.
    root: Option<XmlElement>,
    /// Text accumulated since the last markup event.
    pending_text: String,
}

impl XmlParser {
    /// Creates a new parser with the given options.
    pub fn new(options: ParserOptions) -> Self {
        XmlParser { options }
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<Node> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Node> {
        let path = path.as_ref();
        debug!(path = %path.display(), "parsing file");
        let file = File::open(path)?;
        let buf_reader = BufReader::new(file);
        let mut reader = Reader::from_reader(buf_reader);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a quick-xml Reader.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<Node> {
        let mut builder = TreeBuilder {
            namespaces: NamespaceContext::new(),
            stack: Vec::new(),
            root: None,
            pending_text: String::new(),
        };
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.flush_text(&mut builder);
                    let element = self.open_element(e, reader, &mut builder)?;
                    builder.stack.push(element);
                }
                Ok(Event::End(_)) => {
                    self.flush_text(&mut builder);
                    let element = builder
                        .stack
                        .pop()
                        .ok_or_else(|| Error::Parse("unbalanced end tag".to_string()))?;
                    builder.namespaces.pop_scope();
                    self.close_element(element, &mut builder)?;
                }
                Ok(Event::Empty(ref e)) => {
                    self.flush_text(&mut builder);
                    let element = self.open_element(e, reader, &mut builder)?;
                    builder.namespaces.pop_scope();
                    self.close_element(element, &mut builder)?;
                }
                Ok(Event::Text(e)) => {
                    let raw =
                        std::str::from_utf8(e.as_ref()).map_err(|e| Error::Parse(e.to_string()))?;
                    let text = unescape(raw).map_err(|e| Error::Parse(e.to_string()))?;
                    builder.pending_text.push_str(&text);
                }
                Ok(Event::CData(ref e)) => {
                    builder
                        .pending_text
                        .push_str(&String::from_utf8_lossy(e.as_ref()));
                }
                Ok(Event::GeneralRef(ref e)) => {
                    let resolved = resolve_reference(e)?;
                    builder.pending_text.push_str(&resolved);
                }
                Ok(Event::Comment(ref e)) => {
                    if self.options.keep_comments {
                        self.flush_text(&mut builder);
                        let text = String::from_utf8_lossy(e.as_ref()).to_string();
                        builder.append(Node::Comment(XmlComment::new(text)));
                    }
                }
                Ok(Event::PI(ref e)) => {
                    if self.options.keep_processing_instructions {
                        self.flush_text(&mut builder);
                        let target = String::from_utf8_lossy(e.target()).to_string();
                        let content = String::from_utf8_lossy(e.content()).trim().to_string();
                        builder.append(Node::ProcessingInstruction(
                            XmlProcessingInstruction::new(target, content),
                        ));
                    }
                }
                Ok(Event::Decl(_)) | Ok(Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
            }
            buf.clear();
        }

        if !builder.stack.is_empty() {
            return Err(Error::Parse("unexpected end of document".to_string()));
        }
        builder
            .root
            .map(Node::Element)
            .ok_or_else(|| Error::Parse("document has no root element".to_string()))
    }

    /// Opens a scope and builds the element for a start or empty tag.
    fn open_element<R: BufRead>(
        &self,
        e: &BytesStart,
        reader: &Reader<R>,
        builder: &mut TreeBuilder,
    ) -> Result<XmlElement> {
        if builder.root.is_some() && builder.stack.is_empty() {
            return Err(Error::Parse("multiple root elements".to_string()));
        }

        let name = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        // Declarations apply to the element that carries them, so bind them
        // before resolving any name.
        let mut raw_attributes = Vec::new();
        builder.namespaces.push_scope();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("Attribute error: {}", e)))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            match xmlns_prefix(&key) {
                Some(prefix) => builder.namespaces.bind(prefix, &value),
                None => raw_attributes.push((key, value)),
            }
        }

        let tag = builder.namespaces.expand(&name, false)?;
        let mut attributes = Attributes::new();
        for (key, value) in raw_attributes {
            attributes.insert(builder.namespaces.expand(&key, true)?, value);
        }
        let bindings = self
            .options
            .expose_namespaces
            .then(|| builder.namespaces.in_scope());

        Ok(XmlElement::with_parts(tag, attributes, bindings))
    }

    /// Attaches a finished element to its parent, or makes it the root.
    fn close_element(&self, element: XmlElement, builder: &mut TreeBuilder) -> Result<()> {
        match builder.stack.last_mut() {
            Some(parent) => parent.push_child(Node::Element(element)),
            None => {
                if builder.root.is_some() {
                    return Err(Error::Parse("multiple root elements".to_string()));
                }
                builder.root = Some(element);
            }
        }
        Ok(())
    }

    /// Turns accumulated text into a text child of the open element.
    ///
    /// Text outside the document element is discarded.
    fn flush_text(&self, builder: &mut TreeBuilder) {
        let text = std::mem::take(&mut builder.pending_text);
        if text.is_empty() {
            return;
        }
        if !self.options.keep_blank_text && text.trim().is_empty() {
            return;
        }
        builder.append(Node::Text(text));
    }
}

impl TreeBuilder {
    /// Appends a non-element node to the open element, if any.
    fn append(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.push_child(node);
        }
    }
}

/// Resolves a character or predefined entity reference.
fn resolve_reference(e: &BytesRef) -> Result<String> {
    if let Some(c) = e
        .resolve_char_ref()
        .map_err(|e| Error::Parse(e.to_string()))?
    {
        return Ok(c.to_string());
    }
    let name = e.decode().map_err(|e| Error::Parse(e.to_string()))?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| Error::Parse(format!("unknown entity: &{};", name)))
}

/// Parses XML from a file with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Node> {
    XmlParser::default().parse_file(path)
}

/// Parses XML from a string with default options.
pub fn parse_str(xml: &str) -> Result<Node> {
    XmlParser::default().parse_str(xml)
}
