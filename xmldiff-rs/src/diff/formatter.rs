//! Line writer for the diff report.
//!
//! Every line is `marker + indentation + content`. Section headings are
//! written *conditionally*: they wait in a buffer until something inside
//! the section is written for real, and vanish with the section otherwise.
//! That is how unchanged subtrees collapse to nothing without a separate
//! emptiness check.

use std::io::{self, Write};

use crate::constants::{DEFAULT_INDENT, MARK_ADDED, MARK_REMOVED, MARK_UNCHANGED};

/// The marker column of a report line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Present in both trees.
    Unchanged,
    /// Only in the first tree.
    Removed,
    /// Only in the second tree.
    Added,
}

impl Marker {
    /// The character written in the marker column.
    pub fn as_char(self) -> char {
        match self {
            Marker::Unchanged => MARK_UNCHANGED,
            Marker::Removed => MARK_REMOVED,
            Marker::Added => MARK_ADDED,
        }
    }
}

/// Describes a section before it is opened.
#[derive(Debug, Clone)]
pub struct Subsection {
    heading: Option<(Marker, String)>,
    indent: Option<String>,
    tail: Option<(Marker, String)>,
}

impl Subsection {
    /// A section with no heading, no tail and the default indentation step.
    pub fn new() -> Self {
        Subsection {
            heading: None,
            indent: None,
            tail: None,
        }
    }

    /// Sets the heading, withheld until the section shows content.
    pub fn heading(mut self, marker: Marker, line: impl Into<String>) -> Self {
        self.heading = Some((marker, line.into()));
        self
    }

    /// Sets the line written when a visible section closes.
    pub fn tail(mut self, marker: Marker, line: impl Into<String>) -> Self {
        self.tail = Some((marker, line.into()));
        self
    }

    /// Overrides the indentation added inside the section.
    pub fn indent(mut self, step: impl Into<String>) -> Self {
        self.indent = Some(step.into());
        self
    }
}

impl Default for Subsection {
    fn default() -> Self {
        Self::new()
    }
}

/// An open section; hand it back to [`Formatter::close`].
#[must_use = "an opened section must be closed"]
#[derive(Debug)]
pub struct OpenSection {
    heading: Option<u64>,
    saved_indent: usize,
    tail: Option<(Marker, String)>,
}

/// Indentation- and marker-aware line writer with withheld headings.
pub struct Formatter<W: Write> {
    sink: W,
    /// Indentation step for sections.
    unit: String,
    /// Current indentation.
    indent: String,
    /// Number of open sections.
    depth: usize,
    /// A blank line is owed before the next visible line.
    pending_blank: bool,
    /// Withheld lines with their handles, oldest first.
    withheld: Vec<(u64, String)>,
    next_handle: u64,
}

impl<W: Write> Formatter<W> {
    /// Creates a formatter with the default two-space indentation step.
    pub fn new(sink: W) -> Self {
        Self::with_indent(sink, DEFAULT_INDENT)
    }

    /// Creates a formatter with a custom indentation step.
    pub fn with_indent(sink: W, unit: impl Into<String>) -> Self {
        Formatter {
            sink,
            unit: unit.into(),
            indent: String::new(),
            depth: 0,
            pending_blank: false,
            withheld: Vec::new(),
            next_handle: 0,
        }
    }

    /// The current indentation.
    pub fn current_indent(&self) -> &str {
        &self.indent
    }

    /// Number of lines waiting for visible content.
    pub fn withheld_len(&self) -> usize {
        self.withheld.len()
    }

    /// Writes one line.
    ///
    /// A conditional line is withheld. Any other line first emits an owed
    /// blank line, then every withheld line in order, then itself.
    pub fn write(&mut self, line: &str, conditional: bool, marker: Marker) -> io::Result<()> {
        self.write_tracked(line, conditional, marker).map(|_| ())
    }

    fn write_tracked(&mut self, line: &str, conditional: bool, marker: Marker) -> io::Result<u64> {
        let value = format!("{}{}{}", marker.as_char(), self.indent, line);
        let handle = self.next_handle;
        self.next_handle += 1;

        if conditional {
            self.withheld.push((handle, value));
            return Ok(handle);
        }

        if self.pending_blank {
            writeln!(self.sink)?;
            self.pending_blank = false;
        }
        for (_, withheld) in self.withheld.drain(..) {
            writeln!(self.sink, "{}", withheld)?;
        }
        writeln!(self.sink, "{}", value)?;
        Ok(handle)
    }

    /// Opens a section: withholds its heading and indents.
    pub fn open(&mut self, section: Subsection) -> io::Result<OpenSection> {
        let heading = match section.heading {
            Some((marker, line)) => Some(self.write_tracked(&line, true, marker)?),
            None => None,
        };
        let saved_indent = self.indent.len();
        match section.indent {
            Some(step) => self.indent.push_str(&step),
            None => self.indent.push_str(&self.unit),
        }
        self.depth += 1;
        Ok(OpenSection {
            heading,
            saved_indent,
            tail: section.tail,
        })
    }

    /// Closes a section.
    ///
    /// If the heading is still withheld nothing inside became visible, so the
    /// heading and any context lines withheld after it are dropped.
    /// Otherwise the tail is written and, back at the top level, a blank line
    /// is owed before whatever comes next.
    pub fn close(&mut self, section: OpenSection) -> io::Result<()> {
        self.indent.truncate(section.saved_indent);
        self.depth = self.depth.saturating_sub(1);

        if let Some(handle) = section.heading {
            if let Some(pos) = self.withheld.iter().position(|(h, _)| *h == handle) {
                self.withheld.truncate(pos);
                return Ok(());
            }
        }

        if let Some((marker, line)) = section.tail {
            self.write(&line, false, marker)?;
        }
        if self.depth == 0 {
            self.pending_blank = true;
        }
        Ok(())
    }

    /// Flushes the sink and returns it; withheld lines are discarded.
    pub fn finish(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn output(fmt: Formatter<Vec<u8>>) -> String {
        String::from_utf8(fmt.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_plain_write() {
        let mut fmt = Formatter::new(Vec::new());
        fmt.write("<a/>", false, Marker::Removed).unwrap();
        fmt.write("<b/>", false, Marker::Added).unwrap();
        assert_eq!(output(fmt), "-<a/>\n+<b/>\n");
    }

    #[test]
    fn test_empty_section_vanishes() {
        let mut fmt = Formatter::new(Vec::new());
        let outer = fmt
            .open(Subsection::new().heading(Marker::Unchanged, "<a>").tail(Marker::Unchanged, "</a>"))
            .unwrap();
        let inner = fmt
            .open(Subsection::new().heading(Marker::Unchanged, "<b>").tail(Marker::Unchanged, "</b>"))
            .unwrap();
        fmt.write("context", true, Marker::Unchanged).unwrap();
        fmt.close(inner).unwrap();
        fmt.close(outer).unwrap();

        assert_eq!(fmt.withheld_len(), 0);
        assert_eq!(output(fmt), "");
    }

    #[test]
    fn test_visible_line_flushes_headings() {
        let mut fmt = Formatter::new(Vec::new());
        let outer = fmt
            .open(Subsection::new().heading(Marker::Unchanged, "<a>").tail(Marker::Unchanged, "</a>"))
            .unwrap();
        let quiet = fmt
            .open(Subsection::new().heading(Marker::Unchanged, "<q>").tail(Marker::Unchanged, "</q>"))
            .unwrap();
        fmt.close(quiet).unwrap();
        fmt.write("kept", true, Marker::Unchanged).unwrap();
        let inner = fmt
            .open(Subsection::new().heading(Marker::Unchanged, "<b>").tail(Marker::Unchanged, "</b>"))
            .unwrap();
        fmt.write("<c/>", false, Marker::Added).unwrap();
        fmt.close(inner).unwrap();
        fmt.close(outer).unwrap();

        assert_eq!(
            output(fmt),
            " <a>\n   kept\n   <b>\n+    <c/>\n   </b>\n </a>\n"
        );
    }

    #[test]
    fn test_blank_line_between_top_level_sections() {
        let mut fmt = Formatter::new(Vec::new());
        for name in ["a", "b"] {
            let section = fmt
                .open(
                    Subsection::new()
                        .heading(Marker::Removed, format!("<{}>", name))
                        .tail(Marker::Removed, format!("</{}>", name)),
                )
                .unwrap();
            fmt.write("x", false, Marker::Removed).unwrap();
            fmt.close(section).unwrap();
        }
        assert_eq!(output(fmt), "-<a>\n-  x\n-</a>\n\n-<b>\n-  x\n-</b>\n");
    }

    #[test]
    fn test_custom_indent_and_restore() {
        let mut fmt = Formatter::with_indent(Vec::new(), "    ");
        let section = fmt.open(Subsection::new()).unwrap();
        assert_eq!(fmt.current_indent(), "    ");
        let nested = fmt.open(Subsection::new().indent("\t")).unwrap();
        assert_eq!(fmt.current_indent(), "    \t");
        fmt.close(nested).unwrap();
        fmt.write("x", false, Marker::Unchanged).unwrap();
        fmt.close(section).unwrap();
        assert_eq!(fmt.current_indent(), "");
        assert_eq!(output(fmt), "     x\n");
    }

    #[test]
    fn test_headingless_section_writes_tail() {
        let mut fmt = Formatter::new(Vec::new());
        let section = fmt
            .open(Subsection::new().tail(Marker::Added, "end"))
            .unwrap();
        fmt.close(section).unwrap();
        fmt.write("next", false, Marker::Unchanged).unwrap();
        assert_eq!(output(fmt), "+end\n\n next\n");
    }

    #[test]
    fn test_blank_lines_follow_nesting_not_indentation() {
        let mut fmt = Formatter::with_indent(Vec::new(), "");
        for name in ["a", "b"] {
            let outer = fmt
                .open(
                    Subsection::new()
                        .heading(Marker::Unchanged, format!("<{}>", name))
                        .tail(Marker::Unchanged, format!("</{}>", name)),
                )
                .unwrap();
            let inner = fmt
                .open(Subsection::new().heading(Marker::Unchanged, "<i>").tail(Marker::Unchanged, "</i>"))
                .unwrap();
            fmt.write("x", false, Marker::Added).unwrap();
            fmt.close(inner).unwrap();
            fmt.write("y", false, Marker::Added).unwrap();
            fmt.close(outer).unwrap();
        }
        assert_eq!(
            output(fmt),
            " <a>\n <i>\n+x\n </i>\n+y\n </a>\n\n <b>\n <i>\n+x\n </i>\n+y\n </b>\n"
        );
    }
}
