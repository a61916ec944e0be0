//! Serialization of a node tree back to XML text.
//!
//! Two render modes built on the visitor protocol:
//!
//! - [`Node::dump`] - exact concatenation of the tree's content; for a
//!   tree parsed from well-formed input it reproduces the input
//!   byte-for-byte (childless elements self-close, attributes sort by key)
//! - [`Node::pretty_print`] - one node per line, indented by depth, with
//!   whitespace-only text dropped and text content trimmed onto its own
//!   line

mod escape;

use crate::dom::{CDataSection, Comment, Document, Element, Node, ProcessingInstruction, Text};
use crate::visitor::Visitor;
use escape::escape;

/// The declaration line emitted ahead of a serialized document.
const XML_PROLOGUE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";

/// Render `node` to XML text. Dispatches to [`Node::pretty_print`] or
/// [`Node::dump`] according to `pretty`; `indent` is only used by the
/// pretty mode.
pub fn serialize(node: &Node, pretty: bool, indent: &str) -> String {
    if pretty {
        node.pretty_print(indent)
    } else {
        node.dump()
    }
}

impl Node {
    /// Generate an unformatted XML string of this node and its
    /// descendants. A document gets the XML prologue on its own line.
    pub fn dump(&self) -> String {
        let mut dumper = TreeDumper::default();
        self.accept(&mut dumper);
        dumper.finish()
    }

    /// Generate a formatted XML string of this node and its descendants,
    /// one node per line, each line indented with one copy of `indent`
    /// per depth level.
    pub fn pretty_print(&self, indent: &str) -> String {
        let mut printer = PrettyPrinter::new(indent);
        self.accept(&mut printer);
        printer.finish()
    }
}

/// Start tag, or the whole element if it has no children (`<a/>`).
fn format_start(element: &Element) -> String {
    let tag_name = escape(&element.tag_name, true);
    let slash_if_empty = if element.children.is_empty() { "/" } else { "" };
    match format_attributes(element) {
        Some(attributes) => format!("<{tag_name} {attributes}{slash_if_empty}>"),
        None => format!("<{tag_name}{slash_if_empty}>"),
    }
}

/// End tag, or `None` for a childless element (already self-closed).
fn format_end(element: &Element) -> Option<String> {
    if element.children.is_empty() {
        None
    } else {
        Some(format!("</{}>", escape(&element.tag_name, true)))
    }
}

/// Attributes as `k="v"` pairs in lexicographic key order, `None` when
/// there are none. The order falls out of the `BTreeMap`, making output
/// independent of insertion or parse order.
fn format_attributes(element: &Element) -> Option<String> {
    if element.attributes.is_empty() {
        return None;
    }
    let formatted: Vec<String> = element
        .attributes
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", escape(key, true), escape(value, true)))
        .collect();
    Some(formatted.join(" "))
}

fn format_pi(pi: &ProcessingInstruction) -> String {
    match &pi.data {
        Some(data) => format!("<?{} {}?>", pi.target, escape(data, false)),
        None => format!("<?{}?>", pi.target),
    }
}

fn format_comment(comment: &Comment) -> String {
    format!("<!--{}-->", escape(&comment.text, false))
}

fn format_cdata(cdata: &CDataSection) -> String {
    format!("<![CDATA[{}]]>", escape(&cdata.text, false))
}

fn format_text(text: &Text, trim: bool) -> String {
    let content = if trim { text.text.trim() } else { &text.text };
    escape(content, true).into_owned()
}

/// Visitor producing the exact (compact) rendering.
#[derive(Default)]
struct TreeDumper {
    parts: Vec<String>,
}

impl TreeDumper {
    fn finish(self) -> String {
        self.parts.concat()
    }
}

impl Visitor for TreeDumper {
    fn begin_visit_document(&mut self, _document: &Document) {
        self.parts.push(XML_PROLOGUE.to_string());
        self.parts.push("\n".to_string());
    }

    fn begin_visit_element(&mut self, element: &Element) {
        self.parts.push(format_start(element));
    }

    fn end_visit_element(&mut self, element: &Element) {
        if let Some(end) = format_end(element) {
            self.parts.push(end);
        }
    }

    fn visit_text(&mut self, text: &Text) {
        self.parts.push(format_text(text, false));
    }

    fn visit_processing_instruction(&mut self, pi: &ProcessingInstruction) {
        self.parts.push(format_pi(pi));
    }

    fn visit_comment(&mut self, comment: &Comment) {
        self.parts.push(format_comment(comment));
    }

    fn visit_cdata(&mut self, cdata: &CDataSection) {
        self.parts.push(format_cdata(cdata));
    }
}

/// Visitor producing the indented rendering.
struct PrettyPrinter {
    indent: String,
    depth: usize,
    lines: Vec<(usize, String)>,
}

impl PrettyPrinter {
    fn new(indent: &str) -> Self {
        PrettyPrinter {
            indent: indent.to_string(),
            depth: 0,
            lines: Vec::new(),
        }
    }

    fn add_line(&mut self, value: String) {
        self.lines.push((self.depth, value));
    }

    fn finish(self) -> String {
        let rendered: Vec<String> = self
            .lines
            .iter()
            .map(|(depth, value)| format!("{}{}", self.indent.repeat(*depth), value))
            .collect();
        rendered.join("\n")
    }
}

impl Visitor for PrettyPrinter {
    fn begin_visit_document(&mut self, _document: &Document) {
        self.add_line(XML_PROLOGUE.to_string());
    }

    fn begin_visit_element(&mut self, element: &Element) {
        self.add_line(format_start(element));
        self.depth += 1;
    }

    fn end_visit_element(&mut self, element: &Element) {
        self.depth -= 1;
        if let Some(end) = format_end(element) {
            self.add_line(end);
        }
    }

    fn visit_text(&mut self, text: &Text) {
        let formatted = format_text(text, true);
        if !formatted.is_empty() {
            self.add_line(formatted);
        }
    }

    fn visit_processing_instruction(&mut self, pi: &ProcessingInstruction) {
        self.add_line(format_pi(pi));
    }

    fn visit_comment(&mut self, comment: &Comment) {
        self.add_line(format_comment(comment));
    }

    fn visit_cdata(&mut self, cdata: &CDataSection) {
        self.add_line(format_cdata(cdata));
    }
}
