//! XML node representation.
//!
//! The tree is a closed set of six node kinds. Parent kinds (`Document`,
//! `Element`) own their children outright as a `Vec<Node>`; leaf kinds
//! (`Text`, `Comment`, `ProcessingInstruction`, `CDataSection`) carry no
//! child storage at all, so attaching a child to a leaf is unrepresentable
//! rather than a runtime error.

use std::collections::BTreeMap;

/// Discriminant identifying which of the six variants a [`Node`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// CDATA section
    CData,
    /// Comment
    Comment,
    /// Processing instruction
    ProcessingInstruction,
}

/// A single node in the document tree.
///
/// `Node` is a closed tagged variant: every algorithm over the tree
/// (traversal, formatting, search) matches exhaustively on it, so adding a
/// kind is a compile-time event rather than a runtime surprise.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The document root container.
    Document(Document),
    /// An element with a tag name, attributes and children.
    Element(Element),
    /// Character data.
    Text(Text),
    /// A comment.
    Comment(Comment),
    /// A processing instruction.
    ProcessingInstruction(ProcessingInstruction),
    /// A CDATA section.
    CData(CDataSection),
}

impl Node {
    /// The kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document(_) => NodeKind::Document,
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
            Node::ProcessingInstruction(_) => NodeKind::ProcessingInstruction,
            Node::CData(_) => NodeKind::CData,
        }
    }

    /// The name of this node, depending on its kind: the tag name for
    /// elements, the target for processing instructions, and a fixed
    /// `#`-prefixed name for the other kinds.
    pub fn name(&self) -> &str {
        match self {
            Node::Document(_) => "#document",
            Node::Element(element) => &element.tag_name,
            Node::Text(_) => "#text",
            Node::Comment(_) => "#comment",
            Node::ProcessingInstruction(pi) => &pi.target,
            Node::CData(_) => "#cdata-section",
        }
    }

    /// The value of this node, depending on its kind. `None` for kinds
    /// without an obvious mapping (documents and elements).
    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Document(_) | Node::Element(_) => None,
            Node::Text(text) => Some(&text.text),
            Node::Comment(comment) => Some(&comment.text),
            Node::ProcessingInstruction(pi) => pi.data.as_deref(),
            Node::CData(cdata) => Some(&cdata.text),
        }
    }

    /// The attributes of this node. Present only for elements.
    pub fn attributes(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Node::Element(element) => Some(&element.attributes),
            _ => None,
        }
    }

    /// The children of this node, in document order. Always empty for the
    /// leaf kinds.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document(document) => &document.children,
            Node::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Mutable access to the child list, or `None` for leaf kinds.
    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Document(document) => Some(&mut document.children),
            Node::Element(element) => Some(&mut element.children),
            _ => None,
        }
    }

    /// Whether this node kind can own children.
    #[inline]
    pub fn is_parent(&self) -> bool {
        matches!(self, Node::Document(_) | Node::Element(_))
    }

    /// Whether this node kind structurally cannot own children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        !self.is_parent()
    }

    /// Whether this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Whether this is a text node.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Whether the child list is not empty.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// The first node in the child list.
    pub fn first_child(&self) -> Option<&Node> {
        self.children().first()
    }

    /// The last node in the child list.
    pub fn last_child(&self) -> Option<&Node> {
        self.children().last()
    }

    /// The children of the given kind.
    pub fn children_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.children().iter().filter(move |child| child.kind() == kind)
    }

    /// The first child of the given kind.
    pub fn first_child_of_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.children_of_kind(kind).next()
    }

    /// The children whose [`name`](Node::name) matches `name`.
    pub fn children_with_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Node> {
        self.children().iter().filter(move |child| child.name() == name)
    }

    /// The element children of this node.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children().iter().filter_map(Node::as_element)
    }

    /// The first element in the child list.
    pub fn first_child_element(&self) -> Option<&Element> {
        self.child_elements().next()
    }

    /// The last element in the child list.
    pub fn last_child_element(&self) -> Option<&Element> {
        self.child_elements().last()
    }

    /// The element children with the given tag name.
    pub fn child_elements_with_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |element| element.tag_name == name)
    }

    /// This node as a document, if it is one.
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Node::Document(document) => Some(document),
            _ => None,
        }
    }

    /// This node as an element, if it is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// This node as a text node, if it is one.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Puts all text nodes in the subtree under this node into normal form:
    /// adjacent `Text` siblings are merged, depth-first, in document order.
    /// Leaf nodes are left untouched. The operation is idempotent.
    pub fn normalize(&mut self) {
        match self {
            Node::Document(document) => document.normalize(),
            Node::Element(element) => element.normalize(),
            _ => {}
        }
    }
}

/// The document root. Its children are the document element plus any
/// top-level comments and processing instructions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Document {
    /// Create a new, empty document.
    pub fn new() -> Self {
        Document { children: Vec::new() }
    }

    /// The root element of the document: the first element child, if any.
    pub fn document_element(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// Append a node to the end of the child list.
    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Merge adjacent `Text` children throughout the document.
    pub fn normalize(&mut self) {
        normalize_children(&mut self.children);
    }
}

/// An element: a tag name, a map of attributes and an ordered child list.
///
/// Attribute keys are unique; inserting a duplicate key overwrites the
/// previous value (last write wins). The map iterates in lexicographic key
/// order, which the serializer relies on for deterministic output.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// The name of the element, e.g. `"item"` for `<item>`.
    pub tag_name: String,
    /// Attribute name/value pairs.
    pub attributes: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new element with no attributes and no children.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Element {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element with the given attribute map.
    pub fn with_attributes(
        tag_name: impl Into<String>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Element {
            tag_name: tag_name.into(),
            attributes,
            children: Vec::new(),
        }
    }

    /// Create a new element with the given children.
    pub fn with_children(tag_name: impl Into<String>, children: Vec<Node>) -> Self {
        Element {
            tag_name: tag_name.into(),
            attributes: BTreeMap::new(),
            children,
        }
    }

    /// Get an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The element children of this element.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// The element children with the given tag name.
    pub fn child_elements_with_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.child_elements()
            .filter(move |element| element.tag_name == name)
    }

    /// Set an attribute, replacing any previous value for the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Append a node to the end of the child list.
    pub fn append_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// If this element has exactly one child and that child is a text
    /// node, its text. `None` otherwise. Normalizing first makes this
    /// robust against split character data.
    pub fn text_value(&self) -> Option<&str> {
        match self.children.as_slice() {
            [Node::Text(text)] => Some(&text.text),
            _ => None,
        }
    }

    /// Merge adjacent `Text` children throughout this subtree.
    pub fn normalize(&mut self) {
        normalize_children(&mut self.children);
    }
}

/// Character data. A leaf node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    /// The string contents of this text node.
    pub text: String,
}

impl Text {
    /// Create a new text node.
    pub fn new(text: impl Into<String>) -> Self {
        Text { text: text.into() }
    }

    /// Append another text node's contents to this one.
    pub fn append(&mut self, other: &Text) {
        self.text.push_str(&other.text);
    }

    /// Append raw characters to this node.
    pub fn push_str(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

/// A comment: the characters between `<!--` and `-->`. A leaf node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    /// The string contents of this comment.
    pub text: String,
}

impl Comment {
    /// Create a new comment node.
    pub fn new(text: impl Into<String>) -> Self {
        Comment { text: text.into() }
    }
}

/// A processing instruction: `<?target data?>`. A leaf node.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingInstruction {
    /// The first token after the opening `<?`.
    pub target: String,
    /// Everything from the first non-whitespace character after the target
    /// to the closing `?>`, if present.
    pub data: Option<String>,
}

impl ProcessingInstruction {
    /// Create a new processing instruction node.
    pub fn new(target: impl Into<String>, data: Option<String>) -> Self {
        ProcessingInstruction {
            target: target.into(),
            data,
        }
    }
}

/// A CDATA section. The text may contain characters that would need
/// escaping outside of a CDATA section. A leaf node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CDataSection {
    /// The string contents of this CDATA section.
    pub text: String,
}

impl CDataSection {
    /// Create a new CDATA section node.
    pub fn new(text: impl Into<String>) -> Self {
        CDataSection { text: text.into() }
    }
}

/// Merge adjacent `Text` siblings in `children`, recursing depth-first.
fn normalize_children(children: &mut Vec<Node>) {
    let old = std::mem::take(children);
    for mut child in old {
        child.normalize();
        if let Node::Text(current) = &child {
            if let Some(Node::Text(previous)) = children.last_mut() {
                previous.append(current);
                continue;
            }
        }
        children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Node {
        Node::Text(Text::new(value))
    }

    #[test]
    fn test_node_names() {
        assert_eq!(Node::Document(Document::new()).name(), "#document");
        assert_eq!(Node::Element(Element::new("item")).name(), "item");
        assert_eq!(text("x").name(), "#text");
        assert_eq!(Node::Comment(Comment::new("c")).name(), "#comment");
        assert_eq!(
            Node::ProcessingInstruction(ProcessingInstruction::new("xslt", None)).name(),
            "xslt"
        );
        assert_eq!(Node::CData(CDataSection::new("d")).name(), "#cdata-section");
    }

    #[test]
    fn test_node_values() {
        assert_eq!(Node::Document(Document::new()).value(), None);
        assert_eq!(Node::Element(Element::new("item")).value(), None);
        assert_eq!(text("x").value(), Some("x"));
        assert_eq!(Node::Comment(Comment::new("c")).value(), Some("c"));
        assert_eq!(Node::CData(CDataSection::new("d")).value(), Some("d"));

        let pi = ProcessingInstruction::new("target", Some("data".to_string()));
        assert_eq!(Node::ProcessingInstruction(pi).value(), Some("data"));
        let bare = ProcessingInstruction::new("target", None);
        assert_eq!(Node::ProcessingInstruction(bare).value(), None);
    }

    #[test]
    fn test_leaves_have_no_children() {
        let leaves = [
            text("x"),
            Node::Comment(Comment::new("c")),
            Node::ProcessingInstruction(ProcessingInstruction::new("t", None)),
            Node::CData(CDataSection::new("d")),
        ];
        for leaf in &leaves {
            assert!(leaf.is_leaf());
            assert!(leaf.children().is_empty());
            assert_eq!(leaf.first_child(), None);
            assert_eq!(leaf.last_child(), None);
        }
    }

    #[test]
    fn test_document_element_skips_non_elements() {
        let mut document = Document::new();
        document.append_child(Node::Comment(Comment::new("prolog comment")));
        document.append_child(Node::Element(Element::new("root")));
        assert_eq!(
            document.document_element().map(|e| e.tag_name.as_str()),
            Some("root")
        );
    }

    #[test]
    fn test_child_queries() {
        let element = Element::with_children(
            "parent",
            vec![
                text("a"),
                Node::Element(Element::new("b")),
                Node::Comment(Comment::new("c")),
                Node::Element(Element::new("d")),
            ],
        );
        let node = Node::Element(element);

        assert!(node.has_children());
        assert_eq!(node.first_child().map(Node::name), Some("#text"));
        assert_eq!(node.last_child().map(Node::name), Some("d"));
        assert_eq!(node.children_of_kind(NodeKind::Element).count(), 2);
        assert_eq!(node.first_child_element().map(|e| e.tag_name.as_str()), Some("b"));
        assert_eq!(node.last_child_element().map(|e| e.tag_name.as_str()), Some("d"));
        assert_eq!(node.children_with_name("#comment").count(), 1);
        assert_eq!(node.child_elements_with_name("d").count(), 1);
        assert_eq!(
            node.first_child_of_kind(NodeKind::Comment).and_then(Node::value),
            Some("c")
        );
    }

    #[test]
    fn test_attribute_last_write_wins() {
        let mut element = Element::new("e");
        element.set_attribute("id", "1");
        element.set_attribute("id", "2");
        assert_eq!(element.attribute("id"), Some("2"));
        assert_eq!(element.attributes.len(), 1);
    }

    #[test]
    fn test_text_value() {
        let single = Element::with_children("e", vec![text("only")]);
        assert_eq!(single.text_value(), Some("only"));

        let mixed = Element::with_children("e", vec![text("a"), Node::Element(Element::new("b"))]);
        assert_eq!(mixed.text_value(), None);

        let empty = Element::new("e");
        assert_eq!(empty.text_value(), None);
    }

    #[test]
    fn test_normalize_text_nodes_only() {
        let mut element = Element::with_children(
            "element",
            vec![
                text("this is "),
                text("a test"),
                text(" of the normalization algorithm"),
            ],
        );
        element.normalize();
        assert_eq!(element.children.len(), 1);
        assert_eq!(
            element.children[0].value(),
            Some("this is a test of the normalization algorithm")
        );
    }

    #[test]
    fn test_normalize_mixed() {
        let mut element = Element::with_children(
            "element",
            vec![
                text("this is "),
                text("a test"),
                Node::Element(Element::new("child")),
                text("of the normalization algorithm"),
            ],
        );
        element.normalize();
        assert_eq!(element.children.len(), 3);
        assert_eq!(element.children[0].value(), Some("this is a test"));
        assert!(element.children[1].is_element());
        assert_eq!(
            element.children[2].value(),
            Some("of the normalization algorithm")
        );
    }

    #[test]
    fn test_normalize_recurses_into_children() {
        let mut element = Element::with_children(
            "element",
            vec![
                text("this is "),
                text("a test"),
                Node::Element(Element::with_children(
                    "child",
                    vec![text("the child element "), text("has text, too")],
                )),
            ],
        );
        element.normalize();
        assert_eq!(element.children.len(), 2);
        assert_eq!(element.children[0].value(), Some("this is a test"));
        let child = element.children[1].as_element().map(|e| &e.children);
        assert_eq!(child.map(Vec::len), Some(1));
        assert_eq!(
            element.children[1].first_child().and_then(Node::value),
            Some("the child element has text, too")
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut element = Element::with_children(
            "element",
            vec![text("a"), text("b"), Node::Element(Element::new("x")), text("c")],
        );
        element.normalize();
        let once = element.clone();
        element.normalize();
        assert_eq!(element, once);
    }

    #[test]
    fn test_normalize_does_not_cross_cdata() {
        let mut element = Element::with_children(
            "element",
            vec![text("a"), Node::CData(CDataSection::new("raw")), text("b")],
        );
        element.normalize();
        assert_eq!(element.children.len(), 3);
        assert_eq!(element.children[1].kind(), NodeKind::CData);
    }
}
