//! Tree traversal via the visitor pattern.
//!
//! Algorithms that walk the tree (pretty-printing, dumping, searching) are
//! kept separate from the node types: implement [`Visitor`] and hand it to
//! [`Node::accept`]. Traversal is always depth-first in document order;
//! parent kinds get a begin/end hook pair around their children, leaf kinds
//! get a single hook. Every hook has a default no-op implementation, so a
//! visitor implements only the kinds it cares about.
//!
//! [`LazyVisitor`] is the early-exit variant: every hook returns a
//! [`Flow`], and the first `Stop` ends the whole traversal immediately.

use crate::dom::{CDataSection, Comment, Document, Element, Node, ProcessingInstruction, Text};

/// Continue-or-stop signal returned by [`LazyVisitor`] hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep visiting.
    Continue,
    /// End the traversal; no further nodes are visited.
    Stop,
}

/// Per-kind callbacks for a full tree traversal.
///
/// All methods default to doing nothing.
pub trait Visitor {
    /// Called for a document before its children are traversed.
    fn begin_visit_document(&mut self, _document: &Document) {}

    /// Called for a document after its children are traversed.
    fn end_visit_document(&mut self, _document: &Document) {}

    /// Called for an element before its children are traversed.
    fn begin_visit_element(&mut self, _element: &Element) {}

    /// Called for an element after its children are traversed.
    fn end_visit_element(&mut self, _element: &Element) {}

    /// Called for a text node.
    fn visit_text(&mut self, _text: &Text) {}

    /// Called for a processing instruction node.
    fn visit_processing_instruction(&mut self, _pi: &ProcessingInstruction) {}

    /// Called for a comment node.
    fn visit_comment(&mut self, _comment: &Comment) {}

    /// Called for a CDATA section node.
    fn visit_cdata(&mut self, _cdata: &CDataSection) {}
}

/// Per-kind callbacks for an early-exit traversal. Each hook decides
/// whether the walk continues.
pub trait LazyVisitor {
    /// Called for a document before its children are traversed.
    fn begin_visit_document(&mut self, _document: &Document) -> Flow {
        Flow::Continue
    }

    /// Called for a document after its children are traversed.
    fn end_visit_document(&mut self, _document: &Document) -> Flow {
        Flow::Continue
    }

    /// Called for an element before its children are traversed.
    fn begin_visit_element(&mut self, _element: &Element) -> Flow {
        Flow::Continue
    }

    /// Called for an element after its children are traversed.
    fn end_visit_element(&mut self, _element: &Element) -> Flow {
        Flow::Continue
    }

    /// Called for a text node.
    fn visit_text(&mut self, _text: &Text) -> Flow {
        Flow::Continue
    }

    /// Called for a processing instruction node.
    fn visit_processing_instruction(&mut self, _pi: &ProcessingInstruction) -> Flow {
        Flow::Continue
    }

    /// Called for a comment node.
    fn visit_comment(&mut self, _comment: &Comment) -> Flow {
        Flow::Continue
    }

    /// Called for a CDATA section node.
    fn visit_cdata(&mut self, _cdata: &CDataSection) -> Flow {
        Flow::Continue
    }
}

impl Node {
    /// Traverse the subtree rooted at this node, dispatching to the
    /// visitor's hooks in document order.
    pub fn accept<V: Visitor>(&self, visitor: &mut V) {
        match self {
            Node::Document(document) => {
                visitor.begin_visit_document(document);
                for child in &document.children {
                    child.accept(visitor);
                }
                visitor.end_visit_document(document);
            }
            Node::Element(element) => {
                visitor.begin_visit_element(element);
                for child in &element.children {
                    child.accept(visitor);
                }
                visitor.end_visit_element(element);
            }
            Node::Text(text) => visitor.visit_text(text),
            Node::Comment(comment) => visitor.visit_comment(comment),
            Node::ProcessingInstruction(pi) => visitor.visit_processing_instruction(pi),
            Node::CData(cdata) => visitor.visit_cdata(cdata),
        }
    }

    /// Traverse the subtree rooted at this node until a hook returns
    /// [`Flow::Stop`]. Once stopped, no further nodes are visited, and the
    /// end-hooks of enclosing ancestors do not fire.
    pub fn accept_lazy<V: LazyVisitor>(&self, visitor: &mut V) -> Flow {
        match self {
            Node::Document(document) => {
                if visitor.begin_visit_document(document) == Flow::Stop {
                    return Flow::Stop;
                }
                for child in &document.children {
                    if child.accept_lazy(visitor) == Flow::Stop {
                        return Flow::Stop;
                    }
                }
                visitor.end_visit_document(document)
            }
            Node::Element(element) => {
                if visitor.begin_visit_element(element) == Flow::Stop {
                    return Flow::Stop;
                }
                for child in &element.children {
                    if child.accept_lazy(visitor) == Flow::Stop {
                        return Flow::Stop;
                    }
                }
                visitor.end_visit_element(element)
            }
            Node::Text(text) => visitor.visit_text(text),
            Node::Comment(comment) => visitor.visit_comment(comment),
            Node::ProcessingInstruction(pi) => visitor.visit_processing_instruction(pi),
            Node::CData(cdata) => visitor.visit_cdata(cdata),
        }
    }
}
