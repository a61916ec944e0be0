//! The stack machine that assembles a node tree from lexical events.
//!
//! [`NodeStack`] holds the nodes that have been started but not yet
//! closed; each entry owns its node outright until it is popped and moved
//! into its parent's child list. [`TreeBuilder`] drives a single stack to
//! build a whole [`Document`]; the streaming element filter drives a stack
//! of stacks to build filtered subtrees.

use crate::dom::node::{CDataSection, Comment, Document, Element, Node, ProcessingInstruction, Text};
use crate::error::StructuralError;
use crate::sax::events::XmlEvent;
use std::collections::BTreeMap;

/// What happened to the popped node in [`NodeStack::pop_and_append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PopOutcome {
    /// The node was appended to the parent below it on the stack.
    Attached,
    /// The stack would have emptied: the node is the completed root and
    /// was pushed back so it stays reachable.
    Completed,
}

/// A stack of open parent nodes.
///
/// Only parent-kind nodes are ever pushed; leaf nodes are appended to the
/// top entry's child list immediately, so every entry can accept children.
#[derive(Debug, Default)]
pub(crate) struct NodeStack {
    stack: Vec<Node>,
}

impl NodeStack {
    pub(crate) fn new() -> Self {
        NodeStack { stack: Vec::new() }
    }

    /// The innermost open node.
    pub(crate) fn top(&self) -> Option<&Node> {
        self.stack.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.stack.len()
    }

    /// Consume the stack, returning its single remaining node.
    pub(crate) fn into_first(mut self) -> Option<Node> {
        self.stack.pop()
    }

    /// Open a parent node (it becomes the new attach point) or append a
    /// leaf node to the current attach point.
    pub(crate) fn append(&mut self, node: Node) -> Result<(), StructuralError> {
        if node.is_parent() {
            self.stack.push(node);
            return Ok(());
        }
        let top = self.stack.last_mut().ok_or(StructuralError::NoOpenParent)?;
        match top.children_mut() {
            Some(children) => {
                children.push(node);
                Ok(())
            }
            None => Err(StructuralError::NoOpenParent),
        }
    }

    /// Append character data, merging into a trailing text sibling if one
    /// exists. A lexer may deliver contiguous character data in several
    /// chunks; merging here keeps them a single `Text` node without a
    /// separate normalization pass.
    pub(crate) fn append_characters(&mut self, text: &str) -> Result<(), StructuralError> {
        let top = self.stack.last_mut().ok_or(StructuralError::NoOpenParent)?;
        match top.children_mut() {
            Some(children) => {
                if let Some(Node::Text(previous)) = children.last_mut() {
                    previous.push_str(text);
                } else {
                    children.push(Node::Text(Text::new(text)));
                }
                Ok(())
            }
            None => Err(StructuralError::NoOpenParent),
        }
    }

    /// Close the innermost open node: pop it and append it to the new top
    /// of the stack. If the stack would empty, the popped node is the
    /// completed root; it is pushed back and the caller is told.
    pub(crate) fn pop_and_append(&mut self) -> Result<PopOutcome, StructuralError> {
        let child = self.stack.pop().ok_or(StructuralError::NoOpenElement)?;
        match self.stack.last_mut() {
            Some(parent) => match parent.children_mut() {
                Some(children) => {
                    children.push(child);
                    Ok(PopOutcome::Attached)
                }
                None => Err(StructuralError::NoOpenParent),
            },
            None => {
                self.stack.push(child);
                Ok(PopOutcome::Completed)
            }
        }
    }
}

/// Builder state, advanced by [`TreeBuilder::feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No `StartDocument` seen yet.
    Ready,
    /// Between `StartDocument` and `EndDocument`.
    Open,
    /// `EndDocument` seen; the document is complete.
    Done,
    /// A previous event violated an invariant; all further events are
    /// rejected so a partial tree can never escape as a success.
    Failed,
}

/// Incrementally assembles a [`Document`] from a sequence of [`XmlEvent`]s.
///
/// The expected sequence is `StartDocument`, any properly nested mix of
/// element and leaf events, then `EndDocument`. Any violation is a fatal
/// [`StructuralError`]: the builder halts and [`finish`](TreeBuilder::finish)
/// will not produce a document.
#[derive(Debug)]
pub struct TreeBuilder {
    stack: NodeStack,
    state: State,
}

impl TreeBuilder {
    /// Create a builder awaiting `StartDocument`.
    pub fn new() -> Self {
        TreeBuilder {
            stack: NodeStack::new(),
            state: State::Ready,
        }
    }

    /// Feed one event to the builder.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralError`] if the event violates the expected
    /// sequence; the builder then rejects all further events.
    pub fn feed(&mut self, event: XmlEvent) -> Result<(), StructuralError> {
        let result = self.apply(event);
        if result.is_err() {
            self.state = State::Failed;
        }
        result
    }

    fn apply(&mut self, event: XmlEvent) -> Result<(), StructuralError> {
        match self.state {
            State::Failed => return Err(StructuralError::Halted),
            State::Done => return Err(StructuralError::DocumentEnded),
            State::Ready => {
                if let XmlEvent::StartDocument = event {
                    self.stack.append(Node::Document(Document::new()))?;
                    self.state = State::Open;
                    return Ok(());
                }
                return Err(StructuralError::DocumentNotOpen);
            }
            State::Open => {}
        }

        match event {
            XmlEvent::StartDocument => Err(StructuralError::DocumentNotOpen),
            XmlEvent::StartElement { name, attributes } => {
                log::debug!("start element <{name}>");
                let attributes: BTreeMap<String, String> = attributes.into_iter().collect();
                self.stack
                    .append(Node::Element(Element::with_attributes(name, attributes)))
            }
            XmlEvent::EndElement { name } => {
                log::debug!("end element </{name}>");
                match self.stack.top() {
                    Some(Node::Element(element)) => {
                        if element.tag_name != name {
                            return Err(StructuralError::MismatchedEnd {
                                expected: element.tag_name.clone(),
                                found: name,
                            });
                        }
                    }
                    _ => return Err(StructuralError::NoOpenElement),
                }
                self.stack.pop_and_append().map(|_| ())
            }
            XmlEvent::Characters(text) => self.stack.append_characters(&text),
            XmlEvent::Comment(text) => self.stack.append(Node::Comment(Comment::new(text))),
            XmlEvent::ProcessingInstruction { target, data } => self
                .stack
                .append(Node::ProcessingInstruction(ProcessingInstruction::new(target, data))),
            XmlEvent::CData(text) => self.stack.append(Node::CData(CDataSection::new(text))),
            XmlEvent::EndDocument => {
                if self.stack.len() > 1 {
                    return Err(StructuralError::UnclosedElements(self.stack.len() - 1));
                }
                self.state = State::Done;
                Ok(())
            }
        }
    }

    /// Consume the builder, returning the completed document.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralError`] if `EndDocument` has not been fed or
    /// a previous event failed.
    pub fn finish(self) -> Result<Document, StructuralError> {
        match self.state {
            State::Done => match self.stack.into_first() {
                Some(Node::Document(document)) => Ok(document),
                _ => Err(StructuralError::DocumentNotOpen),
            },
            State::Failed => Err(StructuralError::Halted),
            State::Ready | State::Open => Err(StructuralError::DocumentNotOpen),
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
