//! DOM Module - node types and tree construction
//!
//! Implements the document tree as a closed set of owned values:
//! - A tagged `Node` enum over the six node kinds
//! - Parent/leaf capability split (only `Document` and `Element` store
//!   children)
//! - A stack-machine `TreeBuilder` that assembles trees from lexical events

pub mod builder;
pub mod node;

pub use builder::TreeBuilder;
pub use node::{
    CDataSection, Comment, Document, Element, Node, NodeKind, ProcessingInstruction, Text,
};

pub(crate) use builder::{NodeStack, PopOutcome};
