//! tinydom - a minimal XML Document Object Model
//!
//! Parses XML into an in-memory tree of typed nodes, supports programmatic
//! construction and mutation, and serializes the tree back to text.
//!
//! Capabilities:
//! - Whole-document parsing (`parse_str`, `parse_reader`)
//! - Filtered streaming extraction with cancellation (`stream_elements_*`)
//! - Tree traversal via visitors (`Node::accept`, `Node::accept_lazy`)
//! - Path queries (`Node::evaluate`)
//! - Serialization, compact or pretty-printed (`Node::dump`, `serialize`)
//!
//! The low-level tokenizer is an external collaborator (an adapter over
//! `quick-xml`); the tree builder consumes its [`XmlEvent`]s and can just
//! as well be driven by any other event source.
//!
//! ```
//! let document = tinydom::parse_str("<greeting to=\"world\">hi</greeting>").unwrap();
//! let root = document.document_element().unwrap();
//! assert_eq!(root.attribute("to"), Some("world"));
//! assert_eq!(root.text_value(), Some("hi"));
//! ```
//!
//! Parsing runs synchronously on the calling thread; each parse owns its
//! own builder state. A completed tree is plain owned data with no
//! internal locking.

mod dom;
mod error;
mod format;
mod parser;
mod path;
mod sax;
mod search;
mod stream;
mod visitor;

pub use dom::{
    CDataSection, Comment, Document, Element, Node, NodeKind, ProcessingInstruction, Text,
    TreeBuilder,
};
pub use error::{EncodingError, LexError, ParseError, StructuralError};
pub use format::serialize;
pub use parser::{parse_reader, parse_str, stream_elements_reader, stream_elements_str};
pub use sax::{Lexer, XmlEvent};
pub use stream::{ElementStream, StreamOutcome};
pub use visitor::{Flow, LazyVisitor, Visitor};
