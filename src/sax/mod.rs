//! SAX (Simple API for XML) Module
//!
//! Event-based view of an XML document, consumed by the tree builder and
//! the streaming element filter.
//!
//! ## Architecture
//!
//! ```text
//! Lexer (quick-xml adapter) ---> XmlEvent ---> TreeBuilder / ElementStream
//! ```
//!
//! The consumers are agnostic to where events come from: the [`Lexer`]
//! produces them from text, and tests feed hand-written sequences directly.
//!
//! ## Event Types
//!
//! - `StartDocument` / `EndDocument` - document boundaries
//! - `StartElement` - element opening tag with name and attributes
//! - `EndElement` - element closing tag
//! - `Characters` - character data, entity references resolved
//! - `CData` - CDATA section content
//! - `Comment` - comment content
//! - `ProcessingInstruction` - PI target and data

pub mod events;
pub mod lexer;

pub use events::XmlEvent;
pub use lexer::Lexer;
