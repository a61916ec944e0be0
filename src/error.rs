//! Error types for parsing and tree construction.
//!
//! Two independent failure surfaces exist: the lexer rejects malformed
//! input ([`LexError`]), and the tree builder rejects event sequences that
//! violate its stack invariants ([`StructuralError`]). They are distinct
//! types so callers and tests can tell them apart. Byte content that is not
//! valid UTF-8 is a third, hard failure ([`EncodingError`]).

use std::str::Utf8Error;
use thiserror::Error;

/// Top-level error returned by the parse and stream entry points.
///
/// A failed parse never yields a partially built document; the first error
/// aborts the whole operation.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying lexer rejected the input as malformed XML.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The tree builder was driven with an inconsistent event sequence.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Character or CDATA content could not be decoded as valid text.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Lex(LexError::Syntax(err))
    }
}

impl From<quick_xml::escape::EscapeError> for ParseError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        ParseError::Lex(LexError::Escape(err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Lex(LexError::Attribute(err))
    }
}

/// Malformed-input diagnostics reported at the lexer boundary.
///
/// Most variants wrap the underlying reader's errors; the remaining ones
/// are document-level well-formedness checks the lexer adapter performs
/// itself (the tree builder never sees these event sequences).
#[derive(Debug, Error)]
pub enum LexError {
    /// Syntax error reported by the underlying XML reader.
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    /// An entity or character reference could not be resolved.
    #[error("invalid entity reference: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// An attribute was malformed (missing value, duplicate quote, ...).
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Input ended while elements were still open.
    #[error("unexpected end of input: <{0}> is not closed")]
    UnexpectedEof(String),

    /// A close tag did not match the innermost open element.
    #[error("close tag </{found}> does not match open tag <{expected}>")]
    MismatchedTag {
        /// Name of the innermost open element.
        expected: String,
        /// Name found in the close tag.
        found: String,
    },

    /// A close tag appeared with no element open at all.
    #[error("close tag </{0}> has no matching open tag")]
    StrayCloseTag(String),

    /// Non-whitespace character data appeared outside the root element.
    #[error("character data outside of the document element")]
    TextOutsideRoot,

    /// A second top-level element was found.
    #[error("document contains more than one top-level element")]
    MultipleRoots,

    /// The document ended without any top-level element.
    #[error("document contains no element")]
    MissingRoot,
}

/// Stack-invariant violations raised by the tree builder itself.
///
/// These indicate an inconsistent event sequence (e.g. hand-fed events in
/// the wrong order), not malformed input text; a well-formed event stream
/// from the lexer can never trigger them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    /// An event other than `StartDocument` arrived before the document was
    /// started, or `StartDocument` arrived twice.
    #[error("the document is not open for this event")]
    DocumentNotOpen,

    /// An event arrived after `EndDocument`.
    #[error("event received after the document ended")]
    DocumentEnded,

    /// A leaf event arrived with no open parent on the stack.
    #[error("no open node to attach content to")]
    NoOpenParent,

    /// An `EndElement` event arrived with no element open.
    #[error("no open element to close")]
    NoOpenElement,

    /// An `EndElement` event named a different element than the one open.
    #[error("close tag </{found}> does not match open element <{expected}>")]
    MismatchedEnd {
        /// Name of the innermost open element.
        expected: String,
        /// Name carried by the `EndElement` event.
        found: String,
    },

    /// The document ended while elements were still open.
    #[error("document ended with {0} unclosed element(s)")]
    UnclosedElements(usize),

    /// The builder refused an event because a previous event already
    /// failed; the partial tree is unrecoverable.
    #[error("builder halted after a previous error")]
    Halted,
}

/// A byte sequence that should have been text was not valid UTF-8.
///
/// This is always a hard parse failure, never substituted or dropped.
#[derive(Debug, Error)]
#[error("{context} contains invalid UTF-8: {source}")]
pub struct EncodingError {
    /// What was being decoded (element name, character data, ...).
    pub context: &'static str,
    /// The underlying decode failure.
    #[source]
    pub source: Utf8Error,
}

impl EncodingError {
    pub(crate) fn new(context: &'static str, source: Utf8Error) -> Self {
        EncodingError { context, source }
    }
}
