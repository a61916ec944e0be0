//! Parse entry points: whole-document parsing and filtered streaming.
//!
//! Each operation owns its lexer and builder for the duration of one
//! synchronous run on the calling thread; nothing is shared or reused
//! between parses.

use crate::dom::{Document, Element, TreeBuilder};
use crate::error::ParseError;
use crate::sax::Lexer;
use crate::stream::{ElementStream, StreamOutcome};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;

/// Parse an in-memory XML string into a [`Document`].
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is not well-formed; a partial
/// document is never returned.
///
/// # Examples
///
/// ```
/// let document = tinydom::parse_str("<root><child/></root>").unwrap();
/// assert_eq!(document.document_element().unwrap().tag_name, "root");
/// ```
pub fn parse_str(xml: &str) -> Result<Document, ParseError> {
    run_parse(Lexer::from_str(xml))
}

/// Parse XML from a buffered byte source into a [`Document`]. The source
/// is read synchronously to completion.
///
/// # Errors
///
/// Returns a [`ParseError`] if the input is not well-formed or contains
/// byte sequences that are not valid UTF-8.
pub fn parse_reader<R: BufRead>(reader: R) -> Result<Document, ParseError> {
    run_parse(Lexer::from_reader(reader))
}

fn run_parse<R: BufRead>(mut lexer: Lexer<R>) -> Result<Document, ParseError> {
    let mut builder = TreeBuilder::new();
    let result = match feed_all(&mut lexer, &mut builder) {
        Ok(()) => builder.finish().map_err(ParseError::from),
        Err(err) => Err(err),
    };
    if let Err(err) = &result {
        log::error!("error parsing document: {err}");
    }
    result
}

fn feed_all<R: BufRead>(lexer: &mut Lexer<R>, builder: &mut TreeBuilder) -> Result<(), ParseError> {
    while let Some(event) = lexer.next_event()? {
        builder.feed(event)?;
    }
    Ok(())
}

/// Incrementally extract elements matching `filter` from an in-memory XML
/// string, without building the whole document tree.
///
/// `on_match` receives each matching element once its subtree is complete;
/// returning `false` cancels the run. Cancellation is a normal outcome
/// ([`StreamOutcome::Cancelled`]), not an error.
///
/// # Errors
///
/// Returns a [`ParseError`] if the consumed portion of the input is
/// malformed. Input past a cancellation point is never read.
pub fn stream_elements_str<P, C>(
    xml: &str,
    filter: P,
    on_match: C,
) -> Result<StreamOutcome, ParseError>
where
    P: FnMut(&str, &BTreeMap<String, String>) -> bool,
    C: FnMut(&Element) -> bool,
{
    run_stream(Lexer::from_str(xml), filter, on_match)
}

/// Incrementally extract elements matching `filter` from a buffered byte
/// source. See [`stream_elements_str`].
///
/// # Errors
///
/// Returns a [`ParseError`] if the consumed portion of the input is
/// malformed or not valid UTF-8.
pub fn stream_elements_reader<R, P, C>(
    reader: R,
    filter: P,
    on_match: C,
) -> Result<StreamOutcome, ParseError>
where
    R: BufRead,
    P: FnMut(&str, &BTreeMap<String, String>) -> bool,
    C: FnMut(&Element) -> bool,
{
    run_stream(Lexer::from_reader(reader), filter, on_match)
}

fn run_stream<R, P, C>(
    mut lexer: Lexer<R>,
    filter: P,
    on_match: C,
) -> Result<StreamOutcome, ParseError>
where
    R: BufRead,
    P: FnMut(&str, &BTreeMap<String, String>) -> bool,
    C: FnMut(&Element) -> bool,
{
    let mut stream = ElementStream::new(filter, on_match);
    while !stream.is_cancelled() {
        match lexer.next_event()? {
            Some(event) => stream.feed(event)?,
            None => return Ok(StreamOutcome::Completed),
        }
    }
    Ok(StreamOutcome::Cancelled)
}

impl FromStr for Document {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_str(s)
    }
}
