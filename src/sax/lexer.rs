//! Lexer adapter over the underlying XML reader.
//!
//! Wraps `quick_xml::Reader` and converts its pull events into the crate's
//! [`XmlEvent`] grammar. The adapter is also the well-formedness gate for
//! document-level structure: mismatched or stray close tags, truncated
//! input, character data outside the root element and multiple root
//! elements are reported here as [`LexError`]s, so the tree builder only
//! ever sees consistent event sequences from this source.

use crate::error::{EncodingError, LexError, ParseError};
use crate::sax::events::XmlEvent;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::VecDeque;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// `StartDocument` not yet emitted.
    Fresh,
    /// Reading events from the underlying reader.
    Active,
    /// `EndDocument` emitted; the stream is exhausted.
    Done,
}

/// Pull-based source of [`XmlEvent`]s.
///
/// Emits `StartDocument` first, then the document's events in order
/// (self-closing elements become a start/end pair), then `EndDocument`,
/// then `None`. The XML declaration and DOCTYPE are consumed silently, as
/// is insignificant whitespace outside the root element.
pub struct Lexer<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Events synthesized ahead of the reader (end of a self-closing tag).
    pending: VecDeque<XmlEvent>,
    /// Names of currently open elements.
    open: Vec<String>,
    seen_root: bool,
    state: State,
}

impl<R: BufRead> Lexer<R> {
    /// Create a lexer reading from a buffered byte source.
    pub fn from_reader(reader: R) -> Self {
        Lexer {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            pending: VecDeque::new(),
            open: Vec::new(),
            seen_root: false,
            state: State::Fresh,
        }
    }

    /// Pull the next event, or `None` once `EndDocument` has been emitted.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed input ([`LexError`]) or for
    /// byte content that is not valid UTF-8 ([`EncodingError`]).
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>, ParseError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        match self.state {
            State::Fresh => {
                self.state = State::Active;
                return Ok(Some(XmlEvent::StartDocument));
            }
            State::Done => return Ok(None),
            State::Active => {}
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Decl(_) | Event::DocType(_) => continue,

                Event::Start(start) => {
                    let name = decode(start.name().as_ref(), "element name")?.to_string();
                    let attributes = collect_attributes(&start)?;
                    self.enter_element(&name)?;
                    return Ok(Some(XmlEvent::StartElement { name, attributes }));
                }

                Event::Empty(start) => {
                    let name = decode(start.name().as_ref(), "element name")?.to_string();
                    let attributes = collect_attributes(&start)?;
                    // A self-closing element opens and closes at once; it
                    // is never pushed onto the open-element stack.
                    if self.open.is_empty() {
                        self.check_root()?;
                    }
                    self.pending.push_back(XmlEvent::EndElement { name: name.clone() });
                    return Ok(Some(XmlEvent::StartElement { name, attributes }));
                }

                Event::End(end) => {
                    let name = decode(end.name().as_ref(), "element name")?.to_string();
                    match self.open.pop() {
                        None => return Err(LexError::StrayCloseTag(name).into()),
                        Some(expected) if expected != name => {
                            return Err(LexError::MismatchedTag {
                                expected,
                                found: name,
                            }
                            .into())
                        }
                        Some(_) => {}
                    }
                    return Ok(Some(XmlEvent::EndElement { name }));
                }

                Event::Text(text) => {
                    let raw = decode(&text, "character data")?;
                    let unescaped = quick_xml::escape::unescape(raw)?;
                    if self.open.is_empty() {
                        if unescaped.trim().is_empty() {
                            continue;
                        }
                        return Err(LexError::TextOutsideRoot.into());
                    }
                    return Ok(Some(XmlEvent::Characters(unescaped.into_owned())));
                }

                Event::CData(cdata) => {
                    let content = decode(&cdata, "CDATA section")?.to_string();
                    if self.open.is_empty() {
                        return Err(LexError::TextOutsideRoot.into());
                    }
                    return Ok(Some(XmlEvent::CData(content)));
                }

                Event::Comment(comment) => {
                    let content = decode(&comment, "comment")?.to_string();
                    return Ok(Some(XmlEvent::Comment(content)));
                }

                Event::PI(pi) => {
                    let content = decode(&pi, "processing instruction")?;
                    let (target, data) = split_pi(content);
                    return Ok(Some(XmlEvent::ProcessingInstruction { target, data }));
                }

                Event::Eof => {
                    if let Some(unclosed) = self.open.last() {
                        return Err(LexError::UnexpectedEof(unclosed.clone()).into());
                    }
                    if !self.seen_root {
                        return Err(LexError::MissingRoot.into());
                    }
                    self.state = State::Done;
                    return Ok(Some(XmlEvent::EndDocument));
                }
            }
        }
    }

    fn enter_element(&mut self, name: &str) -> Result<(), ParseError> {
        if self.open.is_empty() {
            self.check_root()?;
        }
        self.open.push(name.to_string());
        Ok(())
    }

    fn check_root(&mut self) -> Result<(), ParseError> {
        if self.seen_root {
            return Err(LexError::MultipleRoots.into());
        }
        self.seen_root = true;
        Ok(())
    }
}

impl<'a> Lexer<&'a [u8]> {
    /// Create a lexer over an in-memory string.
    pub fn from_str(xml: &'a str) -> Self {
        Self::from_reader(xml.as_bytes())
    }
}

fn decode<'b>(bytes: &'b [u8], context: &'static str) -> Result<&'b str, EncodingError> {
    std::str::from_utf8(bytes).map_err(|err| EncodingError::new(context, err))
}

fn collect_attributes(
    start: &quick_xml::events::BytesStart<'_>,
) -> Result<Vec<(String, String)>, ParseError> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let name = decode(attribute.key.as_ref(), "attribute name")?.to_string();
        let raw = decode(&attribute.value, "attribute value")?;
        let value = quick_xml::escape::unescape(raw)?.into_owned();
        attributes.push((name, value));
    }
    Ok(attributes)
}

/// Split a processing instruction body into target and data: the target is
/// the first whitespace-delimited token, the data runs from the first
/// non-whitespace character after it.
fn split_pi(content: &str) -> (String, Option<String>) {
    match content.split_once(|c: char| c.is_ascii_whitespace()) {
        Some((target, rest)) => {
            let data = rest.trim_start();
            let data = if data.is_empty() {
                None
            } else {
                Some(data.to_string())
            };
            (target.to_string(), data)
        }
        None => (content.to_string(), None),
    }
}
