//! Streaming element extraction (bounded-memory filtering).
//!
//! A variant of the tree builder that only materializes subtrees whose
//! root element satisfies a predicate. Everything outside an active
//! capture is discarded as soon as it is seen, so memory use is bounded by
//! the captured subtrees, not the document.

use crate::dom::{Element, Node, NodeStack, PopOutcome};
use crate::error::StructuralError;
use crate::sax::events::XmlEvent;
use std::collections::BTreeMap;

/// How a streaming run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The whole document was consumed.
    Completed,
    /// The callback asked to stop; trailing input was left unread.
    Cancelled,
}

/// Consumes lexical events, invoking a callback for each element subtree
/// whose root matches the filter.
///
/// The stream maintains a stack of independent node stacks: a new
/// capture begins whenever a `StartElement` satisfies the filter (matching
/// elements nested inside another capture start their own), and completes
/// when the element that began it closes. Completed inner captures are
/// re-attached to the enclosing capture so an outer match contains its
/// inner matches in full.
///
/// The callback's return value controls continuation: `false` cancels the
/// stream, and no further events are processed.
pub struct ElementStream<P, C>
where
    P: FnMut(&str, &BTreeMap<String, String>) -> bool,
    C: FnMut(&Element) -> bool,
{
    filter: P,
    on_match: C,
    stacks: Vec<NodeStack>,
    cancelled: bool,
}

impl<P, C> ElementStream<P, C>
where
    P: FnMut(&str, &BTreeMap<String, String>) -> bool,
    C: FnMut(&Element) -> bool,
{
    /// Create a stream with the given filter and match callback.
    pub fn new(filter: P, on_match: C) -> Self {
        ElementStream {
            filter,
            on_match,
            stacks: Vec::new(),
            cancelled: false,
        }
    }

    /// Whether the callback has requested cancellation. Once set, all
    /// further events are ignored.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Feed one event to the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`StructuralError`] if the event sequence is inconsistent
    /// with the capture state (never for well-formed lexer output).
    pub fn feed(&mut self, event: XmlEvent) -> Result<(), StructuralError> {
        if self.cancelled {
            return Ok(());
        }
        match event {
            XmlEvent::StartDocument | XmlEvent::EndDocument => Ok(()),

            XmlEvent::StartElement { name, attributes } => {
                let attributes: BTreeMap<String, String> = attributes.into_iter().collect();
                if (self.filter)(&name, &attributes) {
                    log::debug!("capture begins at <{name}>");
                    self.stacks.push(NodeStack::new());
                }
                if let Some(stack) = self.stacks.last_mut() {
                    stack.append(Node::Element(Element::with_attributes(name, attributes)))?;
                }
                Ok(())
            }

            XmlEvent::EndElement { name } => {
                let Some(stack) = self.stacks.last_mut() else {
                    return Ok(());
                };
                match stack.top() {
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
                if stack.pop_and_append()? == PopOutcome::Completed {
                    self.complete_capture()?;
                }
                Ok(())
            }

            XmlEvent::Characters(text) => match self.stacks.last_mut() {
                Some(stack) => stack.append_characters(&text),
                None => Ok(()),
            },

            XmlEvent::Comment(text) => self.append_leaf(Node::Comment(crate::dom::Comment::new(text))),

            XmlEvent::ProcessingInstruction { target, data } => self.append_leaf(
                Node::ProcessingInstruction(crate::dom::ProcessingInstruction::new(target, data)),
            ),

            XmlEvent::CData(text) => {
                self.append_leaf(Node::CData(crate::dom::CDataSection::new(text)))
            }
        }
    }

    fn append_leaf(&mut self, node: Node) -> Result<(), StructuralError> {
        match self.stacks.last_mut() {
            Some(stack) => stack.append(node),
            None => Ok(()),
        }
    }

    /// The innermost capture's root element just closed: deliver it, and
    /// unless the callback cancelled, attach it into the enclosing capture.
    fn complete_capture(&mut self) -> Result<(), StructuralError> {
        let Some(stack) = self.stacks.pop() else {
            return Err(StructuralError::NoOpenElement);
        };
        let element = match stack.into_first() {
            Some(Node::Element(element)) => element,
            _ => return Err(StructuralError::NoOpenElement),
        };
        log::debug!("capture complete: <{}>", element.tag_name);

        if !(self.on_match)(&element) {
            self.cancelled = true;
            return Ok(());
        }
        if let Some(outer) = self.stacks.last_mut() {
            outer.append(Node::Element(element))?;
            outer.pop_and_append()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(name: &str) -> XmlEvent {
        XmlEvent::StartElement {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    fn start_with(name: &str, attrs: &[(&str, &str)]) -> XmlEvent {
        XmlEvent::StartElement {
            name: name.to_string(),
            attributes: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    fn end(name: &str) -> XmlEvent {
        XmlEvent::EndElement {
            name: name.to_string(),
        }
    }

    fn run_stream<P>(events: Vec<XmlEvent>, filter: P) -> Vec<Element>
    where
        P: FnMut(&str, &BTreeMap<String, String>) -> bool,
    {
        let mut matches = Vec::new();
        let mut stream = ElementStream::new(filter, |element: &Element| {
            matches.push(element.clone());
            true
        });
        for event in events {
            stream.feed(event).unwrap();
            if stream.is_cancelled() {
                break;
            }
        }
        matches
    }

    #[test]
    fn test_captures_matching_subtrees() {
        let matches = run_stream(
            vec![
                XmlEvent::StartDocument,
                start("root"),
                start("item"),
                XmlEvent::Characters("first".to_string()),
                end("item"),
                start("other"),
                end("other"),
                start("item"),
                XmlEvent::Characters("second".to_string()),
                end("item"),
                end("root"),
                XmlEvent::EndDocument,
            ],
            |name, _| name == "item",
        );

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].text_value(), Some("first"));
        assert_eq!(matches[1].text_value(), Some("second"));
    }

    #[test]
    fn test_non_matching_content_is_discarded() {
        // No capture is ever active, so nothing accumulates and nothing
        // is delivered.
        let matches = run_stream(
            vec![
                XmlEvent::StartDocument,
                start("root"),
                XmlEvent::Characters("ignored".to_string()),
                XmlEvent::Comment("ignored".to_string()),
                end("root"),
                XmlEvent::EndDocument,
            ],
            |name, _| name == "absent",
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn test_nested_match_is_delivered_and_contained() {
        let matches = run_stream(
            vec![
                XmlEvent::StartDocument,
                start("outer"),
                start("inner"),
                XmlEvent::Characters("x".to_string()),
                end("inner"),
                end("outer"),
                XmlEvent::EndDocument,
            ],
            |name, _| name == "outer" || name == "inner",
        );

        // Inner first, then outer containing the full inner subtree.
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].tag_name, "inner");
        assert_eq!(matches[1].tag_name, "outer");
        assert_eq!(matches[1].children.len(), 1);
        assert_eq!(
            matches[1].children[0].as_element().map(|e| e.tag_name.as_str()),
            Some("inner")
        );
    }

    #[test]
    fn test_same_name_nesting_with_attribute_filter() {
        // Only the outer <item> matches; the inner one must not complete
        // the capture early even though the names collide.
        let matches = run_stream(
            vec![
                XmlEvent::StartDocument,
                start_with("item", &[("id", "1")]),
                start("item"),
                end("item"),
                end("item"),
                XmlEvent::EndDocument,
            ],
            |name, attrs| name == "item" && attrs.contains_key("id"),
        );

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].attribute("id"), Some("1"));
        assert_eq!(matches[0].children.len(), 1);
    }

    #[test]
    fn test_cancellation_stops_delivery() {
        let mut delivered = Vec::new();
        let mut stream = ElementStream::new(
            |name: &str, _: &BTreeMap<String, String>| name == "m",
            |element: &Element| {
                delivered.push(element.tag_name.clone());
                false
            },
        );

        let events = vec![
            XmlEvent::StartDocument,
            start("root"),
            start("m"),
            end("m"),
            start("x"),
            end("x"),
            start("m"),
            end("m"),
            end("root"),
            XmlEvent::EndDocument,
        ];
        let mut remaining = 0;
        for event in events {
            if stream.is_cancelled() {
                remaining += 1;
                continue;
            }
            stream.feed(event).unwrap();
        }

        assert!(stream.is_cancelled());
        assert_eq!(delivered, vec!["m".to_string()]);
        // The second <m> was never reached.
        assert_eq!(remaining, 6);
    }

    #[test]
    fn test_events_after_cancellation_are_ignored() {
        let mut stream = ElementStream::new(
            |name: &str, _: &BTreeMap<String, String>| name == "m",
            |_: &Element| false,
        );
        stream.feed(XmlEvent::StartDocument).unwrap();
        stream.feed(start("m")).unwrap();
        stream.feed(end("m")).unwrap();
        assert!(stream.is_cancelled());
        // A stray event that would otherwise error is silently dropped.
        stream.feed(end("never-opened")).unwrap();
    }

    #[test]
    fn test_mismatched_end_inside_capture_is_structural() {
        let mut stream = ElementStream::new(
            |name: &str, _: &BTreeMap<String, String>| name == "m",
            |_: &Element| true,
        );
        stream.feed(XmlEvent::StartDocument).unwrap();
        stream.feed(start("m")).unwrap();
        let err = stream.feed(end("q")).unwrap_err();
        assert!(matches!(err, StructuralError::MismatchedEnd { .. }));
    }
}
