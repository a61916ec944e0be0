//! Lexical event types.
//!
//! Defines the events the tree builder and the streaming element filter
//! consume. Events carry owned strings: whoever produces them (the lexer
//! adapter, or an in-memory sequence in tests) hands the data over, and the
//! builder moves it straight into the tree without copying again.

/// One unit of the lexer's output stream.
///
/// A well-formed stream is `StartDocument`, a properly nested mix of
/// element and leaf events, then `EndDocument`. Attribute pairs preserve
/// source order; duplicate names resolve last-write-wins when the builder
/// turns them into a map.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// Start of the document.
    StartDocument,
    /// Start of an element: `<name attrs...>`
    StartElement {
        /// Element name.
        name: String,
        /// Attribute name/value pairs in source order.
        attributes: Vec<(String, String)>,
    },
    /// End of an element: `</name>`
    EndElement {
        /// Element name.
        name: String,
    },
    /// Character data between tags, entity references resolved.
    Characters(String),
    /// Comment content, excluding the `<!--` and `-->` markers.
    Comment(String),
    /// Processing instruction: `<?target data?>`
    ProcessingInstruction {
        /// The first token after the opening `<?`.
        target: String,
        /// The remainder, leading whitespace stripped; `None` if empty.
        data: Option<String>,
    },
    /// CDATA section content, excluding the markers.
    CData(String),
    /// End of the document.
    EndDocument,
}

impl XmlEvent {
    /// Check if this is a start element event.
    #[inline]
    pub fn is_start_element(&self) -> bool {
        matches!(self, XmlEvent::StartElement { .. })
    }

    /// Check if this is an end element event.
    #[inline]
    pub fn is_end_element(&self) -> bool {
        matches!(self, XmlEvent::EndElement { .. })
    }

    /// Check if this is a characters event.
    #[inline]
    pub fn is_characters(&self) -> bool {
        matches!(self, XmlEvent::Characters(_))
    }

    /// Get the element name if this is a start or end element event.
    pub fn element_name(&self) -> Option<&str> {
        match self {
            XmlEvent::StartElement { name, .. } | XmlEvent::EndElement { name } => Some(name),
            _ => None,
        }
    }
}
