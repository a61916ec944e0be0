//! Element search queries over a completed tree.

use crate::dom::{Document, Element, Node};

impl Document {
    /// Collect every element in the document with the given tag name, in
    /// document order.
    pub fn elements_with_tag_name(&self, name: &str) -> Vec<&Element> {
        self.elements_where(|element| element.tag_name == name)
    }

    /// Collect every element in the document satisfying `predicate`, in
    /// document order. The search covers the document element and its
    /// whole subtree.
    pub fn elements_where<P>(&self, mut predicate: P) -> Vec<&Element>
    where
        P: FnMut(&Element) -> bool,
    {
        fn collect<'a, P: FnMut(&Element) -> bool>(
            node: &'a Node,
            predicate: &mut P,
            found: &mut Vec<&'a Element>,
        ) {
            if let Node::Element(element) = node {
                if predicate(element) {
                    found.push(element);
                }
            }
            for child in node.children() {
                collect(child, predicate, found);
            }
        }

        let mut found = Vec::new();
        for child in &self.children {
            collect(child, &mut predicate, &mut found);
        }
        found
    }
}

impl Node {
    /// Find the first element (in document order) satisfying `predicate`
    /// and return the chain of nodes from this node down to it, inclusive.
    ///
    /// The walk is lazy: it stops as soon as a match is found, and only
    /// the ancestors of the match are retained. Returns `None` when no
    /// element matches.
    pub fn find_first<P>(&self, mut predicate: P) -> Option<Vec<&Node>>
    where
        P: FnMut(&Element) -> bool,
    {
        fn walk<'a, P: FnMut(&Element) -> bool>(
            node: &'a Node,
            predicate: &mut P,
            path: &mut Vec<&'a Node>,
        ) -> bool {
            path.push(node);
            if let Node::Element(element) = node {
                if predicate(element) {
                    return true;
                }
            }
            for child in node.children() {
                if walk(child, predicate, path) {
                    return true;
                }
            }
            path.pop();
            false
        }

        let mut path = Vec::new();
        if walk(self, &mut predicate, &mut path) {
            Some(path)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Text;

    fn sample_document() -> Document {
        Document {
            children: vec![Node::Element(Element::with_children(
                "library",
                vec![
                    Node::Element(Element::with_children(
                        "shelf",
                        vec![
                            Node::Element(Element::with_children(
                                "book",
                                vec![Node::Text(Text::new("first"))],
                            )),
                            Node::Element(Element::new("book")),
                        ],
                    )),
                    Node::Element(Element::new("book")),
                ],
            ))],
        }
    }

    #[test]
    fn test_elements_with_tag_name() {
        let document = sample_document();
        let books = document.elements_with_tag_name("book");
        assert_eq!(books.len(), 3);
        assert_eq!(books[0].text_value(), Some("first"));
    }

    #[test]
    fn test_elements_where() {
        let document = sample_document();
        let with_text = document.elements_where(|e| e.text_value().is_some());
        assert_eq!(with_text.len(), 1);

        let none = document.elements_where(|e| e.tag_name == "missing");
        assert!(none.is_empty());
    }

    #[test]
    fn test_find_first_returns_path_from_root() {
        let document = Node::Document(sample_document());
        let path = document
            .find_first(|element| element.text_value() == Some("first"))
            .unwrap();

        let names: Vec<&str> = path.iter().map(|node| node.name()).collect();
        assert_eq!(names, vec!["#document", "library", "shelf", "book"]);
    }

    #[test]
    fn test_find_first_takes_document_order() {
        let document = Node::Document(sample_document());
        let path = document.find_first(|element| element.tag_name == "book").unwrap();
        // The nested book under <shelf> comes before the direct child.
        let names: Vec<&str> = path.iter().map(|node| node.name()).collect();
        assert_eq!(names, vec!["#document", "library", "shelf", "book"]);
    }

    #[test]
    fn test_find_first_without_match() {
        let document = Node::Document(sample_document());
        assert!(document.find_first(|e| e.tag_name == "missing").is_none());
    }
}
