//! Path evaluation: resolving a list of node names against the tree.

use crate::dom::Node;

impl Node {
    /// Select nodes by evaluating a path of names relative to this node.
    ///
    /// Each segment filters one generation down: starting from this node,
    /// the candidate set is replaced by all *children* of the current
    /// candidates whose name matches the segment. The node itself is never
    /// part of the result, and matching never descends past one level per
    /// segment. Results come back in document order; a path that matches
    /// nothing yields an empty vector, never an error.
    ///
    /// For the document
    ///
    /// ```xml
    /// <a id="1">
    ///   <b id="2">
    ///     <c id="3"/>
    ///   </b>
    ///   <c id="4">
    ///     <d id="5"/>
    ///   </c>
    /// </a>
    /// ```
    ///
    /// evaluating `["a", "b", "c"]` against the document selects the `<c>`
    /// element with `id="3"` but not the one with `id="4"`.
    pub fn evaluate<'a>(&'a self, path: &[&'a str]) -> Vec<&'a Node> {
        let mut selected: Vec<&Node> = vec![self];
        for name in path {
            selected = selected
                .iter()
                .flat_map(|node| node.children_with_name(name))
                .collect();
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    #[test]
    fn test_breadth_per_segment() {
        let document = parse_str(
            "<a><b><c id=\"1\"/></b><b><c id=\"2\"/></b><c id=\"3\"/></a>",
        )
        .unwrap();
        let root = Node::Document(document);

        let matches = root.evaluate(&["a", "b", "c"]);
        assert_eq!(matches.len(), 2);
        let ids: Vec<Option<&str>> = matches
            .iter()
            .map(|node| node.as_element().and_then(|e| e.attribute("id")))
            .collect();
        // The <c> that is a direct child of <a> (id=3) is excluded.
        assert_eq!(ids, vec![Some("1"), Some("2")]);
    }

    #[test]
    fn test_segments_select_children_not_self() {
        let document = parse_str("<a><b id=\"2\"><c id=\"3\"/></b><c id=\"4\"><d/></c></a>").unwrap();
        let root = Node::Document(document);

        let matches = root.evaluate(&["a", "b", "c"]);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            matches[0].as_element().and_then(|e| e.attribute("id")),
            Some("3")
        );
    }

    #[test]
    fn test_empty_path_selects_self() {
        let document = parse_str("<a/>").unwrap();
        let root = Node::Document(document);
        let matches = root.evaluate(&[]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name(), "#document");
    }

    #[test]
    fn test_unmatched_path_is_empty_not_an_error() {
        let document = parse_str("<a><b/></a>").unwrap();
        let root = Node::Document(document);
        assert!(root.evaluate(&["a", "nope", "c"]).is_empty());
        assert!(root.evaluate(&["nope"]).is_empty());
    }

    #[test]
    fn test_non_element_names_participate() {
        let document = parse_str("<a><!--x--><b/></a>").unwrap();
        let root = Node::Document(document);
        let comments = root.evaluate(&["a", "#comment"]);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].value(), Some("x"));
    }
}
