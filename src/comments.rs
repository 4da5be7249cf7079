//! Walks the parse tree and maps normalized key paths to the comments
//! written above the corresponding entries.
//!
//! The parse tree attaches a comment written above the first entry of a
//! nested collection to the collection node itself, so the walk threads
//! that "first comment" down one level to reach the entry it was written
//! for. An inherited first comment wins over the key's own attached
//! comment; entries past the first never inherit.

use std::collections::HashMap;

use crate::key::normalize_key;
use crate::yaml::Node;

/// Builds the comment map for a parsed document. With no parse tree there
/// is nothing to do and the map is empty.
pub(crate) fn extract(root: Option<&Node>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    if let Some(node) = root {
        visit(&mut map, None, node, node.comment_before());
    }
    map
}

fn visit(
    map: &mut HashMap<String, String>,
    path: Option<&str>,
    node: &Node,
    first_comment: Option<&str>,
) {
    match node {
        Node::Mapping(mapping) => {
            for (i, pair) in mapping.pairs.iter().enumerate() {
                let inherited = if i == 0 { first_comment } else { None };
                let pair_path = normalize_key(path, &pair.key.text);
                if let Some(comment) = inherited.or(pair.key.comment_before.as_deref()) {
                    map.insert(pair_path.clone(), comment.to_string());
                }
                visit(map, Some(&pair_path), &pair.value, pair.value.comment_before());
            }
        }
        Node::Sequence(sequence) => {
            for (i, item) in sequence.items.iter().enumerate() {
                let inherited = if i == 0 { first_comment } else { None };
                let item_path = normalize_key(path, &i.to_string());
                visit(map, Some(&item_path), item, inherited);
            }
        }
        Node::Scalar(scalar) => {
            if let Some(comment) = first_comment.or(scalar.comment_before.as_deref())
                && let Some(path) = path
            {
                map.insert(path.to_string(), comment.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::parse_tree;

    fn comments_of(text: &str) -> HashMap<String, String> {
        let tree = parse_tree(text).unwrap();
        extract(Some(&tree))
    }

    #[test]
    fn test_extract_without_tree() {
        assert!(extract(None).is_empty());
    }

    #[test]
    fn test_comment_threading_through_nested_maps() {
        let map = comments_of(concat!(
            "#first_a comment\n",
            "first_a:\n",
            "  #second_a comment\n",
            "  second_a: \"second a\"\n",
            "  #second_b comment\n",
            "  second_b: \"second b\"\n",
            "first_b:\n",
            "  second_c:\n",
            "    third_a: \"third a\"\n",
            "    #third_b comment\n",
            "    third_b: \"third b\"\n",
        ));
        assert_eq!(map.get("first_a").map(String::as_str), Some("first_a comment"));
        assert_eq!(
            map.get("first_a.second_a").map(String::as_str),
            Some("second_a comment")
        );
        assert_eq!(
            map.get("first_a.second_b").map(String::as_str),
            Some("second_b comment")
        );
        assert_eq!(map.get("first_b.second_c.third_a"), None);
        assert_eq!(
            map.get("first_b.second_c.third_b").map(String::as_str),
            Some("third_b comment")
        );
    }

    #[test]
    fn test_document_comment_reaches_only_first_entry() {
        let map = comments_of("#doc comment\nfirst: x\nsecond: y\n");
        assert_eq!(map.get("first").map(String::as_str), Some("doc comment"));
        assert_eq!(map.get("second"), None);
    }

    #[test]
    fn test_sequence_comments_by_index() {
        let map = comments_of(concat!(
            "#first level comment\n",
            "Jobs:\n",
            "  - one and\n",
            "  #second level comment\n",
            "  - two and\n",
            "  - three\n",
        ));
        assert_eq!(map.get("Jobs").map(String::as_str), Some("first level comment"));
        assert_eq!(map.get("Jobs.0"), None);
        assert_eq!(
            map.get("Jobs.1").map(String::as_str),
            Some("second level comment")
        );
        assert_eq!(map.get("Jobs.2"), None);
    }

    #[test]
    fn test_multiline_comment_merges() {
        let map = comments_of("first: x\n# this is multiline\n# comment\nsecond: y\n");
        assert_eq!(
            map.get("second").map(String::as_str),
            Some(" this is multiline\n comment")
        );
        assert_eq!(map.get("first"), None);
    }

    #[test]
    fn test_keys_with_dots_are_escaped_in_paths() {
        let map = comments_of("#note\n'x.en-US.html.haml':\n  r1: Jobs\n");
        assert_eq!(
            map.get("x\\.en-US\\.html\\.haml").map(String::as_str),
            Some("note")
        );
    }
}
