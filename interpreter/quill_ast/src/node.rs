//! Generic parse-tree node.

use std::fmt;

/// Tag of the synthetic root node produced for a whole translation unit.
pub const ROOT_TAG: &str = ">";

/// A node of the generic parse tree.
///
/// Tags are free-form strings; consumers match on them with
/// [`ParseNode::tag_contains`]. Leaf nodes (numbers, strings, symbols)
/// carry their literal source text in `contents`; interior nodes
/// (s-expressions, q-expressions, the root) carry their bracket/child
/// tokens as children, including the literal `(`/`)`/`{`/`}` tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseNode {
    /// Tag string, e.g. `"expr|integer"` or `">"`.
    pub tag: String,
    /// Literal source text for leaf nodes, empty for interior nodes.
    pub contents: String,
    /// Ordered children.
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    /// Create a leaf node.
    pub fn leaf(tag: impl Into<String>, contents: impl Into<String>) -> Self {
        ParseNode {
            tag: tag.into(),
            contents: contents.into(),
            children: Vec::new(),
        }
    }

    /// Create an interior node with children.
    pub fn branch(tag: impl Into<String>, children: Vec<ParseNode>) -> Self {
        ParseNode {
            tag: tag.into(),
            contents: String::new(),
            children,
        }
    }

    /// Whether this node's tag contains `needle` as a substring.
    #[inline]
    pub fn tag_contains(&self, needle: &str) -> bool {
        self.tag.contains(needle)
    }

    /// Whether this node is the synthetic root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.tag == ROOT_TAG
    }
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(node: &ParseNode, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            for _ in 0..depth {
                write!(f, "  ")?;
            }
            if node.children.is_empty() {
                writeln!(f, "{} '{}'", node.tag, node.contents)?;
            } else {
                writeln!(f, "{}", node.tag)?;
                for child in &node.children {
                    write_node(child, depth + 1, f)?;
                }
            }
            Ok(())
        }
        write_node(self, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tag_substring_match() {
        let node = ParseNode::leaf("expr|integer", "42");
        assert!(node.tag_contains("integer"));
        assert!(!node.tag_contains("decimal"));
    }

    #[test]
    fn root_detection() {
        let root = ParseNode::branch(ROOT_TAG, vec![]);
        assert!(root.is_root());
        assert_eq!(root.contents, "");
    }
}
