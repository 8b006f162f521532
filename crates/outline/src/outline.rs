// ABOUTME: Heading model and the hierarchy builder that nests h2/h3/h4 headings into an outline tree.
// ABOUTME: Parents come from the flat heading order via last-seen slots, resolved in one forward pass.

//! Outline construction.
//!
//! A blog post's headings arrive as a flat, document-ordered list. The builder
//! turns that list into a tree where every heading hangs under the nearest
//! preceding heading of a shallower level:
//!
//! - `h2` is always top-level.
//! - `h3` goes under the most recent `h2`, or top-level if there is none.
//! - `h4` goes under the most recent `h3` if that `h3` came after the most
//!   recent `h2`; otherwise under the `h2`; top-level if neither exists.
//!
//! "Most recent" is always measured in the flat input order, never against the
//! shape of the tree built so far. Malformed nesting degrades to top-level
//! nodes instead of failing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Nesting marker of a heading element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {

    /// Maps an element name to a level. Anything other than h2/h3/h4 yields `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "h2" => Some(HeadingLevel::H2),
            "h3" => Some(HeadingLevel::H3),
            "h4" => Some(HeadingLevel::H4),
            _ => None,
        }
    }

    /// Lowercase element name.
    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
            HeadingLevel::H4 => "h4",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Anchor identifier given to the heading at `index` in document order.
pub fn anchor_id(index: usize) -> String {
    format!("heading-{}", index)
}

/// One heading of the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub level: HeadingLevel,
    /// Anchor id, shared with the heading's class so list entries can link to it.
    pub id: String,
    /// Inner markup of the heading, carried opaquely.
    pub label: String,
    /// Position in the flat heading sequence (0-based).
    pub source_index: usize,
}

impl HeadingRecord {
    /// Create a record whose id is derived from its position.
    pub fn new(level: HeadingLevel, source_index: usize, label: impl Into<String>) -> Self {
        Self {
            level,
            id: anchor_id(source_index),
            label: label.into(),
            source_index,
        }
    }
}

/// A heading together with the headings nested beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    pub heading: HeadingRecord,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// True when no deeper heading attached to this node.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Root container of the outline: the ordered top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineTree {
    pub roots: Vec<OutlineNode>,
}

impl OutlineTree {
    /// Build a tree from headings. See [`build_outline`].
    pub fn build<I>(headings: I) -> Self
    where
        I: IntoIterator<Item = HeadingRecord>,
    {
        build_outline(headings)
    }

    /// True when the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes at every depth.
    pub fn node_count(&self) -> usize {
        self.preorder().count()
    }

    /// Depth-first, parent-before-children traversal in document order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: self.roots.iter().rev().collect(),
        }
    }
}

/// Iterator returned by [`OutlineTree::preorder`].
pub struct Preorder<'a> {
    stack: Vec<&'a OutlineNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a OutlineNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Nest a flat heading sequence into an [`OutlineTree`].
///
/// Headings are processed in `source_index` order. The parent of each heading
/// is chosen from two slots holding the most recent `h2` and `h3` seen so far,
/// so the whole build is linear. Children are collected as positions first and
/// the owned tree is assembled afterwards, deepest positions first, which works
/// because a parent always precedes its children.
pub fn build_outline<I>(headings: I) -> OutlineTree
where
    I: IntoIterator<Item = HeadingRecord>,
{
    let mut headings: Vec<HeadingRecord> = headings.into_iter().collect();
    headings.sort_by_key(|h| h.source_index);

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); headings.len()];
    let mut roots: Vec<usize> = Vec::new();
    let mut last_h2: Option<usize> = None;
    let mut last_h3: Option<usize> = None;

    for (pos, heading) in headings.iter().enumerate() {
        let parent = match heading.level {
            HeadingLevel::H2 => None,
            HeadingLevel::H3 => last_h2,
            HeadingLevel::H4 => match (last_h3, last_h2) {
                (Some(h3), Some(h2)) if h3 > h2 => Some(h3),
                (Some(h3), None) => Some(h3),
                (_, h2) => h2,
            },
        };

        match parent {
            Some(p) => children[p].push(pos),
            None => roots.push(pos),
        }

        match heading.level {
            HeadingLevel::H2 => last_h2 = Some(pos),
            HeadingLevel::H3 => last_h3 = Some(pos),
            HeadingLevel::H4 => {}
        }
    }

    let total = headings.len();
    let mut built: Vec<Option<OutlineNode>> = (0..total).map(|_| None).collect();
    for (pos, heading) in headings.into_iter().enumerate().rev() {
        let nested = children[pos]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[pos] = Some(OutlineNode {
            heading,
            children: nested,
        });
    }

    let roots: Vec<OutlineNode> = roots
        .iter()
        .filter_map(|&root| built[root].take())
        .collect();

    tracing::debug!(headings = total, top_level = roots.len(), "built outline");

    OutlineTree { roots }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn h(level: HeadingLevel, index: usize) -> HeadingRecord {
        HeadingRecord::new(level, index, format!("Heading {}", index))
    }

    /// Compact `id[children]` rendering for shape assertions.
    fn shape(tree: &OutlineTree) -> String {
        fn node(n: &OutlineNode, out: &mut String) {
            out.push_str(&n.heading.source_index.to_string());
            if !n.children.is_empty() {
                out.push('[');
                for (i, c) in n.children.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    node(c, out);
                }
                out.push(']');
            }
        }
        let mut out = String::new();
        for (i, r) in tree.roots.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            node(r, &mut out);
        }
        out
    }

    use HeadingLevel::{H2, H3, H4};

    #[test]
    fn test_empty_input_gives_empty_tree() {
        let tree = build_outline(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn test_flat_h2s_stay_top_level() {
        let tree = build_outline(vec![h(H2, 0), h(H2, 1), h(H2, 2)]);
        assert_eq!(shape(&tree), "0 1 2");
        assert!(tree.roots.iter().all(OutlineNode::is_leaf));
    }

    #[test]
    fn test_h3s_nest_under_preceding_h2() {
        let tree = build_outline(vec![h(H2, 0), h(H3, 1), h(H3, 2), h(H2, 3)]);
        assert_eq!(shape(&tree), "0[1 2] 3");
    }

    #[test]
    fn test_orphan_h3_falls_back_to_root() {
        let tree = build_outline(vec![h(H3, 0), h(H2, 1), h(H3, 2)]);
        assert_eq!(shape(&tree), "0 1[2]");
    }

    #[test]
    fn test_h4_prefers_more_recent_h3() {
        let tree = build_outline(vec![h(H2, 0), h(H3, 1), h(H4, 2)]);
        assert_eq!(shape(&tree), "0[1[2]]");
    }

    #[test]
    fn test_h4_without_h3_goes_under_h2() {
        let tree = build_outline(vec![h(H2, 0), h(H4, 1)]);
        assert_eq!(shape(&tree), "0[1]");
    }

    #[test]
    fn test_h4_skips_stale_h3_from_previous_section() {
        // The h3 belongs to the first h2; the second h2 is more recent.
        let tree = build_outline(vec![h(H2, 0), h(H3, 1), h(H2, 2), h(H4, 3)]);
        assert_eq!(shape(&tree), "0[1] 2[3]");
    }

    #[test]
    fn test_h4_under_orphaned_h3() {
        let tree = build_outline(vec![h(H3, 0), h(H4, 1)]);
        assert_eq!(shape(&tree), "0[1]");
    }

    #[test]
    fn test_lone_h4_is_top_level() {
        let tree = build_outline(vec![h(H4, 0), h(H4, 1)]);
        assert_eq!(shape(&tree), "0 1");
    }

    #[test]
    fn test_input_is_ordered_by_source_index() {
        let tree = build_outline(vec![h(H3, 1), h(H2, 0)]);
        assert_eq!(shape(&tree), "0[1]");
    }

    #[test]
    fn test_preorder_follows_document_order() {
        let tree = build_outline(vec![
            h(H2, 0),
            h(H3, 1),
            h(H4, 2),
            h(H3, 3),
            h(H2, 4),
            h(H4, 5),
        ]);
        let order: Vec<usize> = tree.preorder().map(|n| n.heading.source_index).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_level_tags_round_trip() {
        for level in [H2, H3, H4] {
            assert_eq!(HeadingLevel::from_tag(level.tag()), Some(level));
        }
        assert_eq!(HeadingLevel::from_tag("H3"), Some(H3));
        assert_eq!(HeadingLevel::from_tag("h5"), None);
        assert!(H2 < H3 && H3 < H4);
    }

    #[test]
    fn test_record_ids_follow_index() {
        assert_eq!(h(H2, 7).id, "heading-7");
    }
}
