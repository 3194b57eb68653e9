//! Structural checks for a [`RangeTree`].

use std::ops::Range as Span;

use super::{NodeId, RangeTree};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    #[error("Children of {parent:?} out of order or overlapping: {left:?} then {right:?}")]
    Overlap {
        parent: NodeId,
        left: Span<usize>,
        right: Span<usize>,
    },
    #[error("Child {inner:?} escapes the span {outer:?} of {parent:?}")]
    Escapes {
        parent: NodeId,
        outer: Span<usize>,
        inner: Span<usize>,
    },
    #[error("Node {0:?} below the root has no range")]
    MissingValue(NodeId),
}

/// Collects every violation of the sibling ordering and containment
/// invariants, walking the whole tree.
pub fn violations<T>(tree: &RangeTree<T>) -> Vec<Violation> {
    let mut found = Vec::new();
    let mut pending = vec![tree.root()];
    while let Some(parent) = pending.pop() {
        let outer = tree.value(parent).map(|range| range.span());
        let mut previous: Option<Span<usize>> = None;

        for &child in tree.children(parent) {
            pending.push(child);
            let Some(inner) = tree.value(child).map(|range| range.span()) else {
                found.push(Violation::MissingValue(child));
                continue;
            };

            if let Some(outer) = &outer
                && (inner.start < outer.start || inner.end > outer.end)
            {
                found.push(Violation::Escapes {
                    parent,
                    outer: outer.clone(),
                    inner: inner.clone(),
                });
            }
            if let Some(left) = previous.replace(inner.clone())
                && (left.end > inner.start || left.start > inner.start)
            {
                found.push(Violation::Overlap {
                    parent,
                    left,
                    right: inner,
                });
            }
        }
    }
    found
}

/// Asserts that the tree is well formed.
///
/// # Panics
/// Panics with a descriptive message listing every violation found.
pub fn check<T>(tree: &RangeTree<T>) {
    let found = violations(tree);
    assert!(
        found.is_empty(),
        "range tree invariants violated:\n{}",
        found
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;
    use pretty_assertions::assert_eq;

    #[test]
    fn built_tree_has_no_violations() {
        let mut tree = RangeTree::new();
        for (start, end) in [(0, 10), (5, 15), (2, 3), (8, 30), (0, 30)] {
            tree.insert(Range::new(start, end, ()).unwrap()).unwrap();
        }
        assert!(violations(&tree).is_empty());
    }

    #[test]
    fn detects_overlapping_siblings() {
        let mut tree = RangeTree::new();
        let a = tree.push_node(Some(Range::new(0, 6, ()).unwrap()));
        let b = tree.push_node(Some(Range::new(4, 8, ()).unwrap()));
        tree.nodes[0].children = vec![a, b];

        assert_eq!(
            violations(&tree),
            vec![Violation::Overlap {
                parent: tree.root(),
                left: 0..6,
                right: 4..8,
            }]
        );
    }

    #[test]
    fn detects_escaping_child_and_missing_value() {
        let mut tree = RangeTree::new();
        let a = tree.push_node(Some(Range::new(0, 6, ()).unwrap()));
        let b = tree.push_node(Some(Range::new(4, 8, ()).unwrap()));
        let hollow = tree.push_node(None);
        tree.nodes[0].children = vec![a];
        tree.nodes[a.index].children = vec![b, hollow];

        assert_eq!(
            violations(&tree),
            vec![
                Violation::Escapes {
                    parent: a,
                    outer: 0..6,
                    inner: 4..8,
                },
                Violation::MissingValue(hollow),
            ]
        );
    }

    #[test]
    #[should_panic(expected = "range tree invariants violated")]
    fn check_panics_on_violation() {
        let mut tree = RangeTree::<()>::new();
        let hollow = tree.push_node(None);
        tree.nodes[0].children = vec![hollow];
        check(&tree);
    }
}
