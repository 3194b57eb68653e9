use std::ops::Range as Span;

use serde::{Deserialize, Serialize};

use super::{NodeId, RangeTree};
use crate::error::TreeError;
use crate::range::{Range, compare_ranges};

/// What to do with a range that no node at or below the insertion point covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfDomain {
    /// Drop the range and log a warning.
    #[default]
    Ignore,
    /// Fail the insertion with [`TreeError::OutOfDomain`].
    Reject,
}

/// Where an existing sibling sits relative to a range being inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// Sibling ends at or before the range starts.
    Before,
    /// Sibling starts at or after the range ends.
    After,
    /// Sibling lies within the range.
    Inside,
    /// Sibling covers the range.
    Contains,
    /// Sibling's tail overlaps the range's head.
    TailOverlap,
    /// Sibling's head overlaps the range's tail.
    HeadOverlap,
}

fn relate(sibling: &Span<usize>, range: &Span<usize>) -> Result<Relation, TreeError> {
    let relation = if sibling.end <= range.start {
        Relation::Before
    } else if sibling.start >= range.end {
        Relation::After
    } else if sibling.start >= range.start && sibling.end <= range.end {
        Relation::Inside
    } else if sibling.start <= range.start && sibling.end >= range.end {
        Relation::Contains
    } else if sibling.start <= range.start {
        Relation::TailOverlap
    } else if sibling.end >= range.end {
        Relation::HeadOverlap
    } else {
        return Err(TreeError::UnknownRelationship {
            sibling: sibling.clone(),
            range: range.clone(),
        });
    };
    Ok(relation)
}

type Pending<T> = Vec<(NodeId, Range<T>)>;

impl<T: Clone> RangeTree<T> {
    /// Inserts `range` below the root.
    pub fn insert(&mut self, range: Range<T>) -> Result<(), TreeError> {
        self.add_range(self.root(), range)
    }

    /// Inserts every range below the root, see [`RangeTree::add_ranges`].
    pub fn insert_all(&mut self, ranges: Vec<Range<T>>, sorted: bool) -> Result<(), TreeError> {
        self.add_ranges(self.root(), ranges, sorted)
    }

    /// Inserts `ranges` one at a time below `node`.
    ///
    /// Unless `sorted` is set the ranges are first ordered with
    /// [`compare_ranges`]. Order matters: earlier ranges shape the tree that
    /// later ones are split against, so passing unsorted input with
    /// `sorted = true` yields a different (still well-formed) nesting.
    ///
    /// Stops at the first failing range. Ranges inserted before it stay in the
    /// tree, so under [`OutOfDomain::Reject`] an error can leave the batch
    /// partially applied.
    pub fn add_ranges(
        &mut self,
        node: NodeId,
        mut ranges: Vec<Range<T>>,
        sorted: bool,
    ) -> Result<(), TreeError> {
        if !sorted {
            ranges.sort_by(compare_ranges);
        }
        for range in ranges {
            self.add_range(node, range)?;
        }
        Ok(())
    }

    /// Inserts `range` at or below `node`, splitting it against any sibling
    /// it partially overlaps.
    ///
    /// The range goes under the deepest node covering it. Parts that overlap
    /// an existing sibling are nested inside that sibling with the new range's
    /// tag; the remaining parts stay at the parent's level. When nothing at or
    /// below `node` covers the range the tree's [`OutOfDomain`] policy applies.
    pub fn add_range(&mut self, node: NodeId, range: Range<T>) -> Result<(), TreeError> {
        if !self.contains(node) {
            return Err(TreeError::UnknownNode(node));
        }

        let mut pending = vec![(node, range)];
        while let Some((from, range)) = pending.pop() {
            let span = range.span();
            let Some(parent) = self.find_parent_node(from, &span) else {
                match self.out_of_domain {
                    OutOfDomain::Ignore => {
                        log::warn!("Dropping range {span:?}: not covered by node {from:?}");
                        continue;
                    }
                    OutOfDomain::Reject => {
                        return Err(TreeError::OutOfDomain {
                            node: from,
                            range: span,
                        });
                    }
                }
            };
            self.place(parent, range, &mut pending)?;
        }
        Ok(())
    }

    /// Resolves `range` against the children of `parent`, acting on the first
    /// sibling that does not end before it. Split parts are pushed onto
    /// `pending`; it is popped from the back, so parts go in reverse order.
    fn place(
        &mut self,
        parent: NodeId,
        range: Range<T>,
        pending: &mut Pending<T>,
    ) -> Result<(), TreeError> {
        let span = range.span();
        for position in 0..self.nodes[parent.index].children.len() {
            let sibling = self.nodes[parent.index].children[position];
            let Some(existing) = self.nodes[sibling.index].value.as_ref() else {
                continue;
            };
            let existing = existing.span();

            match relate(&existing, &span)? {
                Relation::Before => continue,
                Relation::After => {
                    let id = self.push_node(Some(range));
                    self.nodes[parent.index].children.insert(position, id);
                }
                Relation::Inside => {
                    log::debug!("Splitting {span:?} around {existing:?}");
                    if existing.end < span.end {
                        pending.push((parent, range.with_span(existing.end..span.end)));
                    }
                    pending.push((sibling, range.with_span(existing.clone())));
                    if span.start < existing.start {
                        pending.push((parent, range.with_span(span.start..existing.start)));
                    }
                }
                Relation::Contains => {
                    let adopted = std::mem::take(&mut self.nodes[sibling.index].children);
                    let id = self.push_node(Some(range));
                    self.nodes[id.index].children = adopted;
                    self.nodes[sibling.index].children.push(id);
                }
                Relation::TailOverlap => {
                    log::debug!("Splitting {span:?} at end of {existing:?}");
                    if existing.end < span.end {
                        pending.push((parent, range.with_span(existing.end..span.end)));
                    }
                    if span.start < existing.end {
                        pending.push((sibling, range.with_span(span.start..existing.end)));
                    }
                }
                Relation::HeadOverlap => {
                    log::debug!("Splitting {span:?} at start of {existing:?}");
                    if existing.start < span.end {
                        pending.push((sibling, range.with_span(existing.start..span.end)));
                    }
                    if span.start < existing.start {
                        pending.push((parent, range.with_span(span.start..existing.start)));
                    }
                }
            }
            return Ok(());
        }

        let id = self.push_node(Some(range));
        self.nodes[parent.index].children.push(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn range(start: usize, end: usize, tag: &'static str) -> Range<&'static str> {
        Range::new(start, end, tag).unwrap()
    }

    fn spans(tree: &RangeTree<&'static str>, id: NodeId) -> Vec<(Span<usize>, &'static str)> {
        tree.children(id)
            .iter()
            .map(|&child| {
                let value = tree.value(child).unwrap();
                (value.span(), *value.tag())
            })
            .collect()
    }

    #[rstest]
    #[case(0..5, 5..9, Relation::Before)]
    #[case(9..12, 5..9, Relation::After)]
    #[case(6..8, 5..9, Relation::Inside)]
    #[case(5..9, 5..9, Relation::Inside)]
    #[case(4..10, 5..9, Relation::Contains)]
    #[case(4..9, 5..9, Relation::Contains)]
    #[case(2..7, 5..9, Relation::TailOverlap)]
    #[case(7..12, 5..9, Relation::HeadOverlap)]
    #[case(5..5, 5..9, Relation::Before)]
    #[case(6..6, 5..9, Relation::Inside)]
    #[case(3..3, 3..3, Relation::Before)]
    fn relation_between_sibling_and_range(
        #[case] sibling: Span<usize>,
        #[case] range: Span<usize>,
        #[case] expected: Relation,
    ) {
        assert_eq!(relate(&sibling, &range), Ok(expected));
    }

    #[test]
    fn later_range_is_inserted_before_existing_sibling() {
        let mut tree = RangeTree::new();
        tree.insert(range(10, 15, "b")).unwrap();
        tree.insert(range(0, 5, "a")).unwrap();
        assert_eq!(spans(&tree, tree.root()), vec![(0..5, "a"), (10..15, "b")]);
    }

    #[test]
    fn range_is_split_around_nested_sibling() {
        let mut tree = RangeTree::new();
        tree.insert(range(4, 6, "a")).unwrap();
        tree.insert(range(0, 10, "b")).unwrap();

        assert_eq!(
            spans(&tree, tree.root()),
            vec![(0..4, "b"), (4..6, "a"), (6..10, "b")]
        );
        let a = tree.children(tree.root())[1];
        assert_eq!(spans(&tree, a), vec![(4..6, "b")]);
    }

    #[test]
    fn covering_sibling_adopts_new_range_over_its_children() {
        let mut tree = RangeTree::new();
        tree.insert(range(0, 10, "a")).unwrap();
        let a = tree.children(tree.root())[0];
        tree.insert(range(2, 4, "b")).unwrap();

        let mut pending = Vec::new();
        tree.place(tree.root(), range(1, 8, "n"), &mut pending).unwrap();

        assert!(pending.is_empty());
        assert_eq!(spans(&tree, a), vec![(1..8, "n")]);
        let n = tree.children(a)[0];
        assert_eq!(spans(&tree, n), vec![(2..4, "b")]);
    }

    #[test]
    fn equal_span_nests_inside_existing() {
        let mut tree = RangeTree::new();
        tree.insert(range(3, 7, "a")).unwrap();
        tree.insert(range(3, 7, "b")).unwrap();

        assert_eq!(spans(&tree, tree.root()), vec![(3..7, "a")]);
        let a = tree.children(tree.root())[0];
        assert_eq!(spans(&tree, a), vec![(3..7, "b")]);
    }

    #[test]
    fn empty_range_at_end_nests_in_touching_range() {
        let mut tree = RangeTree::new();
        tree.insert(range(0, 4, "a")).unwrap();
        tree.insert(range(4, 4, "caret")).unwrap();

        assert_eq!(spans(&tree, tree.root()), vec![(0..4, "a")]);
        let a = tree.children(tree.root())[0];
        assert_eq!(spans(&tree, a), vec![(4..4, "caret")]);
    }

    #[test]
    fn head_overlap_nests_tail_in_sibling() {
        let mut tree = RangeTree::new();
        tree.insert(range(5, 15, "a")).unwrap();
        tree.insert(range(0, 10, "b")).unwrap();

        assert_eq!(spans(&tree, tree.root()), vec![(0..5, "b"), (5..15, "a")]);
        let a = tree.children(tree.root())[1];
        assert_eq!(spans(&tree, a), vec![(5..10, "b")]);
    }

    #[test]
    fn range_crossing_several_siblings() {
        let mut tree = RangeTree::new();
        tree.insert(range(2, 4, "a")).unwrap();
        tree.insert(range(6, 8, "b")).unwrap();
        tree.insert(range(3, 7, "c")).unwrap();

        assert_eq!(
            spans(&tree, tree.root()),
            vec![(2..4, "a"), (4..6, "c"), (6..8, "b")]
        );
        let a = tree.children(tree.root())[0];
        let b = tree.children(tree.root())[2];
        assert_eq!(spans(&tree, a), vec![(3..4, "c")]);
        assert_eq!(spans(&tree, b), vec![(6..7, "c")]);
    }

    #[test]
    fn out_of_domain_range_is_ignored_by_default() {
        let mut tree = RangeTree::new();
        tree.insert(range(0, 10, "a")).unwrap();
        let a = tree.children(tree.root())[0];

        assert_eq!(tree.add_range(a, range(8, 12, "b")), Ok(()));
        assert!(tree.children(a).is_empty());
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn out_of_domain_range_is_rejected_when_configured() {
        let mut tree = RangeTree::with_policy(OutOfDomain::Reject);
        tree.insert(range(0, 10, "a")).unwrap();
        let a = tree.children(tree.root())[0];

        assert_eq!(
            tree.add_range(a, range(8, 12, "b")),
            Err(TreeError::OutOfDomain {
                node: a,
                range: 8..12
            })
        );
    }

    #[test]
    fn unknown_node_is_rejected() {
        let mut small = RangeTree::new();
        small.insert(range(0, 1, "a")).unwrap();
        let mut big = RangeTree::new();
        big.insert(range(0, 1, "a")).unwrap();
        big.insert(range(2, 3, "b")).unwrap();
        let foreign = big.children(big.root())[0];

        assert_eq!(
            small.add_range(foreign, range(0, 1, "x")),
            Err(TreeError::UnknownNode(foreign))
        );
    }

    #[test]
    fn stale_handle_after_clear_is_rejected() {
        let mut tree = RangeTree::new();
        tree.insert(range(0, 10, "a")).unwrap();
        tree.insert(range(50, 60, "b")).unwrap();
        let stale = tree.children(tree.root())[1];

        tree.clear();
        tree.insert(range(0, 10, "c")).unwrap();
        tree.insert(range(20, 30, "d")).unwrap();

        assert_eq!(
            tree.add_range(stale, range(52, 55, "x")),
            Err(TreeError::UnknownNode(stale))
        );
        assert_eq!(
            spans(&tree, tree.root()),
            vec![(0..10, "c"), (20..30, "d")]
        );
    }

    #[test]
    fn rejected_batch_keeps_ranges_inserted_before_the_failure() {
        let mut tree = RangeTree::with_policy(OutOfDomain::Reject);
        tree.insert(range(0, 10, "a")).unwrap();
        let a = tree.children(tree.root())[0];

        let result = tree.add_ranges(
            a,
            vec![range(8, 12, "late"), range(2, 4, "b"), range(5, 6, "c")],
            false,
        );

        assert_eq!(
            result,
            Err(TreeError::OutOfDomain {
                node: a,
                range: 8..12
            })
        );
        assert_eq!(spans(&tree, a), vec![(2..4, "b"), (5..6, "c")]);
    }

    #[test]
    fn add_ranges_sorts_unless_told_otherwise() {
        let mut sorted = RangeTree::new();
        sorted
            .insert_all(vec![range(2, 5, "inner"), range(0, 10, "outer")], false)
            .unwrap();
        assert_eq!(spans(&sorted, sorted.root()), vec![(0..10, "outer")]);

        let mut as_given = RangeTree::new();
        as_given
            .insert_all(vec![range(2, 5, "inner"), range(0, 10, "outer")], true)
            .unwrap();
        assert_eq!(
            spans(&as_given, as_given.root()),
            vec![(0..2, "outer"), (2..5, "inner"), (5..10, "outer")]
        );
    }

    #[test]
    fn out_of_domain_policy_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: OutOfDomain,
        }
        let wrapper: Wrapper = toml::from_str("policy = \"reject\"").unwrap();
        assert_eq!(wrapper.policy, OutOfDomain::Reject);
    }
}
