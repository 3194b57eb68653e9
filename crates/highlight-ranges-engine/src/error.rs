use std::ops::Range as Span;

use crate::tree::NodeId;

/// Reasons a range descriptor cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Range end {end} precedes its start {start}")]
    Inverted { start: usize, end: usize },
    #[error("Range starting at {start} has neither an end nor a length")]
    MissingExtent { start: usize },
    #[error("Range end {end} disagrees with start {start} + length {length}")]
    Conflicting {
        start: usize,
        end: usize,
        length: usize,
    },
    #[error("Range starting at {start} with length {length} overflows")]
    Overflow { start: usize, length: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No node at or below the insertion point covers the range.
    #[error("Range {range:?} lies outside the span of node {node:?}")]
    OutOfDomain { node: NodeId, range: Span<usize> },

    /// The sibling ordering invariant is broken. Never produced by a tree
    /// that has only been mutated through `add_range`.
    #[error("Unknown relationship between sibling {sibling:?} and range {range:?}")]
    UnknownRelationship {
        sibling: Span<usize>,
        range: Span<usize>,
    },

    #[error("Node {0:?} does not belong to this tree")]
    UnknownNode(NodeId),
}
