use serde::Serialize;

use super::{NodeId, RangeTree};
use crate::range::Range;

/// One entry of the draw list produced by [`RangeTree::collect_ranges`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatRange<T> {
    pub range: Range<T>,
    /// Position of the node among its parent's children.
    pub node_index: usize,
    /// Number of ranges enclosing this one.
    pub depth: usize,
}

impl<T: Clone> RangeTree<T> {
    /// Flattens the subtree at `node` into draw order.
    ///
    /// Pre-order: every range is followed by the ranges nested inside it, so
    /// outer spans always precede inner ones. `node` itself is reported with
    /// index 0; a node without a range (the root) contributes nothing and does
    /// not count towards depth.
    ///
    /// # Panics
    /// Panics if `node` does not belong to this tree.
    pub fn collect_ranges(&self, node: NodeId) -> Vec<FlatRange<T>> {
        let mut buffer = Vec::new();
        let mut pending = vec![(node, 0, 0)];
        while let Some((id, node_index, depth)) = pending.pop() {
            let entry = self.node(id);
            let child_depth = match &entry.value {
                Some(range) => {
                    buffer.push(FlatRange {
                        range: range.clone(),
                        node_index,
                        depth,
                    });
                    depth + 1
                }
                None => depth,
            };
            for (index, &child) in entry.children.iter().enumerate().rev() {
                pending.push((child, index, child_depth));
            }
        }
        buffer
    }

    /// [`collect_ranges`](Self::collect_ranges) from the root.
    pub fn flatten(&self) -> Vec<FlatRange<T>> {
        self.collect_ranges(self.root())
    }
}
