//! Arena-backed tree of nested, non-overlapping ranges.
//!
//! Every node except the root holds a [`Range`]. Children of a node are
//! sorted by start and never overlap one another; overlap between ranges is
//! represented by nesting instead. The root has no range and implicitly spans
//! the whole domain.

mod flatten;
mod insert;
pub mod invariants;
mod outline;

use std::fmt;
use std::ops::Range as Span;
use std::sync::atomic::{AtomicU64, Ordering};

pub use flatten::FlatRange;
pub use insert::OutOfDomain;

use crate::range::{Range, Tag};

static NEXT_STAMP: AtomicU64 = AtomicU64::new(0);

fn next_stamp() -> u64 {
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}

/// Handle to a node inside one particular [`RangeTree`].
///
/// A handle carries the stamp of the tree that issued it. Clones of a tree
/// share the stamp; clearing a tree takes a fresh one, so handles issued
/// before the clear are no longer [`contained`](RangeTree::contains).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    stamp: u64,
}

impl NodeId {
    /// Slot of the node in its tree's arena.
    pub fn index(self) -> usize {
        self.index
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    value: Option<Range<T>>,
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    fn new(value: Option<Range<T>>) -> Self {
        Self {
            value,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RangeTree<T = Tag> {
    nodes: Vec<Node<T>>,
    out_of_domain: OutOfDomain,
    stamp: u64,
}

impl<T> Default for RangeTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RangeTree<T> {
    /// An empty tree: a root container without a range.
    pub fn new() -> Self {
        Self::with_policy(OutOfDomain::default())
    }

    pub fn with_policy(out_of_domain: OutOfDomain) -> Self {
        Self::from_root(Node::new(None), out_of_domain)
    }

    fn from_root(root: Node<T>, out_of_domain: OutOfDomain) -> Self {
        Self {
            nodes: vec![root],
            out_of_domain,
            stamp: next_stamp(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            stamp: self.stamp,
        }
    }

    pub fn policy(&self) -> OutOfDomain {
        self.out_of_domain
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Resets the tree to a root without a range, ready for the next bulk
    /// rebuild. Handles issued before the reset go stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new(None));
        self.stamp = next_stamp();
    }

    /// True when `id` was issued by this tree since its last [`clear`](Self::clear).
    pub fn contains(&self, id: NodeId) -> bool {
        id.stamp == self.stamp && id.index < self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        assert!(self.contains(id), "node {id:?} does not belong to this range tree");
        &self.nodes[id.index]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        assert!(self.contains(id), "node {id:?} does not belong to this range tree");
        &mut self.nodes[id.index]
    }

    /// The range held by `id`, or `None` for a structural container.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn value(&self, id: NodeId) -> Option<&Range<T>> {
        self.node(id).value.as_ref()
    }

    /// Mutable access to a node's tag. Spans are not exposed mutably since
    /// changing them would break the ordering of siblings.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn tag_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).value.as_mut().map(Range::tag_mut)
    }

    /// Children of `id` in ascending start order.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Finds the deepest node at or below `from` whose span covers `span`.
    ///
    /// Descends into the first child covering the span at each level. Returns
    /// `None` when `from` has a range of its own that does not cover the span.
    ///
    /// # Panics
    /// Panics if `from` does not belong to this tree.
    pub fn find_parent_node(&self, from: NodeId, span: &Span<usize>) -> Option<NodeId> {
        let mut current = from;
        while let Some(&child) = self
            .node(current)
            .children
            .iter()
            .find(|&&child| self.covers(child, span))
        {
            current = child;
        }
        log::trace!("parent of {span:?} below {from:?} is {current:?}");

        match &self.nodes[current.index].value {
            Some(range) if !range.covers(span) => None,
            _ => Some(current),
        }
    }

    fn covers(&self, id: NodeId, span: &Span<usize>) -> bool {
        self.nodes[id.index]
            .value
            .as_ref()
            .is_some_and(|range| range.covers(span))
    }

    fn push_node(&mut self, value: Option<Range<T>>) -> NodeId {
        let id = NodeId {
            index: self.nodes.len(),
            stamp: self.stamp,
        };
        self.nodes.push(Node::new(value));
        id
    }
}

impl<T: Clone> RangeTree<T> {
    /// Deep copy of the subtree rooted at `id` as a standalone tree.
    ///
    /// The copy's root holds `id`'s range (if any). Nodes are renumbered and
    /// arena slots unreachable from `id` are not carried over.
    ///
    /// # Panics
    /// Panics if `id` does not belong to this tree.
    pub fn clone_subtree(&self, id: NodeId) -> RangeTree<T> {
        let mut copy = RangeTree::from_root(
            Node::new(self.node(id).value.clone()),
            self.out_of_domain,
        );
        let mut pending = vec![(id, copy.root())];
        while let Some((source, target)) = pending.pop() {
            for &child in &self.nodes[source.index].children {
                let cloned = copy.push_node(self.nodes[child.index].value.clone());
                copy.nodes[target.index].children.push(cloned);
                pending.push((child, cloned));
            }
        }
        copy
    }
}
