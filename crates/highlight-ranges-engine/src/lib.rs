//! # highlight-ranges-engine
//!
//! Reduces possibly-overlapping ranges over a text buffer to a hierarchy of
//! non-overlapping, nested segments that a renderer can paint as nested
//! highlight spans.
//!
//! ```
//! use highlight_ranges_engine::{Range, RangeTree};
//!
//! let mut tree = RangeTree::new();
//! tree.insert(Range::new(0, 10, "a").unwrap()).unwrap();
//! tree.insert(Range::new(5, 15, "b").unwrap()).unwrap();
//!
//! // `b` is split: its head nests inside `a`, its tail follows `a`.
//! let spans: Vec<_> = tree
//!     .flatten()
//!     .into_iter()
//!     .map(|flat| (flat.range.span(), *flat.range.tag(), flat.node_index))
//!     .collect();
//! assert_eq!(spans, vec![(0..10, "a", 0), (5..10, "b", 0), (10..15, "b", 1)]);
//! ```

pub mod error;
pub mod range;
pub mod tree;

pub use error::{RangeError, TreeError};
pub use range::{Extent, Range, RangeDescriptor, Tag, compare_ranges, create_range};
pub use tree::{FlatRange, NodeId, OutOfDomain, RangeTree, invariants};
