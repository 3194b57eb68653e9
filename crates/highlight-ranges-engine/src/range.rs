use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range as Span;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RangeError;

/// Default tag type: string keys to string values, e.g. `class = "keyword"`.
pub type Tag = BTreeMap<String, String>;

/// How far a range reaches past its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extent {
    /// Exclusive end offset.
    End(usize),
    /// Number of offsets covered.
    Length(usize),
}

/// Unnormalized input accepted by [`create_range`].
///
/// Deserializes from `{start, end, tag?}`, `{start, length, tag?}` or the
/// canonical `{start, end, length, tag}` shape. When both `end` and `length`
/// are present they must agree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeDescriptor<T = Tag> {
    pub start: usize,
    pub extent: Extent,
    pub tag: Option<T>,
}

impl<T> RangeDescriptor<T> {
    pub fn spanning(start: usize, end: usize) -> Self {
        Self {
            start,
            extent: Extent::End(end),
            tag: None,
        }
    }

    pub fn sized(start: usize, length: usize) -> Self {
        Self {
            start,
            extent: Extent::Length(length),
            tag: None,
        }
    }

    pub fn tagged(mut self, tag: T) -> Self {
        self.tag = Some(tag);
        self
    }
}

impl<T> From<Range<T>> for RangeDescriptor<T> {
    fn from(range: Range<T>) -> Self {
        Self {
            start: range.start,
            extent: Extent::End(range.end),
            tag: Some(range.tag),
        }
    }
}

#[derive(Deserialize)]
struct RawRange<T> {
    start: usize,
    end: Option<usize>,
    length: Option<usize>,
    tag: Option<T>,
}

impl<T> TryFrom<RawRange<T>> for RangeDescriptor<T> {
    type Error = RangeError;

    fn try_from(raw: RawRange<T>) -> Result<Self, Self::Error> {
        let start = raw.start;
        let extent = match (raw.end, raw.length) {
            (Some(end), Some(length)) => {
                if start.checked_add(length) != Some(end) {
                    return Err(RangeError::Conflicting { start, end, length });
                }
                Extent::End(end)
            }
            (Some(end), None) => Extent::End(end),
            (None, Some(length)) => Extent::Length(length),
            (None, None) => return Err(RangeError::MissingExtent { start }),
        };
        Ok(Self {
            start,
            extent,
            tag: raw.tag,
        })
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for RangeDescriptor<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRange::<T>::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// A canonical half-open interval `[start, end)` carrying an opaque tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Range<T = Tag> {
    start: usize,
    end: usize,
    tag: T,
}

impl<T> Range<T> {
    pub fn new(start: usize, end: usize, tag: T) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::Inverted { start, end });
        }
        Ok(Self { start, end, tag })
    }

    pub fn with_length(start: usize, length: usize, tag: T) -> Result<Self, RangeError> {
        let end = start
            .checked_add(length)
            .ok_or(RangeError::Overflow { start, length })?;
        Ok(Self { start, end, tag })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn span(&self) -> Span<usize> {
        self.start..self.end
    }

    pub fn tag(&self) -> &T {
        &self.tag
    }

    pub fn tag_mut(&mut self) -> &mut T {
        &mut self.tag
    }

    pub fn into_tag(self) -> T {
        self.tag
    }

    /// True when `span` lies entirely within this range. Touching edges count.
    pub fn covers(&self, span: &Span<usize>) -> bool {
        self.start <= span.start && self.end >= span.end
    }

    /// A copy of this range's tag over a different span.
    pub(crate) fn with_span(&self, span: Span<usize>) -> Self
    where
        T: Clone,
    {
        debug_assert!(span.start <= span.end);
        Self {
            start: span.start,
            end: span.end,
            tag: self.tag.clone(),
        }
    }
}

impl<T: Serialize> Serialize for Range<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Range", 4)?;
        state.serialize_field("start", &self.start)?;
        state.serialize_field("end", &self.end)?;
        state.serialize_field("length", &self.len())?;
        state.serialize_field("tag", &self.tag)?;
        state.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for Range<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let descriptor = RangeDescriptor::<T>::deserialize(deserializer)?;
        create_range(descriptor).map_err(serde::de::Error::custom)
    }
}

/// Normalizes a descriptor into a canonical [`Range`], defaulting a missing tag.
pub fn create_range<T: Default>(descriptor: RangeDescriptor<T>) -> Result<Range<T>, RangeError> {
    let tag = descriptor.tag.unwrap_or_default();
    match descriptor.extent {
        Extent::End(end) => Range::new(descriptor.start, end, tag),
        Extent::Length(length) => Range::with_length(descriptor.start, length, tag),
    }
}

/// Ascending by start; on equal starts the longer range sorts first.
pub fn compare_ranges<T, U>(a: &Range<T>, b: &Range<U>) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.len().cmp(&a.len()))
}
