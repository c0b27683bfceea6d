//! Field paths attached to decode errors.
//!
//! A [`FieldPath`] is built back to front: the innermost decoder creates an
//! error with an empty path and every aggregate, sequence or map it unwinds
//! through prepends its own segment. The rendered form is a dotted path with
//! bracketed indices, e.g. `order.items[2].sku`.
use std::{collections::VecDeque, fmt, sync::Arc};

/// Key segment payload.
pub type Key = Arc<str>;
/// Index segment payload.
pub type Index = usize;

/// A single step in a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An aggregate field or a map key.
    Key(Key),
    /// A sequence element.
    Index(Index),
}

impl PathSegment {
    #[must_use]
    /// Returns the key if this segment is a key, otherwise `None`.
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(k) = self {
            Some(k)
        } else {
            None
        }
    }

    #[must_use]
    /// Returns the index if this segment is an index, otherwise `None`.
    pub fn as_index(&self) -> Option<Index> {
        if let Self::Index(i) = self {
            Some(*i)
        } else {
            None
        }
    }
}

impl From<&str> for PathSegment {
    fn from(s: &str) -> Self {
        Self::Key(s.into())
    }
}

impl From<String> for PathSegment {
    fn from(s: String) -> Self {
        Self::Key(s.into())
    }
}

impl From<Key> for PathSegment {
    fn from(k: Key) -> Self {
        Self::Key(k)
    }
}

impl From<Index> for PathSegment {
    fn from(i: Index) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathSegmentFrom<T> {
    fn from_path_segment(value: T) -> PathSegment;
}

macro_rules! impl_integer_as_path_segment {
    ($($t:ty),+) => {
        $(
            impl PathSegmentFrom<$t> for PathSegment {
                fn from_path_segment(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathSegment::Index(value as Index)
                }
            }
        )+
    };
}
impl_integer_as_path_segment!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathSegmentFrom<&str> for PathSegment {
    fn from_path_segment(value: &str) -> Self {
        PathSegment::Key(value.into())
    }
}

/// Location of a value inside the decoded document, outermost segment first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(VecDeque<PathSegment>);

impl FieldPath {
    /// An empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this is the top level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Adds `segment` in front of the existing segments.
    pub fn prepend(&mut self, segment: PathSegment) {
        self.0.push_front(segment);
    }

    /// Adds `segment` after the existing segments.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push_back(segment);
    }

    /// Segments from the outermost inwards.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.0.iter()
    }

    /// The innermost segment.
    #[must_use]
    pub fn last(&self) -> Option<&PathSegment> {
        self.0.back()
    }
}

impl FromIterator<PathSegment> for FieldPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
