use core::fmt;

/// The scalar kinds a [`Shape::Scalar`] destination can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Text.
    String,
    /// A whole number.
    Integer,
    /// A number with a fraction or exponent allowed.
    Float,
    /// `true` or `false`.
    Boolean,
}

/// Structural classification of a destination value.
///
/// Every [`Decode`](crate::Decode) implementation declares its shape as an
/// associated constant. The decoder uses it to name what it expected when the
/// document disagrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A single string, number or boolean.
    Scalar(ScalarKind),
    /// A nullable slot, absent when the document holds `null`.
    Optional,
    /// A heap indirection that decodes as its pointee.
    Indirect,
    /// An ordered list of one element type.
    Sequence,
    /// A string-keyed associative map.
    Map,
    /// A fixed set of named fields described by a tag table.
    Aggregate,
    /// Any value; the representation follows the tokens actually read.
    Dynamic,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScalarKind::String => "a string",
            ScalarKind::Integer => "an integer",
            ScalarKind::Float => "a float",
            ScalarKind::Boolean => "a boolean",
        })
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Scalar(kind) => kind.fmt(f),
            Shape::Optional => f.write_str("an optional value"),
            Shape::Indirect => f.write_str("a boxed value"),
            Shape::Sequence => f.write_str("a sequence"),
            Shape::Map => f.write_str("a map"),
            Shape::Aggregate => f.write_str("an aggregate"),
            Shape::Dynamic => f.write_str("a dynamic value"),
        }
    }
}
