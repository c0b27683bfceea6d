use std::{error::Error as StdError, fmt, io};

use bstr::BString;
use thiserror::Error;

use crate::{
    path::{FieldPath, PathSegment},
    shape::Shape,
    tags::TagError,
    token::TokenKind,
};

/// Error type returned by custom decoders.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// An error raised while decoding a document.
///
/// Carries the [`ErrorKind`], the [`FieldPath`] of the value being decoded
/// when the error occurred, and the byte offset at which it was detected.
#[derive(Debug)]
pub struct DecodeError {
    kind: ErrorKind,
    path: FieldPath,
    offset: usize,
}

impl DecodeError {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Self {
            kind,
            path: FieldPath::new(),
            offset,
        }
    }

    /// What went wrong.
    #[must_use]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Discards the path and offset.
    #[must_use]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Where in the destination it went wrong; empty at the top level.
    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Byte offset into the input at which the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Prefixes the error's path with `segment`.
    #[must_use]
    pub fn within(mut self, segment: impl Into<PathSegment>) -> Self {
        self.path.prepend(segment.into());
        self
    }

    /// Returns `true` for errors produced by the required-field protocol: a
    /// missing required field or a value that failed its own validity check.
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RequiredFieldMissing | ErrorKind::ValueInvalid(_)
        )
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{} at byte {}", self.kind, self.offset)
        } else {
            write!(f, "{} at `{}` (byte {})", self.kind, self.path, self.offset)
        }
    }
}

impl StdError for DecodeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.kind.source()
    }
}

/// The failure categories of a decode.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed JSON syntax.
    #[error("invalid json: {0}")]
    InvalidJson(&'static str),
    /// A closing brace that does not match the innermost open one.
    #[error("unmatched brace: found `{found}`, {}", describe_expected(.expected))]
    UnmatchedBrace {
        /// The closer that was read.
        found: char,
        /// The closer the innermost open brace needs; `None` when no brace is
        /// open.
        expected: Option<char>,
    },
    /// The input ended inside an object or array.
    #[error("missing closing brace: expected `{expected}`")]
    MissingClosingBrace {
        /// The closer of the innermost open brace.
        expected: char,
    },
    /// A scalar token that does not convert to the destination type.
    #[error("invalid value `{token}`: {reason}")]
    InvalidValue {
        /// The offending token text.
        token: BString,
        /// Why the conversion failed.
        reason: &'static str,
    },
    /// The document holds a kind of value the destination cannot take.
    #[error("cannot decode {found} into {expected}")]
    UnsupportedShape {
        /// The token that starts the value.
        found: TokenKind,
        /// The destination's shape.
        expected: Shape,
    },
    /// An aggregate whose annotations do not resolve.
    #[error(transparent)]
    Tag(#[from] TagError),
    /// A field marked `required` was absent.
    #[error("required field missing")]
    RequiredFieldMissing,
    /// A decoded value rejected itself.
    #[error("value failed validation: {0}")]
    ValueInvalid(#[source] ValueError),
    /// A [`RawDecode`](crate::RawDecode) implementation failed.
    #[error("custom decoder failed: {0}")]
    CustomDecode(#[source] BoxError),
    /// A field with no matching name, under
    /// [`UnknownFields::Deny`](crate::UnknownFields::Deny).
    #[error("unknown field")]
    UnknownField,
    /// Nesting went deeper than [`DecoderOptions::max_depth`](crate::DecoderOptions::max_depth).
    #[error("nesting exceeds the maximum depth of {0}")]
    DepthLimitExceeded(usize),
    /// The underlying reader failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

fn describe_expected(expected: &Option<char>) -> String {
    match expected {
        Some(c) => format!("expected `{c}`"),
        None => "no brace is open".to_owned(),
    }
}

/// Failure reported by a value's own validity check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValueError {
    /// The value is blank; the payload names what was expected.
    #[error("{0} not allowed to be empty")]
    Empty(&'static str),
    /// Any other rejection, with a message.
    #[error("{0}")]
    Invalid(String),
}
