//! Token vocabulary produced by the [`Lexer`](crate::Lexer).
//!
//! Punctuation is classified by a 256-entry lookup table; numbers, strings
//! and literals are recognized by the lexer itself. [`FromToken`] converts a
//! scalar token into a typed Rust value.
use std::borrow::Cow;

use bstr::{BStr, BString, ByteSlice};
use core::fmt;

use crate::{error::ErrorKind, shape::ScalarKind};

/// Classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A number without fraction or exponent.
    Integer,
    /// A number with a fraction or exponent.
    Float,
    /// A quoted string.
    String,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `{`
    OpenObject,
    /// `}`
    CloseObject,
    /// `[`
    OpenArray,
    /// `]`
    CloseArray,
    /// A byte that starts no JSON token.
    Unknown,
}

impl TokenKind {
    /// `{` or `[`.
    #[must_use]
    pub fn is_opening(self) -> bool {
        matches!(self, TokenKind::OpenObject | TokenKind::OpenArray)
    }

    /// `}` or `]`.
    #[must_use]
    pub fn is_closing(self) -> bool {
        matches!(self, TokenKind::CloseObject | TokenKind::CloseArray)
    }

    /// Returns `true` for tokens that are complete values on their own.
    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::Integer
                | TokenKind::Float
                | TokenKind::String
                | TokenKind::Boolean
                | TokenKind::Null
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Integer => "an integer",
            TokenKind::Float => "a float",
            TokenKind::String => "a string",
            TokenKind::Boolean => "a boolean",
            TokenKind::Null => "null",
            TokenKind::Colon => "`:`",
            TokenKind::Comma => "`,`",
            TokenKind::OpenObject => "an object",
            TokenKind::CloseObject => "`}`",
            TokenKind::OpenArray => "an array",
            TokenKind::CloseArray => "`]`",
            TokenKind::Unknown => "an unknown byte",
        })
    }
}

const PUNCTUATION: [Option<(TokenKind, &[u8])>; 256] = {
    let mut table: [Option<(TokenKind, &[u8])>; 256] = [None; 256];
    table[b':' as usize] = Some((TokenKind::Colon, b":"));
    table[b',' as usize] = Some((TokenKind::Comma, b","));
    table[b'{' as usize] = Some((TokenKind::OpenObject, b"{"));
    table[b'}' as usize] = Some((TokenKind::CloseObject, b"}"));
    table[b'[' as usize] = Some((TokenKind::OpenArray, b"["));
    table[b']' as usize] = Some((TokenKind::CloseArray, b"]"));
    table
};

/// Looks up a single punctuation byte.
pub(crate) fn punctuation(byte: u8) -> Option<(TokenKind, &'static [u8])> {
    PUNCTUATION[byte as usize]
}

/// Returns the closing byte for an opening brace or bracket and vice versa.
#[must_use]
pub fn opposite_of(byte: u8) -> Option<u8> {
    match byte {
        b'{' => Some(b'}'),
        b'}' => Some(b'{'),
        b'[' => Some(b']'),
        b']' => Some(b'['),
        _ => None,
    }
}

/// A lexed token.
///
/// `value` borrows from the input whenever the source allows it. For strings
/// it holds the unescaped contents without the surrounding quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    value: Cow<'src, [u8]>,
    kind: TokenKind,
}

impl<'src> Token<'src> {
    pub(crate) fn new(kind: TokenKind, value: Cow<'src, [u8]>) -> Self {
        Self { value, kind }
    }

    /// What kind of token this is.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The raw token text, unescaped for strings.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.value
    }

    /// The token text for display.
    #[must_use]
    pub fn as_bstr(&self) -> &BStr {
        self.value.as_bstr()
    }

    /// The token text as UTF-8, or `None` if it is not valid UTF-8.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.value).ok()
    }

    /// Takes the token text.
    #[must_use]
    pub fn into_bytes(self) -> Cow<'src, [u8]> {
        self.value
    }

    pub(crate) fn invalid(&self, reason: &'static str) -> ErrorKind {
        ErrorKind::InvalidValue {
            token: BString::from(self.value.as_ref()),
            reason,
        }
    }
}

/// Conversion from a scalar token into a typed value.
pub trait FromToken: Sized {
    /// Scalar kind reported when the document holds a container instead.
    const KIND: ScalarKind;

    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidValue`] when the token kind does not fit
    /// `Self` or its text does not parse.
    fn from_token(token: &Token<'_>) -> Result<Self, ErrorKind>;
}

impl FromToken for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_token(token: &Token<'_>) -> Result<Self, ErrorKind> {
        if token.kind != TokenKind::String {
            return Err(token.invalid("expected a string"));
        }
        token
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| token.invalid("string is not valid utf-8"))
    }
}

impl FromToken for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn from_token(token: &Token<'_>) -> Result<Self, ErrorKind> {
        if token.kind != TokenKind::Boolean {
            return Err(token.invalid("expected a boolean"));
        }
        match token.value.first() {
            Some(b't') => Ok(true),
            Some(b'f') => Ok(false),
            _ => Err(token.invalid("expected a boolean")),
        }
    }
}

macro_rules! integer_from_token {
    ($($t:ty),*) => {
        $(
            impl FromToken for $t {
                const KIND: ScalarKind = ScalarKind::Integer;

                fn from_token(token: &Token<'_>) -> Result<Self, ErrorKind> {
                    if token.kind != TokenKind::Integer {
                        return Err(token.invalid("expected an integer"));
                    }
                    token
                        .as_str()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| token.invalid(concat!("not a valid ", stringify!($t))))
                }
            }
        )*
    };
}
integer_from_token!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_from_token {
    ($($t:ty),*) => {
        $(
            impl FromToken for $t {
                const KIND: ScalarKind = ScalarKind::Float;

                fn from_token(token: &Token<'_>) -> Result<Self, ErrorKind> {
                    if !matches!(token.kind, TokenKind::Integer | TokenKind::Float) {
                        return Err(token.invalid("expected a number"));
                    }
                    token
                        .as_str()
                        .and_then(|s| s.parse().ok())
                        .ok_or_else(|| token.invalid(concat!("not a valid ", stringify!($t))))
                }
            }
        )*
    };
}
float_from_token!(f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, text: &str) -> Token<'_> {
        Token::new(kind, Cow::Borrowed(text.as_bytes()))
    }

    #[test]
    fn punctuation_table_covers_only_structural_bytes() {
        let found: Vec<u8> = (0..=255u8).filter(|b| punctuation(*b).is_some()).collect();
        assert_eq!(found, b",:[]{}");
        assert_eq!(punctuation(b'{').map(|p| p.0), Some(TokenKind::OpenObject));
    }

    #[test]
    fn opposites_are_symmetric() {
        for b in *b"{}[]" {
            assert_eq!(opposite_of(b).and_then(opposite_of), Some(b));
        }
        assert_eq!(opposite_of(b'('), None);
    }

    #[test]
    fn integers_must_fit_their_width() {
        assert_eq!(u8::from_token(&token(TokenKind::Integer, "255")).unwrap(), 255);
        let err = u8::from_token(&token(TokenKind::Integer, "256")).unwrap_err();
        assert!(matches!(err, ErrorKind::InvalidValue { reason: "not a valid u8", .. }));
        assert!(i64::from_token(&token(TokenKind::Float, "1.5")).is_err());
    }

    #[test]
    fn floats_accept_integer_tokens() {
        assert!((f64::from_token(&token(TokenKind::Integer, "3")).unwrap() - 3.0).abs() < f64::EPSILON);
        assert!((f64::from_token(&token(TokenKind::Float, "-2.5e1")).unwrap() + 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn booleans_dispatch_on_first_byte() {
        assert!(bool::from_token(&token(TokenKind::Boolean, "true")).unwrap());
        assert!(!bool::from_token(&token(TokenKind::Boolean, "false")).unwrap());
        assert!(bool::from_token(&token(TokenKind::String, "true")).is_err());
    }

    #[test]
    fn strings_reject_other_kinds() {
        assert_eq!(String::from_token(&token(TokenKind::String, "lasse")).unwrap(), "lasse");
        let err = String::from_token(&token(TokenKind::Integer, "12")).unwrap_err();
        assert_eq!(err.to_string(), "invalid value `12`: expected a string");
    }
}
