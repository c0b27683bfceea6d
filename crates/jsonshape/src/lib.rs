//! A shape-directed JSON decoder with required-field validation.
//!
//! The destination type drives decoding: every type implements [`Decode`]
//! and fills itself from the token stream of a [`Decoder`], which pulls
//! tokens from a streaming [`Lexer`] one at a time. Structs are declared
//! with [`aggregate!`], whose field annotations follow the grammar
//! `"<name>[,required][,omitifempty]"`.
//!
//! A field marked `required` that is absent from the document fails the
//! decode, and values such as [`RequiredString`] reject themselves when
//! present but `null` or empty. Errors carry the dotted path of the
//! offending field:
//!
//! ```rust
//! use jsonshape::{RequiredString, aggregate};
//!
//! aggregate! {
//!     #[derive(Debug, Default)]
//!     pub struct Customer {
//!         #[json = "email,required"]
//!         pub email: RequiredString,
//!     }
//! }
//!
//! aggregate! {
//!     #[derive(Debug, Default)]
//!     pub struct Order {
//!         #[json = "customer,required"]
//!         pub customer: Customer,
//!     }
//! }
//!
//! let err = jsonshape::from_str::<Order>(r#"{"customer": {"email": ""}}"#).unwrap_err();
//! assert!(err.is_required());
//! assert_eq!(err.path().to_string(), "customer.email");
//! ```

mod macros;

mod decoder;
mod error;
mod escape_buffer;
mod lexer;
mod literal_buffer;
mod options;
mod path;
mod read;
mod required;
mod shape;
mod tags;
mod token;
mod value;

#[cfg(test)]
mod tests;

use std::io;

pub use decoder::{Aggregate, Decode, Decoder, RawDecode};
pub use error::{BoxError, DecodeError, ErrorKind, ValueError};
pub use lexer::Lexer;
pub use options::{DecoderOptions, UnknownFields};
#[doc(hidden)]
pub use path::PathSegmentFrom;
pub use path::{FieldPath, Index, Key, PathSegment};
pub use read::{IoRead, Read, SliceRead};
pub use required::{
    Blank, Required, RequiredBool, RequiredBoolSlice, RequiredBytes, RequiredFloat,
    RequiredFloatSlice, RequiredInt, RequiredIntSlice, RequiredString, RequiredStringSlice,
};
pub use shape::{ScalarKind, Shape};
pub use tags::{Checkout, FieldDef, FieldTag, TagError, TagTable, resolve, to_snake_case};
pub use token::{FromToken, Token, TokenKind, opposite_of};
pub use value::{Array, Map, Value};

/// Decodes `input` into `dst` with default options.
///
/// The whole input must be a single JSON value, optionally surrounded by
/// whitespace.
///
/// # Errors
///
/// Returns the first [`DecodeError`] met.
pub fn decode<T: Decode>(input: &[u8], dst: &mut T) -> Result<(), DecodeError> {
    decode_with(input, dst, DecoderOptions::default())
}

/// Like [`decode`], with explicit options.
///
/// # Errors
///
/// Returns the first [`DecodeError`] met.
pub fn decode_with<T: Decode>(
    input: &[u8],
    dst: &mut T,
    options: DecoderOptions,
) -> Result<(), DecodeError> {
    let mut de = Decoder::from_slice(input).with_options(options);
    de.decode(dst)?;
    de.finish()
}

/// Decodes a fresh `T` from `input`.
///
/// # Errors
///
/// Returns the first [`DecodeError`] met.
pub fn from_slice<T: Decode + Default>(input: &[u8]) -> Result<T, DecodeError> {
    let mut value = T::default();
    decode(input, &mut value)?;
    Ok(value)
}

/// Decodes a fresh `T` from `input`.
///
/// # Errors
///
/// Returns the first [`DecodeError`] met.
pub fn from_str<T: Decode + Default>(input: &str) -> Result<T, DecodeError> {
    from_slice(input.as_bytes())
}

/// Decodes `dst` from a reader without buffering the whole document.
///
/// # Errors
///
/// Returns the first [`DecodeError`] met, including
/// [`ErrorKind::Io`] failures of `reader`.
pub fn decode_reader<T: Decode, R: io::Read>(reader: R, dst: &mut T) -> Result<(), DecodeError> {
    let mut de = Decoder::from_reader(reader);
    de.decode(dst)?;
    de.finish()
}

/// Decodes a fresh `T` from a reader.
///
/// # Errors
///
/// Returns the first [`DecodeError`] met.
pub fn from_reader<T: Decode + Default, R: io::Read>(reader: R) -> Result<T, DecodeError> {
    let mut value = T::default();
    decode_reader(reader, &mut value)?;
    Ok(value)
}
