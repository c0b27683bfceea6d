//! Shape-directed recursive decoder.
//!
//! A [`Decoder`] wraps a [`Lexer`] and pulls tokens on demand. Destination
//! types drive the walk through their [`Decode`] impls; the decoder offers
//! the building blocks they share: scalar coercion, element and entry loops
//! that attach the index or key to errors, and the aggregate protocol that
//! resolves the tag table, checks required fields and runs validation.
mod impls;
mod traits;

use std::{any::type_name, borrow::Cow, io};

pub use traits::{Aggregate, Decode, RawDecode};

use crate::{
    error::{DecodeError, ErrorKind},
    lexer::Lexer,
    options::{DecoderOptions, UnknownFields},
    read::{IoRead, Read, SliceRead},
    shape::Shape,
    tags,
    token::{FromToken, Token, TokenKind},
};

/// Decodes JSON documents from a byte source into [`Decode`] destinations.
pub struct Decoder<'src, R> {
    lexer: Lexer<'src, R>,
    options: DecoderOptions,
}

impl<'src> Decoder<'src, SliceRead<'src>> {
    /// Decodes from an in-memory buffer; string tokens borrow from `input`.
    #[must_use]
    pub fn from_slice(input: &'src [u8]) -> Self {
        Self::new(SliceRead::new(input))
    }
}

impl<R: io::Read> Decoder<'static, IoRead<R>> {
    /// Decodes from any [`io::Read`], buffering one chunk at a time.
    pub fn from_reader(reader: R) -> Self {
        Self::new(IoRead::new(reader))
    }
}

impl<'src, R: Read<'src>> Decoder<'src, R> {
    /// Wraps a [`Read`] source with default options.
    pub fn new(read: R) -> Self {
        Self {
            lexer: Lexer::new(read),
            options: DecoderOptions::default(),
        }
    }

    /// Replaces the options used by later decodes.
    #[must_use]
    pub fn with_options(mut self, options: DecoderOptions) -> Self {
        self.options = options;
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// The underlying lexer, e.g. to inspect its current token or depth.
    pub fn lexer(&self) -> &Lexer<'src, R> {
        &self.lexer
    }

    /// Decodes one value into `dst`, then runs its validity check.
    ///
    /// # Errors
    ///
    /// Returns the first decode error, or
    /// [`ErrorKind::ValueInvalid`] if the decoded value rejects itself.
    pub fn decode<T: Decode>(&mut self, dst: &mut T) -> Result<(), DecodeError> {
        dst.decode(self)?;
        dst.is_valid()
            .map_err(|e| self.error(ErrorKind::ValueInvalid(e)))
    }

    /// Ensures nothing but whitespace follows the decoded value.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnmatchedBrace`] for a stray closer and
    /// [`ErrorKind::InvalidJson`] for any other trailing content.
    pub fn finish(mut self) -> Result<(), DecodeError> {
        if self.lexer.advance()? {
            return Err(self.error(ErrorKind::InvalidJson(
                "trailing characters after the root value",
            )));
        }
        Ok(())
    }

    /// Builds an error at the current offset.
    #[must_use]
    pub fn error(&self, kind: ErrorKind) -> DecodeError {
        self.lexer.error(kind)
    }

    /// Advances and returns the kind of the new token.
    ///
    /// # Errors
    ///
    /// Fails on lexer errors and at the end of the input.
    pub fn next_kind(&mut self) -> Result<TokenKind, DecodeError> {
        if !self.lexer.advance()? {
            return Err(self.error(ErrorKind::InvalidJson("unexpected end of input")));
        }
        Ok(self.lexer.current().map_or(TokenKind::Unknown, Token::kind))
    }

    /// The most recently read token.
    pub fn current(&self) -> Option<&Token<'src>> {
        self.lexer.current()
    }

    /// Consumes a `null` if one comes next.
    ///
    /// # Errors
    ///
    /// Fails when the next value starts like `null` but is not.
    pub fn take_null(&mut self) -> Result<bool, DecodeError> {
        if self.lexer.peek_byte()? != Some(b'n') {
            return Ok(false);
        }
        self.next_kind()?;
        Ok(true)
    }

    /// Consumes the next value without decoding it and returns its bytes.
    ///
    /// # Errors
    ///
    /// See [`Lexer::skip_value`].
    pub fn skip_value(&mut self) -> Result<Cow<'src, [u8]>, DecodeError> {
        self.lexer.skip_value()
    }

    /// Hands the raw bytes of the next value to `dst`.
    ///
    /// # Errors
    ///
    /// Wraps the custom decoder's failure in [`ErrorKind::CustomDecode`].
    pub fn decode_raw<T: RawDecode>(&mut self, dst: &mut T) -> Result<(), DecodeError> {
        let raw = self.lexer.skip_value()?;
        log::trace!(
            "custom decoder for {} received {} bytes",
            type_name::<T>(),
            raw.len()
        );
        dst.decode_raw(&raw)
            .map_err(|e| self.error(ErrorKind::CustomDecode(e)))
    }

    /// Reads a scalar token and converts it, returning `None` for `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidValue`] when the token does not convert
    /// and [`ErrorKind::UnsupportedShape`] for an object or array.
    pub fn decode_scalar<T: FromToken>(&mut self) -> Result<Option<T>, DecodeError> {
        match self.next_kind()? {
            TokenKind::Null => Ok(None),
            kind if kind.is_scalar() => {
                let offset = self.lexer.offset();
                let Some(token) = self.lexer.current() else {
                    return Err(self.error(ErrorKind::InvalidJson("expected a value")));
                };
                T::from_token(token)
                    .map(Some)
                    .map_err(|kind| DecodeError::new(kind, offset))
            }
            found => Err(self.unexpected(found, Shape::Scalar(T::KIND))),
        }
    }

    /// Error for a token that cannot start a value of shape `expected`.
    ///
    /// Values of the wrong shape give [`ErrorKind::UnsupportedShape`];
    /// punctuation where a value belongs gives [`ErrorKind::InvalidJson`].
    #[must_use]
    pub fn unexpected(&self, found: TokenKind, expected: Shape) -> DecodeError {
        if found.is_scalar() || found.is_opening() {
            self.error(ErrorKind::UnsupportedShape { found, expected })
        } else {
            self.error(ErrorKind::InvalidJson("expected a value"))
        }
    }

    fn check_depth(&self) -> Result<(), DecodeError> {
        if self.lexer.depth() > self.options.max_depth {
            return Err(self.error(ErrorKind::DepthLimitExceeded(self.options.max_depth)));
        }
        Ok(())
    }

    /// Consumes the next token if it is the closer `byte`.
    fn close_if(&mut self, byte: u8) -> Result<bool, DecodeError> {
        if self.lexer.peek_byte()? == Some(byte) {
            self.next_kind()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Runs `element` once per array element, after the `[` has been read.
    ///
    /// Errors from `element` get the element index prepended to their path.
    ///
    /// # Errors
    ///
    /// Fails on the first element error and on malformed separators.
    pub fn decode_elements<F>(&mut self, mut element: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, usize) -> Result<(), DecodeError>,
    {
        self.check_depth()?;
        if self.close_if(b']')? {
            return Ok(());
        }
        let mut index = 0;
        loop {
            element(self, index).map_err(|e| e.within(index))?;
            match self.next_kind()? {
                TokenKind::Comma => index += 1,
                TokenKind::CloseArray => return Ok(()),
                _ => {
                    return Err(self.error(ErrorKind::InvalidJson(
                        "expected `,` or `]` after an array element",
                    )));
                }
            }
        }
    }

    /// Runs `entry` once per object member, after the `{` has been read.
    ///
    /// `entry` receives the member name with the cursor on the `:`, and must
    /// consume the value. Its errors get the member name prepended to their
    /// path.
    ///
    /// # Errors
    ///
    /// Fails on the first entry error, on a member name that is not a
    /// string, and on a missing `:`, `,` or `}`.
    pub fn decode_entries<F>(&mut self, mut entry: F) -> Result<(), DecodeError>
    where
        F: FnMut(&mut Self, &str) -> Result<(), DecodeError>,
    {
        self.check_depth()?;
        if self.close_if(b'}')? {
            return Ok(());
        }
        loop {
            let key = self.next_key()?;
            entry(self, &key).map_err(|e| e.within(key.as_str()))?;
            match self.next_kind()? {
                TokenKind::Comma => {}
                TokenKind::CloseObject => return Ok(()),
                _ => {
                    return Err(self.error(ErrorKind::InvalidJson(
                        "expected `,` or `}` after an object member",
                    )));
                }
            }
        }
    }

    fn next_key(&mut self) -> Result<String, DecodeError> {
        if self.next_kind()? != TokenKind::String {
            return Err(self.error(ErrorKind::InvalidJson("expected a string field name")));
        }
        let key = self
            .lexer
            .current()
            .and_then(Token::as_str)
            .map(str::to_owned)
            .ok_or_else(|| self.error(ErrorKind::InvalidJson("field name is not valid utf-8")))?;
        if self.next_kind()? != TokenKind::Colon {
            return Err(self.error(ErrorKind::InvalidJson("expected `:` after a field name")));
        }
        Ok(key)
    }

    /// Decodes an object into the fields of `dst`.
    ///
    /// Resolves the tag table of `A`. An aggregate that decodes itself gets
    /// the raw span of the value. Otherwise each member is routed to its
    /// field, unknown members follow [`DecoderOptions::unknown_fields`], and
    /// once the object is closed the first required field that was not
    /// present fails the decode. Aggregates that validate themselves do so
    /// last. A `null` leaves `dst` untouched.
    ///
    /// # Errors
    ///
    /// Returns field errors with the field name prepended to their path,
    /// [`ErrorKind::RequiredFieldMissing`] naming the missing field, and
    /// [`ErrorKind::Tag`] for invalid annotations.
    pub fn decode_aggregate<A: Aggregate>(&mut self, dst: &mut A) -> Result<(), DecodeError> {
        let table = tags::resolve::<A>().map_err(|e| self.error(ErrorKind::Tag(e)))?;

        if table.custom_decode() {
            let raw = self.lexer.skip_value()?;
            log::trace!(
                "custom decoder for {} received {} bytes",
                type_name::<A>(),
                raw.len()
            );
            return Aggregate::decode_raw(dst, &raw)
                .map_err(|e| self.error(ErrorKind::CustomDecode(e)));
        }

        match self.next_kind()? {
            TokenKind::Null => return Ok(()),
            TokenKind::OpenObject => {}
            found => return Err(self.unexpected(found, Shape::Aggregate)),
        }

        let mut checkout = table.checkout();
        let unknown_fields = self.options.unknown_fields;
        self.decode_entries(|de, key| match checkout.lookup(key) {
            Some(index) => {
                dst.decode_field(index, de)?;
                checkout.mark_seen(index);
                Ok(())
            }
            None => match unknown_fields {
                UnknownFields::Deny => Err(de.error(ErrorKind::UnknownField)),
                UnknownFields::Ignore => {
                    log::debug!("skipping unknown field `{key}` of {}", type_name::<A>());
                    de.skip_value().map(drop)
                }
            },
        })?;

        if let Some(missing) = checkout.first_missing() {
            return Err(self
                .error(ErrorKind::RequiredFieldMissing)
                .within(missing.name()));
        }
        if table.validates() {
            Aggregate::validate(dst).map_err(|e| self.error(ErrorKind::ValueInvalid(e)))?;
        }
        Ok(())
    }
}
