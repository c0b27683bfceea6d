//! Pull-based tokenizer.
//!
//! The [`Lexer`] produces one [`Token`] per call to [`Lexer::advance`] and
//! keeps the two most recent ones. Opening braces and brackets are pushed on
//! a [`BraceStack`] and every closer must match the innermost opener, so an
//! unbalanced document is reported by the lexer before the decoder sees it.
//!
//! [`Lexer::skip_value`] consumes a whole value without tokenizing it and
//! returns its raw bytes. It checks bracket balance on a stack of its own and
//! leaves the main stack untouched.
mod brace_stack;

use std::borrow::Cow;

use brace_stack::BraceStack;

use crate::{
    error::{DecodeError, ErrorKind},
    escape_buffer::{UnicodeEscapeBuffer, combine_surrogates, is_high_surrogate, is_low_surrogate},
    literal_buffer::{ExpectedLiteral, Step},
    read::Read,
    token::{self, Token, TokenKind},
};

const UNTERMINATED_STRING: ErrorKind = ErrorKind::InvalidJson("unterminated string");

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Splits a byte source into [`Token`]s and tracks brace nesting.
pub struct Lexer<'src, R> {
    read: R,
    stack: BraceStack,
    current: Option<Token<'src>>,
    previous: Option<Token<'src>>,
}

impl<'src, R: Read<'src>> Lexer<'src, R> {
    /// A lexer positioned before the first token.
    pub fn new(read: R) -> Self {
        Self {
            read,
            stack: BraceStack::default(),
            current: None,
            previous: None,
        }
    }

    /// The token produced by the last successful [`advance`](Self::advance).
    pub fn current(&self) -> Option<&Token<'src>> {
        self.current.as_ref()
    }

    /// The token produced before [`current`](Self::current).
    pub fn previous(&self) -> Option<&Token<'src>> {
        self.previous.as_ref()
    }

    /// Bytes consumed from the source so far.
    pub fn offset(&self) -> usize {
        self.read.offset()
    }

    /// Number of objects and arrays currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn error(&self, kind: ErrorKind) -> DecodeError {
        DecodeError::new(kind, self.read.offset())
    }

    fn peek(&mut self) -> Result<Option<u8>, DecodeError> {
        self.read.peek().map_err(|e| self.error(ErrorKind::Io(e)))
    }

    fn skip_whitespace(&mut self) -> Result<(), DecodeError> {
        while let Some(b) = self.peek()? {
            if !is_whitespace(b) {
                break;
            }
            self.read.discard();
        }
        Ok(())
    }

    /// Returns the next significant byte without consuming it.
    ///
    /// # Errors
    ///
    /// Fails only when the underlying source fails.
    pub fn peek_byte(&mut self) -> Result<Option<u8>, DecodeError> {
        self.skip_whitespace()?;
        self.peek()
    }

    /// Returns `true` once only whitespace remains.
    ///
    /// # Errors
    ///
    /// Fails only when the underlying source fails.
    pub fn end_of_input(&mut self) -> Result<bool, DecodeError> {
        Ok(self.peek_byte()?.is_none())
    }

    /// Scans the next token.
    ///
    /// Returns `Ok(false)` at the end of the input when every opened object
    /// and array has been closed.
    ///
    /// # Errors
    ///
    /// Fails on an unterminated string, a malformed escape or literal, a
    /// closer that does not match its opener, and on end of input while a
    /// brace is still open.
    pub fn advance(&mut self) -> Result<bool, DecodeError> {
        let Some(b) = self.peek_byte()? else {
            if let Some(close) = self.stack.expected_closer() {
                return Err(self.error(ErrorKind::MissingClosingBrace {
                    expected: char::from(close),
                }));
            }
            self.previous = self.current.take();
            return Ok(false);
        };

        let token = match b {
            b'"' => self.scan_string()?,
            b'-' | b'0'..=b'9' => self.scan_number()?,
            b't' | b'f' | b'n' => self.scan_literal(b)?,
            _ => self.scan_punctuation(b)?,
        };
        self.previous = self.current.replace(token);
        Ok(true)
    }

    fn scan_punctuation(&mut self, b: u8) -> Result<Token<'src>, DecodeError> {
        let Some((kind, text)) = token::punctuation(b) else {
            self.read.discard();
            return Ok(Token::new(TokenKind::Unknown, Cow::Owned(vec![b])));
        };
        match kind {
            TokenKind::OpenObject | TokenKind::OpenArray => self.stack.push(b),
            TokenKind::CloseObject | TokenKind::CloseArray => {
                self.stack.pop_matching(b).map_err(|k| self.error(k))?;
            }
            _ => {}
        }
        self.read.discard();
        Ok(Token::new(kind, Cow::Borrowed(text)))
    }

    fn scan_number(&mut self) -> Result<Token<'src>, DecodeError> {
        self.read.begin_capture();
        let mut kind = TokenKind::Integer;
        while let Some(b) = self.peek()? {
            match b {
                b'0'..=b'9' | b'+' | b'-' => {}
                b'.' | b'e' | b'E' => kind = TokenKind::Float,
                _ => break,
            }
            self.read.discard();
        }
        Ok(Token::new(kind, self.read.end_capture()))
    }

    fn scan_literal(&mut self, first: u8) -> Result<Token<'src>, DecodeError> {
        let Some(mut literal) = ExpectedLiteral::new(first) else {
            return self.scan_punctuation(first);
        };
        self.read.discard();
        loop {
            let next = self.peek()?;
            match next.map(|b| literal.step(b)) {
                Some(Step::NeedMore) => self.read.discard(),
                Some(Step::Done(kind, text)) => {
                    self.read.discard();
                    return Ok(Token::new(kind, Cow::Borrowed(text)));
                }
                Some(Step::Reject) | None => {
                    let mut token = literal.matched().to_vec();
                    token.extend(next);
                    return Err(self.error(ErrorKind::InvalidValue {
                        token: token.into(),
                        reason: "invalid literal",
                    }));
                }
            }
        }
    }

    /// Scans a string, borrowing its contents unless an escape forces a copy.
    fn scan_string(&mut self) -> Result<Token<'src>, DecodeError> {
        self.read.discard();
        self.read.begin_capture();
        loop {
            match self.peek()? {
                None => return Err(self.error(UNTERMINATED_STRING)),
                Some(b'"') => {
                    let value = self.read.end_capture();
                    self.read.discard();
                    return Ok(Token::new(TokenKind::String, value));
                }
                Some(b'\\') => {
                    let prefix = self.read.end_capture().into_owned();
                    return self.scan_escaped_string(prefix);
                }
                Some(_) => self.read.discard(),
            }
        }
    }

    fn scan_escaped_string(&mut self, mut out: Vec<u8>) -> Result<Token<'src>, DecodeError> {
        loop {
            match self.peek()? {
                None => return Err(self.error(UNTERMINATED_STRING)),
                Some(b'"') => {
                    self.read.discard();
                    return Ok(Token::new(TokenKind::String, Cow::Owned(out)));
                }
                Some(b'\\') => {
                    self.read.discard();
                    self.scan_escape(&mut out)?;
                }
                Some(b) => {
                    out.push(b);
                    self.read.discard();
                }
            }
        }
    }

    fn scan_escape(&mut self, out: &mut Vec<u8>) -> Result<(), DecodeError> {
        let Some(b) = self.peek()? else {
            return Err(self.error(UNTERMINATED_STRING));
        };
        self.read.discard();
        let unescaped = match b {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let c = self.scan_unicode_escape()?;
                out.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
                return Ok(());
            }
            _ => return Err(self.error(ErrorKind::InvalidJson("invalid escape sequence"))),
        };
        out.push(unescaped);
        Ok(())
    }

    /// Decodes the digits after `\u`, pairing surrogates.
    fn scan_unicode_escape(&mut self) -> Result<char, DecodeError> {
        const LONE_SURROGATE: ErrorKind = ErrorKind::InvalidJson("lone surrogate in unicode escape");

        let unit = self.scan_hex4()?;
        if is_low_surrogate(unit) {
            return Err(self.error(LONE_SURROGATE));
        }
        if !is_high_surrogate(unit) {
            return char::from_u32(u32::from(unit)).ok_or_else(|| self.error(LONE_SURROGATE));
        }
        for expected in [b'\\', b'u'] {
            if self.peek()? != Some(expected) {
                return Err(self.error(LONE_SURROGATE));
            }
            self.read.discard();
        }
        let low = self.scan_hex4()?;
        if !is_low_surrogate(low) {
            return Err(self.error(LONE_SURROGATE));
        }
        combine_surrogates(unit, low).ok_or_else(|| self.error(LONE_SURROGATE))
    }

    fn scan_hex4(&mut self) -> Result<u16, DecodeError> {
        let mut buf = UnicodeEscapeBuffer::new();
        loop {
            let Some(b) = self.peek()? else {
                return Err(self.error(UNTERMINATED_STRING));
            };
            let unit = buf
                .feed(b)
                .map_err(|reason| self.error(ErrorKind::InvalidJson(reason)))?;
            self.read.discard();
            if let Some(unit) = unit {
                return Ok(unit);
            }
        }
    }

    /// Consumes the next value and returns its raw bytes.
    ///
    /// Strings keep their quotes and escapes. Objects and arrays are returned
    /// whole. A bare scalar ends before whitespace, `,`, `}` or `]`. Neither
    /// [`current`](Self::current) nor the brace stack change.
    ///
    /// # Errors
    ///
    /// Fails when no value starts at the cursor, on an unterminated string,
    /// and on unbalanced braces inside the value. A closer that does not
    /// match the innermost open brace is [`ErrorKind::UnmatchedBrace`], as
    /// it is for [`advance`](Self::advance).
    pub fn skip_value(&mut self) -> Result<Cow<'src, [u8]>, DecodeError> {
        const NO_VALUE: ErrorKind = ErrorKind::InvalidJson("expected a value");

        let Some(first) = self.peek_byte()? else {
            return Err(self.error(NO_VALUE));
        };
        self.read.begin_capture();
        match first {
            b'"' => {
                self.read.discard();
                self.skip_string_body()?;
            }
            b'{' | b'[' => self.skip_container()?,
            b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => self.skip_scalar()?,
            b'}' | b']' if self.stack.expected_closer() != Some(first) => {
                let kind = self.stack.pop_matching(first).err().unwrap_or(NO_VALUE);
                return Err(self.error(kind));
            }
            _ => return Err(self.error(NO_VALUE)),
        }
        Ok(self.read.end_capture())
    }

    fn skip_string_body(&mut self) -> Result<(), DecodeError> {
        loop {
            match self.peek()? {
                None => return Err(self.error(UNTERMINATED_STRING)),
                Some(b'"') => {
                    self.read.discard();
                    return Ok(());
                }
                Some(b'\\') => {
                    self.read.discard();
                    if self.peek()?.is_none() {
                        return Err(self.error(UNTERMINATED_STRING));
                    }
                    self.read.discard();
                }
                Some(_) => self.read.discard(),
            }
        }
    }

    fn skip_container(&mut self) -> Result<(), DecodeError> {
        let mut local = BraceStack::default();
        loop {
            let Some(b) = self.peek()? else {
                let expected = local.expected_closer().map_or('}', char::from);
                return Err(self.error(ErrorKind::MissingClosingBrace { expected }));
            };
            match b {
                b'"' => {
                    self.read.discard();
                    self.skip_string_body()?;
                    continue;
                }
                b'{' | b'[' => local.push(b),
                b'}' | b']' => {
                    local.pop_matching(b).map_err(|k| self.error(k))?;
                    if local.is_empty() {
                        self.read.discard();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.read.discard();
        }
    }

    fn skip_scalar(&mut self) -> Result<(), DecodeError> {
        while let Some(b) = self.peek()? {
            if is_whitespace(b) || matches!(b, b',' | b'}' | b']') {
                break;
            }
            self.read.discard();
        }
        Ok(())
    }
}
