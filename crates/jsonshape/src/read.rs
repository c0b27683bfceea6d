//! Byte sources for the lexer.
//!
//! [`SliceRead`] scans an in-memory buffer and hands out borrowed spans.
//! [`IoRead`] pulls fixed-size chunks from any [`std::io::Read`] and copies
//! only the bytes of the span being captured, so the full document is never
//! held in memory.
use std::{borrow::Cow, io};

const CHUNK_SIZE: usize = 8 * 1024;

/// A pull-based byte source.
///
/// At most one capture is active at a time. Every byte passed to
/// [`discard`](Read::discard) between [`begin_capture`](Read::begin_capture)
/// and [`end_capture`](Read::end_capture) is part of the returned span.
pub trait Read<'src> {
    /// Returns the next byte without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates failures of the underlying reader.
    fn peek(&mut self) -> io::Result<Option<u8>>;

    /// Consumes the byte last returned by [`peek`](Read::peek).
    fn discard(&mut self);

    /// Number of bytes consumed so far.
    fn offset(&self) -> usize;

    /// Starts recording consumed bytes.
    fn begin_capture(&mut self);

    /// Stops recording and returns the bytes consumed since [`begin_capture`](Read::begin_capture).
    fn end_capture(&mut self) -> Cow<'src, [u8]>;
}

/// Reads from a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct SliceRead<'src> {
    slice: &'src [u8],
    index: usize,
    capture_start: usize,
}

impl<'src> SliceRead<'src> {
    /// Starts at the beginning of `slice`.
    #[must_use]
    pub fn new(slice: &'src [u8]) -> Self {
        Self {
            slice,
            index: 0,
            capture_start: 0,
        }
    }
}

impl<'src> Read<'src> for SliceRead<'src> {
    #[inline]
    fn peek(&mut self) -> io::Result<Option<u8>> {
        Ok(self.slice.get(self.index).copied())
    }

    #[inline]
    fn discard(&mut self) {
        if self.index < self.slice.len() {
            self.index += 1;
        }
    }

    fn offset(&self) -> usize {
        self.index
    }

    fn begin_capture(&mut self) {
        self.capture_start = self.index;
    }

    fn end_capture(&mut self) -> Cow<'src, [u8]> {
        Cow::Borrowed(&self.slice[self.capture_start..self.index])
    }
}

/// Reads from an [`io::Read`] in 8 KiB chunks.
pub struct IoRead<R> {
    reader: R,
    buf: Box<[u8]>,
    pos: usize,
    len: usize,
    consumed: usize,
    capture: Option<Vec<u8>>,
}

impl<R: io::Read> IoRead<R> {
    /// Wraps `reader`; nothing is read until the first peek.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: vec![0; CHUNK_SIZE].into_boxed_slice(),
            pos: 0,
            len: 0,
            consumed: 0,
            capture: None,
        }
    }

    /// Returns the wrapped reader. Buffered bytes not yet consumed are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    fn fill(&mut self) -> io::Result<()> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: io::Read> Read<'static> for IoRead<R> {
    fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.pos == self.len {
            self.fill()?;
        }
        Ok(self.buf[..self.len].get(self.pos).copied())
    }

    fn discard(&mut self) {
        if self.pos < self.len {
            if let Some(capture) = &mut self.capture {
                capture.push(self.buf[self.pos]);
            }
            self.pos += 1;
            self.consumed += 1;
        }
    }

    fn offset(&self) -> usize {
        self.consumed
    }

    fn begin_capture(&mut self) {
        self.capture = Some(Vec::new());
    }

    fn end_capture(&mut self) -> Cow<'static, [u8]> {
        Cow::Owned(self.capture.take().unwrap_or_default())
    }
}
