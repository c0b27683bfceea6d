use crate::{error::ErrorKind, token::opposite_of};

/// LIFO of the opening braces and brackets that still await their closer.
#[derive(Debug, Clone)]
pub(crate) struct BraceStack(Vec<u8>);

impl Default for BraceStack {
    fn default() -> Self {
        Self(Vec::with_capacity(10))
    }
}

impl BraceStack {
    pub fn push(&mut self, open: u8) {
        self.0.push(open);
    }

    /// Pops the innermost opener, failing unless `close` is its opposite.
    pub fn pop_matching(&mut self, close: u8) -> Result<(), ErrorKind> {
        let expected = self.expected_closer();
        if expected == Some(close) {
            self.0.pop();
            Ok(())
        } else {
            Err(ErrorKind::UnmatchedBrace {
                found: char::from(close),
                expected: expected.map(char::from),
            })
        }
    }

    /// The closer the innermost opener is waiting for.
    pub fn expected_closer(&self) -> Option<u8> {
        self.0.last().copied().and_then(opposite_of)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
