use crate::token::TokenKind;

/// What happened after feeding one more byte into the literal matcher?
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done(TokenKind, &'static [u8]),
    /// Byte did **not** match the expected byte.
    Reject,
}

/// Matches `true`, `false` or `null` one byte at a time.
///
/// Holds the whole literal and how many of its bytes have been matched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteral {
    literal: &'static [u8],
    kind: TokenKind,
    matched: usize,
}

impl ExpectedLiteral {
    /// Starts matching on the first byte (`n`, `t` or `f`), which counts as
    /// matched.
    pub fn new(first: u8) -> Option<Self> {
        let (literal, kind): (&'static [u8], _) = match first {
            b'n' => (b"null", TokenKind::Null),
            b't' => (b"true", TokenKind::Boolean),
            b'f' => (b"false", TokenKind::Boolean),
            _ => return None,
        };
        Some(Self {
            literal,
            kind,
            matched: 1,
        })
    }

    /// The bytes matched so far.
    pub fn matched(&self) -> &'static [u8] {
        &self.literal[..self.matched]
    }

    pub fn step(&mut self, b: u8) -> Step {
        if self.literal.get(self.matched) != Some(&b) {
            return Step::Reject;
        }
        self.matched += 1;
        if self.matched == self.literal.len() {
            Step::Done(self.kind, self.literal)
        } else {
            Step::NeedMore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_true() {
        let mut lit = ExpectedLiteral::new(b't').unwrap();
        assert_eq!(lit.step(b'r'), Step::NeedMore);
        assert_eq!(lit.step(b'u'), Step::NeedMore);
        assert_eq!(lit.step(b'e'), Step::Done(TokenKind::Boolean, b"true"));
    }

    #[test]
    fn rejects_mismatch_and_keeps_prefix() {
        let mut lit = ExpectedLiteral::new(b'n').unwrap();
        assert_eq!(lit.step(b'u'), Step::NeedMore);
        assert_eq!(lit.step(b'x'), Step::Reject);
        assert_eq!(lit.matched(), b"nu");
    }

    #[test]
    fn only_literal_starts_are_accepted() {
        assert!(ExpectedLiteral::new(b'x').is_none());
    }
}
