//! Accumulator for the four hex digits of a `\uXXXX` escape.
//!
//! JSON encodes characters outside the basic multilingual plane as a UTF-16
//! surrogate pair, so the buffer yields raw code units and leaves pairing to
//! the caller.

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u16,
    len: u8,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.acc = 0;
        self.len = 0;
    }

    #[inline]
    fn hex_val(b: u8) -> Option<u16> {
        match b {
            b'0'..=b'9' => Some(u16::from(b - b'0')),
            b'a'..=b'f' => Some(u16::from(b - b'a') + 10),
            b'A'..=b'F' => Some(u16::from(b - b'A') + 10),
            _ => None,
        }
    }

    /// Feeds one hex digit.
    ///
    /// Returns `Ok(Some(unit))` on the fourth digit and resets, `Ok(None)`
    /// before that, and `Err` for a byte that is not a hex digit.
    pub fn feed(&mut self, b: u8) -> Result<Option<u16>, &'static str> {
        let d = Self::hex_val(b).ok_or("invalid unicode escape")?;
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }
        let unit = self.acc;
        self.reset();
        Ok(Some(unit))
    }
}

pub(crate) fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

pub(crate) fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// Combines a surrogate pair into a scalar value.
pub(crate) fn combine_surrogates(high: u16, low: u16) -> Option<char> {
    let code = 0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
    char::from_u32(code)
}
