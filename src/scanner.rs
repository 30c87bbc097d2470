use crate::error::{ParseError, ParseErrorKind};

#[cfg(feature = "use-memchr")]
use memchr::memchr;
#[cfg(not(feature = "use-memchr"))]
fn memchr(needle: u8, haystack: &[u8]) -> Option<usize> {
    haystack.iter().position(|&x| x == needle)
}

/// Whitespace as XML defines it: space, tab, newline and carriage return.
#[inline]
pub(crate) const fn is_whitespace(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r')
}

/// Forward-only position over an immutable byte buffer.
///
/// The position always satisfies `0 <= position <= len`,
/// where `position == len` means the buffer is exhausted.
#[derive(Debug, Clone)]
pub struct Cursor<'buf> {
    buf: &'buf [u8],
    position: usize,
}

impl<'buf> Cursor<'buf> {
    /// Constructs a cursor at the start of `buf`.
    pub const fn new(buf: &'buf [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Gets the byte offset of the cursor from the start of the buffer.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the whole buffer, not what's left of it.
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer has no bytes at all.
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Whether every byte has been consumed.
    pub const fn is_at_end(&self) -> bool {
        self.position >= self.buf.len()
    }

    /// The byte under the cursor, if any.
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.position).copied()
    }

    /// Everything from the cursor to the end of the buffer.
    pub fn remaining(&self) -> &'buf [u8] {
        self.buf.get(self.position..).unwrap_or(&[])
    }

    /// Whether the remaining bytes begin with `needle`.
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.remaining().starts_with(needle)
    }

    /// Advances by `n` bytes, stopping at the end of the buffer.
    pub fn consume(&mut self, n: usize) {
        self.position = self.position.saturating_add(n).min(self.buf.len());
    }

    /// Advances past any whitespace, stopping at the first other byte or the end of the buffer.
    pub fn consume_whitespace(&mut self) {
        let skipped = self
            .remaining()
            .iter()
            .position(|&ch| !is_whitespace(ch))
            .unwrap_or_else(|| self.remaining().len());
        self.position += skipped;
    }

    /// Captures every byte from the cursor up to (not including) `delimiter`,
    /// leaving the cursor on the delimiter.
    ///
    /// If the delimiter never appears, the cursor is moved to the end of the buffer
    /// and [`ParseErrorKind::UnexpectedEndOfInput`] is returned.
    pub fn capture_until(&mut self, delimiter: u8) -> Result<&'buf [u8], ParseError> {
        let source = self.remaining();
        match memchr(delimiter, source) {
            Some(idx) => {
                self.position += idx;
                Ok(&source[..idx])
            }
            None => {
                self.position = self.buf.len();
                Err(ParseError::new(ParseErrorKind::UnexpectedEndOfInput, self.position))
            }
        }
    }
}
