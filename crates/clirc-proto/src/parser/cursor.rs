//! The parser's input buffer and position cursor.
//!
//! The buffer is append-only; `consume` commits everything up to the
//! position index as a lexeme and releases it, so resident memory is
//! bounded by the longest unterminated line seen so far.

use bytes::{Bytes, BytesMut};

/// Append-only byte buffer with a read position.
#[derive(Debug, Default)]
pub(crate) struct Cursor {
    buf: BytesMut,
    pos: usize,
}

impl Cursor {
    /// Append a chunk of input.
    pub(crate) fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Return the byte at the position index and advance past it.
    pub(crate) fn next(&mut self) -> Option<u8> {
        let b = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    /// Step the position back one byte.
    ///
    /// Only valid immediately after a successful [`next`](Self::next).
    pub(crate) fn rewind(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos -= 1;
    }

    /// Commit the bytes before the position index as a lexeme, dropping
    /// them from the buffer and resetting the position.
    pub(crate) fn consume(&mut self) -> Bytes {
        let lexeme = self.buf.split_to(self.pos).freeze();
        self.pos = 0;
        lexeme
    }

    /// Read a run of bytes satisfying `pred`, stop and rewind at the first
    /// byte that does not, and commit the run (plus any bytes already read
    /// since the last `consume`) as a lexeme.
    pub(crate) fn parse_until(&mut self, mut pred: impl FnMut(u8) -> bool) -> Bytes {
        while let Some(b) = self.next() {
            if !pred(b) {
                self.rewind();
                break;
            }
        }
        self.consume()
    }

    /// Advance past a run of spaces without committing them.
    pub(crate) fn skip_spaces(&mut self) {
        while let Some(b) = self.next() {
            if b != b' ' {
                self.rewind();
                break;
            }
        }
    }

    /// The most recently read byte, if any bytes are pending.
    pub(crate) fn last_byte(&self) -> Option<u8> {
        if self.pos == 0 {
            None
        } else {
            self.buf.get(self.pos - 1).copied()
        }
    }

    /// Whether a full line (terminated by LF) is buffered at or after the
    /// position index.
    pub(crate) fn has_line(&self) -> bool {
        self.buf[self.pos..].contains(&b'\n')
    }

    /// Whether any bytes remain buffered, committed or not.
    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;

    #[test]
    fn test_next_and_rewind() {
        let mut cursor = Cursor::default();
        cursor.extend(b"ab");
        assert_eq!(cursor.next(), Some(b'a'));
        cursor.rewind();
        assert_eq!(cursor.next(), Some(b'a'));
        assert_eq!(cursor.next(), Some(b'b'));
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_consume_commits_and_frees() {
        let mut cursor = Cursor::default();
        cursor.extend(b"abcd");
        cursor.next();
        cursor.next();
        assert_eq!(&cursor.consume()[..], b"ab");
        assert_eq!(cursor.next(), Some(b'c'));
    }

    #[test]
    fn test_parse_until_rewinds_on_mismatch() {
        let mut cursor = Cursor::default();
        cursor.extend(b"abc def");
        let run = cursor.parse_until(|b| b != b' ');
        assert_eq!(&run[..], b"abc");
        assert_eq!(cursor.next(), Some(b' '));
    }

    #[test]
    fn test_parse_until_includes_pending_bytes() {
        let mut cursor = Cursor::default();
        cursor.extend(b"abc ");
        assert_eq!(cursor.next(), Some(b'a'));
        let run = cursor.parse_until(|b| b != b' ');
        assert_eq!(&run[..], b"abc");
    }

    #[test]
    fn test_parse_until_exhaustion_commits_everything() {
        let mut cursor = Cursor::default();
        cursor.extend(b"abc");
        let run = cursor.parse_until(|_| true);
        assert_eq!(&run[..], b"abc");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_skip_spaces_leaves_delimiters_pending() {
        let mut cursor = Cursor::default();
        cursor.extend(b"   x");
        cursor.skip_spaces();
        assert_eq!(cursor.next(), Some(b'x'));
        // the skipped spaces are still part of the next lexeme
        cursor.rewind();
        assert_eq!(&cursor.consume()[..], b"   ");
    }

    #[test]
    fn test_has_line() {
        let mut cursor = Cursor::default();
        cursor.extend(b"PING");
        assert!(!cursor.has_line());
        cursor.extend(b"\r\n");
        assert!(cursor.has_line());
    }

    #[test]
    fn test_last_byte() {
        let mut cursor = Cursor::default();
        cursor.extend(b"x\n");
        assert_eq!(cursor.last_byte(), None);
        cursor.next();
        assert_eq!(cursor.last_byte(), Some(b'x'));
        cursor.next();
        assert_eq!(cursor.last_byte(), Some(b'\n'));
    }
}
