use plus_common::{Position, Span};

/// Largest source a cursor can address; offsets are `u32`.
pub const MAX_SOURCE_LEN: usize = u32::MAX as usize;

/// Byte reader over source text with one byte of lookahead.
///
/// `position()` always names the byte about to be read next, so a token's
/// location is a snapshot taken before its first byte is consumed. Lookahead
/// never consumes, which keeps line/column bookkeeping free of rollbacks.
pub struct Cursor<'src> {
    source: &'src [u8],
    file: String,
    /// Byte offset of the *next* byte to be consumed.
    offset: u32,
    line: u32,
    column: u32,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src [u8], file: impl Into<String>) -> Self {
        Self {
            source,
            file: file.into(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Current position in the source.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    /// Peek at the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.source.get(self.offset as usize).copied()
    }

    /// Consume and return the next byte.
    pub fn advance(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.offset += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    /// Consume the next byte if it matches `expected`.
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume bytes while `predicate` returns true.
    pub fn eat_while(&mut self, predicate: impl Fn(u8) -> bool) {
        while let Some(byte) = self.peek() {
            if predicate(byte) {
                self.advance();
            } else {
                break;
            }
        }
    }

    pub fn source_len(&self) -> usize {
        self.source.len()
    }

    /// Bytes from offset `start` to the current offset.
    pub fn slice_from(&self, start: u32) -> &'src [u8] {
        &self.source[start as usize..self.offset as usize]
    }

    /// Text from offset `start` to the current offset; bytes outside UTF-8 are
    /// replaced rather than rejected.
    pub fn text_from(&self, start: u32) -> String {
        String::from_utf8_lossy(self.slice_from(start)).into_owned()
    }

    /// Build a Span from a start position to the current position.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(self.file.clone(), start, self.position())
    }
}
