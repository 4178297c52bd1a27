use plus_common::{Diagnostic, DiagnosticBag, LexerSection, Position};
use tracing::{debug, trace};

use super::cursor::{Cursor, MAX_SOURCE_LEN};
use super::error::{LexError, LexemeCategory};
use super::token::{Token, TokenKind};

/// Maximum lexeme length per bounded category, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexemeLimits {
    pub identifier: usize,
    pub integer: usize,
    /// Counts the content between the quotes only.
    pub string: usize,
}

impl Default for LexemeLimits {
    fn default() -> Self {
        Self::from(&LexerSection::default())
    }
}

impl From<&LexerSection> for LexemeLimits {
    fn from(section: &LexerSection) -> Self {
        Self {
            identifier: section.max_identifier_len,
            integer: section.max_integer_len,
            string: section.max_string_len,
        }
    }
}

/// Hand-written scanner for `.plus` sources.
///
/// Produces one token per [`Lexer::next_token`] call and stops for good at
/// the first `EndOfInput` or `Error`. Position state belongs to the instance,
/// so every input gets its own lexer.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    limits: LexemeLimits,
    diagnostics: DiagnosticBag,
    /// Set once `EndOfInput` or `Error` has been produced.
    terminal: Option<Token>,
    error: Option<LexError>,
    max_source_len: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src [u8], file: impl Into<String>) -> Self {
        Self::with_limits(source, file, LexemeLimits::default())
    }

    pub fn with_limits(source: &'src [u8], file: impl Into<String>, limits: LexemeLimits) -> Self {
        Self {
            cursor: Cursor::new(source, file),
            limits,
            diagnostics: DiagnosticBag::new(),
            terminal: None,
            error: None,
            max_source_len: MAX_SOURCE_LEN,
        }
    }

    /// Tokenize the entire source, returning all tokens (terminal one included)
    /// and the diagnostics raised on the way.
    pub fn tokenize(mut self) -> (Vec<Token>, DiagnosticBag) {
        let tokens: Vec<Token> = self.by_ref().collect();
        (tokens, self.diagnostics)
    }

    /// Scan the next token.
    ///
    /// Once a terminal token has been returned, later calls return it again
    /// without reading any further input.
    pub fn next_token(&mut self) -> Token {
        if let Some(ref terminal) = self.terminal {
            return terminal.clone();
        }

        let len = self.cursor.source_len();
        let token = if len > self.max_source_len {
            let start = self.cursor.position();
            let limit = self.max_source_len;
            self.fail(LexError::SourceTooLarge { len, limit }, start)
        } else {
            self.scan_token()
        };
        trace!(
            kind = ?token.kind,
            lexeme = %token.lexeme,
            line = token.line(),
            column = token.column(),
            "token"
        );
        if token.kind.is_terminal() {
            self.terminal = Some(token.clone());
        }
        token
    }

    /// The lexical error that ended the scan, if it ended with one.
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    pub fn diagnostics(&self) -> &DiagnosticBag {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> DiagnosticBag {
        self.diagnostics
    }

    pub fn file(&self) -> &str {
        self.cursor.file()
    }

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            let start = self.cursor.position();
            let Some(byte) = self.cursor.advance() else {
                return Token::end_of_input(self.cursor.span_from(start));
            };

            // Comments never produce a token; keep looping for the next real one.
            if byte == b'*' {
                if let Some(error) = self.skip_comment(start) {
                    return error;
                }
                continue;
            }

            return self.dispatch(byte, start);
        }
    }

    fn dispatch(&mut self, byte: u8, start: Position) -> Token {
        match byte {
            b'{' => self.make_token(TokenKind::LBrace, start),
            b'}' => self.make_token(TokenKind::RBrace, start),
            b';' => self.make_token(TokenKind::Semicolon, start),

            b':' => {
                if self.cursor.eat(b'=') {
                    self.make_token(TokenKind::Assign, start)
                } else {
                    self.fail(LexError::ExpectedEquals { found: ':' }, start)
                }
            }
            b'+' => {
                if self.cursor.eat(b'=') {
                    self.make_token(TokenKind::Increment, start)
                } else {
                    self.fail(LexError::ExpectedEquals { found: '+' }, start)
                }
            }
            b'-' => {
                if self.cursor.eat(b'=') {
                    self.make_token(TokenKind::Decrement, start)
                } else {
                    self.make_token(TokenKind::Minus, start)
                }
            }

            b'"' => self.scan_string(start),
            b if b.is_ascii_digit() => self.scan_integer(start),
            b if b.is_ascii_alphabetic() => self.scan_word(start),

            other => self.fail(LexError::UnexpectedCharacter(render_byte(other)), start),
        }
    }

    // ---------------------------------------------------------------
    // Whitespace & comments
    // ---------------------------------------------------------------

    fn skip_whitespace(&mut self) {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'));
    }

    /// Skip a `*...*` comment whose opening `*` was consumed at `start`.
    /// Returns the error token when input ends before the closing `*`.
    fn skip_comment(&mut self, start: Position) -> Option<Token> {
        loop {
            match self.cursor.advance() {
                Some(b'*') => {
                    debug!(
                        from = %start,
                        to = %self.cursor.position(),
                        "skipped comment"
                    );
                    return None;
                }
                Some(_) => {}
                None => return Some(self.fail(LexError::UnclosedComment, start)),
            }
        }
    }

    // ---------------------------------------------------------------
    // Literals & words
    // ---------------------------------------------------------------

    /// Scan a string constant after its opening `"`. No escapes: a backslash
    /// is an ordinary character.
    fn scan_string(&mut self, start: Position) -> Token {
        let content_start = self.cursor.position().offset;
        loop {
            match self.cursor.peek() {
                Some(b'"') => break,
                // The newline stays unconsumed so the error sits on the string's line.
                Some(b'\n') => return self.fail(LexError::NewlineInString, start),
                Some(_) => {
                    self.cursor.advance();
                }
                None => return self.fail(LexError::UnterminatedString, start),
            }
        }

        let content_len = self.cursor.slice_from(content_start).len();
        let content = self.cursor.text_from(content_start);
        self.cursor.advance(); // closing "

        if content_len > self.limits.string {
            return self.too_long(LexemeCategory::String, self.limits.string, start);
        }
        Token::new(
            TokenKind::StringConstant,
            content,
            self.cursor.span_from(start),
        )
    }

    fn scan_integer(&mut self, start: Position) -> Token {
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.slice_from(start.offset).len() > self.limits.integer {
            return self.too_long(LexemeCategory::Integer, self.limits.integer, start);
        }
        self.make_token(TokenKind::IntConstant, start)
    }

    /// Scan an identifier or keyword.
    fn scan_word(&mut self, start: Position) -> Token {
        self.cursor.eat_while(is_word_continue);
        if self.cursor.slice_from(start.offset).len() > self.limits.identifier {
            return self.too_long(LexemeCategory::Identifier, self.limits.identifier, start);
        }

        let lexeme = self.cursor.text_from(start.offset);
        let kind = TokenKind::keyword_from_str(&lexeme).unwrap_or(TokenKind::Identifier);
        Token::new(kind, lexeme, self.cursor.span_from(start))
    }

    // ---------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------

    /// Create a token from the bytes between `start` and the current position.
    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        Token::new(
            kind,
            self.cursor.text_from(start.offset),
            self.cursor.span_from(start),
        )
    }

    fn too_long(&mut self, category: LexemeCategory, limit: usize, start: Position) -> Token {
        self.fail(LexError::LexemeTooLong { category, limit }, start)
    }

    /// Record `error` as a diagnostic anchored at `start` and build the
    /// terminal `Error` token.
    fn fail(&mut self, error: LexError, start: Position) -> Token {
        let span = self.cursor.span_from(start);
        let lexeme = match error {
            LexError::UnexpectedCharacter(ref shown) => shown.clone(),
            _ => self.cursor.text_from(start.offset),
        };

        let mut diagnostic = Diagnostic::error(error.to_string()).with_span(span.clone());
        if let Some(help) = error.suggestion() {
            diagnostic = diagnostic.with_suggestion(help);
        }
        self.diagnostics.report(diagnostic);

        debug!(%error, at = %start, "lexical error");
        self.error = Some(error);
        Token::new(TokenKind::Error, lexeme, span)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    /// Yields every token up to and including the terminal one.
    fn next(&mut self) -> Option<Token> {
        if self.terminal.is_some() {
            return None;
        }
        Some(self.next_token())
    }
}

fn is_word_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Printable form of a stray byte for diagnostics.
fn render_byte(b: u8) -> String {
    if b.is_ascii_graphic() {
        (b as char).to_string()
    } else {
        format!("\\x{:02X}", b)
    }
}
