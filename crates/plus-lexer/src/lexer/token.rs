use plus_common::Span;
use serde::Serialize;

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn end_of_input(span: Span) -> Self {
        Self::new(TokenKind::EndOfInput, "EOF", span)
    }

    /// 1-based line of the token's first byte.
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    /// 1-based column of the token's first byte.
    pub fn column(&self) -> u32 {
        self.span.start.column
    }
}

/// All token kinds of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // === Keywords ===
    NumberKeyword,
    Write,
    And,
    Newline,
    Repeat,
    Times,

    // === Operators & delimiters ===
    Semicolon, // ;
    Assign,    // :=
    Increment, // +=
    Decrement, // -=
    LBrace,    // {
    RBrace,    // }
    Minus,     // -

    // === Literals ===
    Identifier,
    IntConstant,
    StringConstant,

    // === Terminal ===
    EndOfInput,
    Error,
}

impl TokenKind {
    /// Match an identifier-shaped run against the keyword set (case-sensitive).
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "number" => Some(TokenKind::NumberKeyword),
            "write" => Some(TokenKind::Write),
            "and" => Some(TokenKind::And),
            "newline" => Some(TokenKind::Newline),
            "repeat" => Some(TokenKind::Repeat),
            "times" => Some(TokenKind::Times),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::NumberKeyword
                | TokenKind::Write
                | TokenKind::And
                | TokenKind::Newline
                | TokenKind::Repeat
                | TokenKind::Times
        )
    }

    /// No token may be requested after one of these.
    pub fn is_terminal(self) -> bool {
        matches!(self, TokenKind::EndOfInput | TokenKind::Error)
    }
}
