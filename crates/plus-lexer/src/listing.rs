//! One-line-per-token text rendering of a token stream (the `.lx` format).

use std::io::{self, Write};

use plus_common::MinusStyle;
use tracing::debug;

use crate::lexer::{Token, TokenKind};

/// Renders tokens as listing lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct Listing {
    minus: MinusStyle,
}

impl Listing {
    pub fn new(minus: MinusStyle) -> Self {
        Self { minus }
    }

    pub fn minus_style(&self) -> MinusStyle {
        self.minus
    }

    /// The listing line for `token`, or `None` when the token is not listed
    /// (terminal tokens, and `-` under [`MinusStyle::Omit`]).
    pub fn line(&self, token: &Token) -> Option<String> {
        let line = match token.kind {
            TokenKind::NumberKeyword => "Keyword(number)".to_string(),
            TokenKind::Write => "Keyword(write)".to_string(),
            TokenKind::And => "Keyword(and)".to_string(),
            TokenKind::Newline => "Keyword(newline)".to_string(),
            TokenKind::Repeat => "Keyword(repeat)".to_string(),
            TokenKind::Times => "Keyword(times)".to_string(),
            TokenKind::Semicolon => "EndOfLine".to_string(),
            TokenKind::Assign => "Operator(:=)".to_string(),
            TokenKind::Increment => "Operator(+=)".to_string(),
            TokenKind::Decrement => "Operator(-=)".to_string(),
            TokenKind::LBrace => "OpenBlock".to_string(),
            TokenKind::RBrace => "CloseBlock".to_string(),
            TokenKind::Minus => match self.minus {
                MinusStyle::Operator => "Operator(-)".to_string(),
                MinusStyle::Omit => {
                    debug!(at = %token.span.start, "minus omitted from listing");
                    return None;
                }
            },
            TokenKind::Identifier => format!("Identifier({})", token.lexeme),
            TokenKind::IntConstant => format!("IntConstant({})", token.lexeme),
            TokenKind::StringConstant => format!("StringConstant(\"{}\")", token.lexeme),
            TokenKind::EndOfInput | TokenKind::Error => return None,
        };
        Some(line)
    }

    /// Write the line for `token` followed by a newline. Returns whether a
    /// line was written.
    pub fn write_token<W: Write>(&self, out: &mut W, token: &Token) -> io::Result<bool> {
        match self.line(token) {
            Some(line) => {
                writeln!(out, "{}", line)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn render(source: &str, listing: Listing) -> String {
        let mut out = Vec::new();
        for token in Lexer::new(source.as_bytes(), "test.plus") {
            listing.write_token(&mut out, &token).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn renders_every_listed_kind() {
        let source = r#"number n := 3; repeat n times { write "hi" and newline; n -= 1; m += 2; }"#;
        let expected = "\
Keyword(number)
Identifier(n)
Operator(:=)
IntConstant(3)
EndOfLine
Keyword(repeat)
Identifier(n)
Keyword(times)
OpenBlock
Keyword(write)
StringConstant(\"hi\")
Keyword(and)
Keyword(newline)
EndOfLine
Identifier(n)
Operator(-=)
IntConstant(1)
EndOfLine
Identifier(m)
Operator(+=)
IntConstant(2)
EndOfLine
CloseBlock
";
        assert_eq!(render(source, Listing::default()), expected);
    }

    #[test]
    fn minus_as_operator_by_default() {
        assert_eq!(render("x - 1", Listing::default()), "Identifier(x)\nOperator(-)\nIntConstant(1)\n");
    }

    #[test]
    fn minus_omitted_when_configured() {
        let listing = Listing::new(MinusStyle::Omit);
        assert_eq!(render("x - 1", listing), "Identifier(x)\nIntConstant(1)\n");
    }

    #[test]
    fn terminal_tokens_have_no_line() {
        let mut lexer = Lexer::new(b"@", "test.plus");
        let error = lexer.next_token();
        assert_eq!(Listing::default().line(&error), None);

        let mut lexer = Lexer::new(b"", "test.plus");
        let eof = lexer.next_token();
        assert_eq!(Listing::default().line(&eof), None);
    }

    #[test]
    fn write_token_reports_whether_written() {
        let mut out = Vec::new();
        let mut lexer = Lexer::new(b"- ;", "test.plus");
        let listing = Listing::new(MinusStyle::Omit);
        assert!(!listing.write_token(&mut out, &lexer.next_token()).unwrap());
        assert!(listing.write_token(&mut out, &lexer.next_token()).unwrap());
        assert_eq!(out, b"EndOfLine\n");
    }
}
