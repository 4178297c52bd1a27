//! End-to-end: source text through the lexer into the `.lx` listing.

use plus_common::MinusStyle;
use plus_lexer::{Lexer, Listing, TokenKind};
use pretty_assertions::assert_eq;

/// Listing lines for `source` and the kind of the terminal token.
fn run(source: &str, listing: Listing) -> (Vec<String>, TokenKind) {
    let mut lexer = Lexer::new(source.as_bytes(), "prog.plus");
    let mut lines = Vec::new();
    loop {
        let token = lexer.next_token();
        if token.kind.is_terminal() {
            return (lines, token.kind);
        }
        lines.extend(listing.line(&token));
    }
}

#[test]
fn declaration_scenario() {
    let (lines, end) = run("number x := 5;", Listing::default());
    assert_eq!(
        lines,
        vec![
            "Keyword(number)",
            "Identifier(x)",
            "Operator(:=)",
            "IntConstant(5)",
            "EndOfLine",
        ]
    );
    assert_eq!(end, TokenKind::EndOfInput);
}

#[test]
fn write_scenario() {
    let (lines, end) = run(r#"write "hi" and newline;"#, Listing::default());
    assert_eq!(
        lines,
        vec![
            "Keyword(write)",
            "StringConstant(\"hi\")",
            "Keyword(and)",
            "Keyword(newline)",
            "EndOfLine",
        ]
    );
    assert_eq!(end, TokenKind::EndOfInput);
}

#[test]
fn full_program() {
    let source = "\
* countdown program *
number count := 3;
repeat count times {
    write count and newline;
    count -= 1;
}
write \"done\";
";
    let (lines, end) = run(source, Listing::default());
    assert_eq!(end, TokenKind::EndOfInput);
    assert_eq!(lines.len(), 22);
    assert_eq!(lines[0], "Keyword(number)");
    assert_eq!(lines[8], "OpenBlock");
    assert_eq!(lines[18], "CloseBlock");
    assert_eq!(lines[20], "StringConstant(\"done\")");
}

#[test]
fn error_stops_the_listing() {
    let (lines, end) = run("number x := 5;\nx := x + 1;\nwrite x;", Listing::default());
    assert_eq!(end, TokenKind::Error);
    assert_eq!(
        lines,
        vec![
            "Keyword(number)",
            "Identifier(x)",
            "Operator(:=)",
            "IntConstant(5)",
            "EndOfLine",
            "Identifier(x)",
            "Operator(:=)",
            "Identifier(x)",
        ]
    );
}

#[test]
fn error_position_is_reported() {
    let mut lexer = Lexer::new(b"number x := 5;\nx := x + 1;", "prog.plus");
    let error = lexer.by_ref().last().unwrap();
    assert_eq!(error.kind, TokenKind::Error);
    assert_eq!((error.line(), error.column()), (2, 8));

    let diag = &lexer.diagnostics().diagnostics()[0];
    assert_eq!(diag.to_string(), "error: unexpected character '+'\n  --> prog.plus:2:8");
}

#[test]
fn minus_style_is_explicit() {
    let (operator, _) = run("x := -5;", Listing::new(MinusStyle::Operator));
    assert!(operator.contains(&"Operator(-)".to_string()));

    let (omitted, _) = run("x := -5;", Listing::new(MinusStyle::Omit));
    assert_eq!(omitted.len(), operator.len() - 1);
    assert!(!omitted.iter().any(|l| l.contains("(-)")));
}

#[test]
fn tokens_serialize_with_positions() {
    let (tokens, diags) = Lexer::new(b"\n  write", "prog.plus").tokenize();
    assert!(diags.is_empty());
    let json = serde_json::to_value(&tokens[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "Write",
            "lexeme": "write",
            "span": { "start": { "line": 2, "column": 3 } }
        })
    );
}
