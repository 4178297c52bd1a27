//! Lexical analysis for `.plus` sources: the scanner and the token listing
//! written by the `la` driver.

pub mod lexer;
pub mod listing;

pub use lexer::{LexError, LexemeLimits, Lexer, Token, TokenKind};
pub use listing::Listing;
