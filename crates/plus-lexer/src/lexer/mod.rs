pub mod cursor;
pub mod error;
pub mod token;

mod scanner;

pub use error::{LexError, LexemeCategory};
pub use scanner::{LexemeLimits, Lexer};
pub use token::{Token, TokenKind};
