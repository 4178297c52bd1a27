use std::fmt;

/// Lexeme categories whose length is bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeCategory {
    Identifier,
    Integer,
    String,
}

impl fmt::Display for LexemeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LexemeCategory::Identifier => "identifier",
            LexemeCategory::Integer => "integer constant",
            LexemeCategory::String => "string constant",
        };
        f.write_str(name)
    }
}

/// A lexical error. Every one of them ends the scan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string constant")]
    UnterminatedString,
    #[error("unterminated string constant (newline in string)")]
    NewlineInString,
    #[error("unclosed comment")]
    UnclosedComment,
    #[error("unexpected character '{found}'")]
    ExpectedEquals { found: char },
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(String),
    #[error("{category} is longer than the maximum of {limit} characters")]
    LexemeTooLong {
        category: LexemeCategory,
        limit: usize,
    },
    #[error("source is {len} bytes, more than the {limit} bytes the lexer can address")]
    SourceTooLarge { len: usize, limit: usize },
}

impl LexError {
    /// Help text shown under the diagnostic, if any.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            LexError::UnterminatedString | LexError::NewlineInString => {
                Some("string constants must close with '\"' on the same line".to_string())
            }
            LexError::UnclosedComment => Some("close the comment with '*'".to_string()),
            LexError::ExpectedEquals { found } => Some(format!("did you mean '{}='?", found)),
            LexError::LexemeTooLong { .. } => {
                Some("raise the limit in the [lexer] section of Plus.toml".to_string())
            }
            LexError::SourceTooLarge { .. } => {
                Some("split the program into smaller files".to_string())
            }
            LexError::UnexpectedCharacter(_) => None,
        }
    }
}
