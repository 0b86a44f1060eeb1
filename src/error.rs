use std::fmt;

use thiserror::Error;

/// The delimited token that was left open when the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Integer,
    List,
    Dictionary,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Token::Integer => "integer",
            Token::List => "list",
            Token::Dictionary => "dictionary",
        })
    }
}

/// Every way decoding can fail. Each variant records the byte offset at which
/// the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("end of data at position {position}")]
    EndOfInput { position: usize },

    #[error("invalid character {byte:?} at position {position}")]
    Syntax { position: usize, byte: char },

    #[error("unterminated {token} starting at position {position}")]
    UnterminatedToken { token: Token, position: usize },

    #[error("missing ':' after string length at position {position}")]
    MissingDelimiter { position: usize },

    #[error("invalid number {literal:?} at position {position}")]
    NumberFormat { position: usize, literal: String },

    #[error(
        "string at position {position} declares {declared} bytes but only {available} remain"
    )]
    TruncatedInput {
        position: usize,
        declared: usize,
        available: usize,
    },

    #[error("trailing data after value at position {position}")]
    TrailingData { position: usize },

    #[error("nesting deeper than {limit} levels at position {position}")]
    NestingTooDeep { position: usize, limit: usize },
}

impl DecodeError {
    /// Byte offset into the input where the error was detected.
    pub fn position(&self) -> usize {
        match *self {
            DecodeError::EndOfInput { position }
            | DecodeError::Syntax { position, .. }
            | DecodeError::UnterminatedToken { position, .. }
            | DecodeError::MissingDelimiter { position }
            | DecodeError::NumberFormat { position, .. }
            | DecodeError::TruncatedInput { position, .. }
            | DecodeError::TrailingData { position }
            | DecodeError::NestingTooDeep { position, .. } => position,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("byte string at {path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
}
