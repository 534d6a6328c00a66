//! Lexer and parser error types
//!
//! Every error carries the 1-based source position it was raised at, so a
//! caller can render a precise diagnostic without re-reading the file.

use thiserror::Error;

use crate::base::Position;

/// Errors raised while turning source text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A quoted literal or block comment has no closing delimiter.
    #[error("{position}: unterminated literal, expected closing {delimiter}")]
    UnterminatedLiteral {
        position: Position,
        delimiter: &'static str,
    },

    /// A character that starts no token.
    #[error("{position}: unexpected character {character:?}")]
    UnexpectedCharacter { position: Position, character: char },
}

impl LexError {
    /// Position the error was raised at.
    pub fn position(&self) -> Position {
        match self {
            Self::UnterminatedLiteral { position, .. }
            | Self::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

/// Errors raised while parsing one file. Parsing never recovers: the first
/// error is the outcome for the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The token stream ended while a construct still expected tokens,
    /// including a string literal left open at the end of the file.
    #[error("{position}: unexpected end of token stream")]
    TokenStreamEnd { position: Position },

    /// A complete but malformed construct.
    #[error("{position}: unexpected {found}, expected {expected}")]
    Syntax {
        position: Position,
        found: String,
        expected: String,
    },

    /// The lexer hit a character that starts no token.
    #[error("{position}: unexpected character {character:?}")]
    UnexpectedCharacter { position: Position, character: char },

    /// Constructs nested deeper than the configured parser nesting limit.
    #[error("{position}: nesting limit of {limit} exceeded")]
    NestingLimit { position: Position, limit: usize },
}

impl ParseError {
    pub fn syntax(position: Position, found: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            found: found.into(),
            expected: expected.into(),
        }
    }

    /// Position the error was raised at.
    pub fn position(&self) -> Position {
        match self {
            Self::TokenStreamEnd { position }
            | Self::Syntax { position, .. }
            | Self::UnexpectedCharacter { position, .. }
            | Self::NestingLimit { position, .. } => *position,
        }
    }
}

impl From<LexError> for ParseError {
    /// An open literal swallows the rest of the file, so for the parser it
    /// is an exhausted token stream.
    fn from(error: LexError) -> Self {
        match error {
            LexError::UnterminatedLiteral { position, .. } => Self::TokenStreamEnd { position },
            LexError::UnexpectedCharacter {
                position,
                character,
            } => Self::UnexpectedCharacter {
                position,
                character,
            },
        }
    }
}
