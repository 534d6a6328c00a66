//! Tokenizer and recursive-descent parser for PHP-like source
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind and Span
//!     ↓
//! TokenStream → comments and markup dropped, doc comments attached
//!     ↓
//! Parser → owned Node tree with pre-order NodeIds
//!     ↓
//! AST layer → Typed wrappers over Node
//! ```
//!
//! Parsing stops at the first error. A lexical error surfaces only when the
//! parser reaches the token it replaced.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod errors;
mod lexer;
mod token_kind;
mod token_stream;

pub use ast::*;
pub use errors::{LexError, ParseError};
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{Parse, parse, parse_with_nesting_limit};
pub use token_kind::TokenKind;
