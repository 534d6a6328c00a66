//! Lazy, trivia-free token stream with bounded lookahead.

use std::collections::VecDeque;

use super::errors::{LexError, ParseError};
use super::lexer::{Lexer, Token};
use super::token_kind::TokenKind;
use crate::base::Position;

/// A significant token plus the doc comment that directly preceded it.
#[derive(Debug, Clone)]
pub(crate) struct Lexeme<'a> {
    pub token: Token<'a>,
    pub doc: Option<&'a str>,
}

/// Pulls tokens from the lexer on demand, dropping comments and markup.
///
/// A lexical error is held back until the parser actually needs the token
/// it replaced, so an earlier syntax error still wins.
pub(crate) struct TokenStream<'a> {
    lexer: Lexer<'a>,
    lookahead: VecDeque<Lexeme<'a>>,
    pending_doc: Option<&'a str>,
    error: Option<LexError>,
    exhausted: bool,
    last_position: Position,
}

impl<'a> TokenStream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: VecDeque::new(),
            pending_doc: None,
            error: None,
            exhausted: false,
            last_position: Position::default(),
        }
    }

    /// Buffer tokens until index `n` is available or the input runs out.
    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n && !self.exhausted {
            match self.lexer.next() {
                None => self.exhausted = true,
                Some(Err(error)) => {
                    self.error = Some(error);
                    self.exhausted = true;
                }
                Some(Ok(token)) => match token.kind {
                    TokenKind::DOC_COMMENT => self.pending_doc = Some(token.text),
                    TokenKind::OPEN_TAG => {}
                    kind if kind.is_trivia() => {}
                    _ => {
                        let doc = self.pending_doc.take();
                        self.lookahead.push_back(Lexeme { token, doc });
                    }
                },
            }
        }
    }

    pub fn peek(&mut self, n: usize) -> Option<&Lexeme<'a>> {
        self.fill(n);
        self.lookahead.get(n)
    }

    pub fn bump(&mut self) -> Option<Lexeme<'a>> {
        self.fill(0);
        let lexeme = self.lookahead.pop_front()?;
        self.last_position = lexeme.token.span.end;
        Some(lexeme)
    }

    /// End position of the last consumed token.
    pub fn last_position(&self) -> Position {
        self.last_position
    }

    /// The lexical error that ended the stream, if any.
    pub fn lex_error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    /// The error for running out of tokens at this point.
    pub fn end_error(&self) -> ParseError {
        match &self.error {
            Some(error) => ParseError::from(error.clone()),
            None => ParseError::TokenStreamEnd {
                position: self.last_position,
            },
        }
    }
}
