//! Logos-based lexer
//!
//! Fast tokenization using the logos crate, wrapped in a mode switch for the
//! markup that surrounds `<?php ... ?>` blocks. Line and column are tracked
//! incrementally as tokens are produced, including across multi-line tokens
//! such as doc comments and strings.

use super::errors::LexError;
use super::token_kind::TokenKind;
use crate::base::{Position, Span, TextRange, TextSize};
use logos::Logos;

/// A token with its kind, text, byte range and line/column span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
    pub span: Span,
}

/// Lexer over one source text.
///
/// Yields tokens lazily in source order and stops after the first error.
/// Restarting means constructing a new `Lexer` over the same text.
pub struct Lexer<'a> {
    source: &'a str,
    mode: Mode<'a>,
    cursor: Cursor,
}

enum Mode<'a> {
    /// Outside of `<?php ... ?>`
    Markup,
    /// Inside a code block; `base` is the byte offset of the logos slice.
    Code {
        inner: logos::Lexer<'a, LogosToken>,
        base: usize,
    },
    Finished,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            source: input,
            mode: Mode::Markup,
            cursor: Cursor::default(),
        }
    }

    fn next_markup(&mut self) -> Option<Result<Token<'a>, LexError>> {
        let offset = self.cursor.offset;
        let rest = &self.source[offset..];
        if rest.is_empty() {
            self.mode = Mode::Finished;
            return None;
        }

        match find_open_tag(rest) {
            Some(0) => {
                let end = offset + OPEN_TAG_LEN;
                self.mode = Mode::Code {
                    inner: LogosToken::lexer(&self.source[end..]),
                    base: end,
                };
                Some(Ok(self.token(TokenKind::OPEN_TAG, offset, end)))
            }
            Some(len) => Some(Ok(self.token(TokenKind::INLINE_HTML, offset, offset + len))),
            None => {
                self.mode = Mode::Finished;
                Some(Ok(self.token(TokenKind::INLINE_HTML, offset, self.source.len())))
            }
        }
    }

    fn next_code(&mut self) -> Option<Result<Token<'a>, LexError>> {
        let Mode::Code { inner, base } = &mut self.mode else {
            return None;
        };
        let base = *base;
        let item = inner.next();
        let range = inner.span();
        let (start, end) = (base + range.start, base + range.end);

        match item {
            None => {
                self.mode = Mode::Finished;
                None
            }
            Some(Ok(logos_token)) => {
                let kind = TokenKind::from(logos_token);
                let token = self.token(kind, start, end);
                if kind == TokenKind::CLOSE_TAG {
                    self.mode = Mode::Markup;
                }
                Some(Ok(token))
            }
            Some(Err(error)) => {
                self.mode = Mode::Finished;
                self.cursor.advance_to(self.source, start);
                let position = self.cursor.position();
                Some(Err(match error {
                    LexErrorKind::Unterminated(delimiter) => LexError::UnterminatedLiteral {
                        position,
                        delimiter,
                    },
                    LexErrorKind::UnexpectedCharacter => LexError::UnexpectedCharacter {
                        position,
                        character: self.source[start..].chars().next().unwrap_or('\0'),
                    },
                }))
            }
        }
    }

    fn token(&mut self, kind: TokenKind, start: usize, end: usize) -> Token<'a> {
        self.cursor.advance_to(self.source, start);
        let start_position = self.cursor.position();
        let end_position = self
            .cursor
            .advance_to(self.source, end)
            .unwrap_or(start_position);

        Token {
            kind,
            text: &self.source[start..end],
            range: TextRange::new(TextSize::new(start as u32), TextSize::new(end as u32)),
            span: Span::new(start_position, end_position),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.mode {
            Mode::Finished => None,
            Mode::Markup => self.next_markup(),
            Mode::Code { .. } => self.next_code(),
        }
    }
}

/// Tokenize an entire string, failing on the first lexical error
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(input).collect()
}

const OPEN_TAG_LEN: usize = "<?php".len();

/// Byte offset of the next `<?php` (any casing) in `text`.
fn find_open_tag(text: &str) -> Option<usize> {
    text.match_indices("<?").map(|(i, _)| i).find(|&i| {
        text.get(i + 2..i + OPEN_TAG_LEN)
            .is_some_and(|tag| tag.eq_ignore_ascii_case("php"))
    })
}

/// Incremental line/column tracker.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    offset: usize,
    line: usize,
    column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Cursor {
    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Moves to byte `target`, returning the position of the last character
    /// stepped over.
    fn advance_to(&mut self, source: &str, target: usize) -> Option<Position> {
        let mut last = None;
        let mut chars = source[self.offset..target].chars().peekable();
        while let Some(c) = chars.next() {
            last = Some(self.position());
            match c {
                '\n' => self.newline(),
                // CRLF is one line break, counted at the '\n'
                '\r' if chars.peek() == Some(&'\n') => self.column += 1,
                '\r' => self.newline(),
                _ => self.column += 1,
            }
        }
        self.offset = target;
        last
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 1;
    }
}

/// Error payload produced by the logos callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    UnexpectedCharacter,
    Unterminated(&'static str),
}

/// Scan a quoted literal whose opening delimiter was just matched.
fn quoted(lex: &mut logos::Lexer<'_, LogosToken>, delimiter: u8) -> Result<(), LexErrorKind> {
    let rest = lex.remainder().as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'\\' => i += 2,
            b if b == delimiter => {
                lex.bump(i + 1);
                return Ok(());
            }
            _ => i += 1,
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::Unterminated(if delimiter == b'"' { "\"" } else { "'" }))
}

fn single_quoted(lex: &mut logos::Lexer<'_, LogosToken>) -> Result<(), LexErrorKind> {
    quoted(lex, b'\'')
}

fn double_quoted(lex: &mut logos::Lexer<'_, LogosToken>) -> Result<(), LexErrorKind> {
    quoted(lex, b'"')
}

const HORIZONTAL_SPACE: &[char] = &[' ', '\t'];
const LINE_BREAK: &[char] = &['\r', '\n'];

/// Scan a heredoc or nowdoc after its `<<<` opener, through the closing
/// label. The closing label may be indented and must not run on into an
/// identifier.
fn heredoc(lex: &mut logos::Lexer<'_, LogosToken>) -> Result<(), LexErrorKind> {
    let rest = lex.remainder();
    let header = rest.trim_start_matches(HORIZONTAL_SPACE);
    let quote = header.chars().next().filter(|&c| matches!(c, '\'' | '"'));
    let label_start = rest.len() - header.len() + quote.map_or(0, char::len_utf8);
    let label_len = rest[label_start..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if label_len == 0 || rest.as_bytes()[label_start].is_ascii_digit() {
        return Err(LexErrorKind::UnexpectedCharacter);
    }
    let label = &rest[label_start..label_start + label_len];
    let mut header_end = label_start + label_len;
    if let Some(quote) = quote {
        if !rest[header_end..].starts_with(quote) {
            return Err(LexErrorKind::UnexpectedCharacter);
        }
        header_end += 1;
    }

    let mut line_start = header_end;
    while let Some(newline) = rest[line_start..].find('\n') {
        line_start += newline + 1;
        let line = &rest[line_start..];
        let Some(after) = line.trim_start_matches(HORIZONTAL_SPACE).strip_prefix(label) else {
            continue;
        };
        if !after.starts_with(|c: char| c.is_ascii_alphanumeric() || c == '_') {
            lex.bump(rest.len() - after.len());
            return Ok(());
        }
    }
    lex.bump(rest.len());
    Err(LexErrorKind::Unterminated("heredoc label"))
}

/// Scan a line comment up to the line break or a closing tag, whichever
/// comes first. The closing tag is left for the next token.
fn line_comment(lex: &mut logos::Lexer<'_, LogosToken>) {
    let rest = lex.remainder();
    let line_end = rest.find(LINE_BREAK).unwrap_or(rest.len());
    let end = rest[..line_end].find("?>").unwrap_or(line_end);
    lex.bump(end);
}

/// Scan the rest of a block comment after its opening `/*` or `/**`.
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> Result<(), LexErrorKind> {
    // `/**/` matches the doc comment opener with the closing slash left over
    if lex.slice() == "/**" && lex.remainder().starts_with('/') {
        lex.bump(1);
        return Ok(());
    }
    match lex.remainder().find("*/") {
        Some(i) => {
            lex.bump(i + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::Unterminated("*/"))
        }
    }
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[token("//", line_comment)]
    #[token("#", line_comment)]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    #[token("/**", block_comment)]
    DocComment,

    #[token("?>")]
    CloseTag,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"\$[a-zA-Z_][a-zA-Z0-9_]*")]
    Variable,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[bB][01]+")]
    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[token("'", single_quoted)]
    #[token("\"", double_quoted)]
    #[token("<<<", heredoc)]
    String,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("...")]
    Ellipsis,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token(".=")]
    DotEq,
    #[token("%=")]
    PercentEq,
    #[token("??=")]
    QuestionQuestionEq,
    #[token("??")]
    QuestionQuestion,
    #[token("||")]
    PipePipe,
    #[token("&&")]
    AmpAmp,
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    #[token("<>")]
    BangEq,
    #[token("<=>")]
    LtEqGt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("**")]
    StarStar,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("\\")]
    Backslash,
    #[token("@")]
    At,
    #[token("=")]
    Eq,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("&")]
    Amp,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token(".")]
    Dot,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,

    // =========================================================================
    // KEYWORDS (case-insensitive, longest match wins in logos)
    // =========================================================================
    #[token("abstract", ignore(ascii_case))]
    AbstractKw,
    #[token("and", ignore(ascii_case))]
    AndKw,
    #[token("array", ignore(ascii_case))]
    ArrayKw,
    #[token("as", ignore(ascii_case))]
    AsKw,
    #[token("break", ignore(ascii_case))]
    BreakKw,
    #[token("case", ignore(ascii_case))]
    CaseKw,
    #[token("catch", ignore(ascii_case))]
    CatchKw,
    #[token("class", ignore(ascii_case))]
    ClassKw,
    #[token("clone", ignore(ascii_case))]
    CloneKw,
    #[token("const", ignore(ascii_case))]
    ConstKw,
    #[token("continue", ignore(ascii_case))]
    ContinueKw,
    #[token("default", ignore(ascii_case))]
    DefaultKw,
    #[token("do", ignore(ascii_case))]
    DoKw,
    #[token("echo", ignore(ascii_case))]
    EchoKw,
    #[token("else", ignore(ascii_case))]
    ElseKw,
    #[token("elseif", ignore(ascii_case))]
    ElseifKw,
    #[token("extends", ignore(ascii_case))]
    ExtendsKw,
    #[token("false", ignore(ascii_case))]
    FalseKw,
    #[token("final", ignore(ascii_case))]
    FinalKw,
    #[token("finally", ignore(ascii_case))]
    FinallyKw,
    #[token("for", ignore(ascii_case))]
    ForKw,
    #[token("foreach", ignore(ascii_case))]
    ForeachKw,
    #[token("function", ignore(ascii_case))]
    FunctionKw,
    #[token("global", ignore(ascii_case))]
    GlobalKw,
    #[token("if", ignore(ascii_case))]
    IfKw,
    #[token("implements", ignore(ascii_case))]
    ImplementsKw,
    #[token("include", ignore(ascii_case))]
    IncludeKw,
    #[token("include_once", ignore(ascii_case))]
    IncludeOnceKw,
    #[token("instanceof", ignore(ascii_case))]
    InstanceofKw,
    #[token("interface", ignore(ascii_case))]
    InterfaceKw,
    #[token("namespace", ignore(ascii_case))]
    NamespaceKw,
    #[token("new", ignore(ascii_case))]
    NewKw,
    #[token("null", ignore(ascii_case))]
    NullKw,
    #[token("or", ignore(ascii_case))]
    OrKw,
    #[token("print", ignore(ascii_case))]
    PrintKw,
    #[token("private", ignore(ascii_case))]
    PrivateKw,
    #[token("protected", ignore(ascii_case))]
    ProtectedKw,
    #[token("public", ignore(ascii_case))]
    PublicKw,
    #[token("require", ignore(ascii_case))]
    RequireKw,
    #[token("require_once", ignore(ascii_case))]
    RequireOnceKw,
    #[token("return", ignore(ascii_case))]
    ReturnKw,
    #[token("static", ignore(ascii_case))]
    StaticKw,
    #[token("switch", ignore(ascii_case))]
    SwitchKw,
    #[token("throw", ignore(ascii_case))]
    ThrowKw,
    #[token("trait", ignore(ascii_case))]
    TraitKw,
    #[token("true", ignore(ascii_case))]
    TrueKw,
    #[token("try", ignore(ascii_case))]
    TryKw,
    #[token("use", ignore(ascii_case))]
    UseKw,
    #[token("var", ignore(ascii_case))]
    VarKw,
    #[token("while", ignore(ascii_case))]
    WhileKw,
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            LineComment => TokenKind::LINE_COMMENT,
            BlockComment => TokenKind::BLOCK_COMMENT,
            DocComment => TokenKind::DOC_COMMENT,
            CloseTag => TokenKind::CLOSE_TAG,

            // Literals
            Variable => TokenKind::VARIABLE,
            Ident => TokenKind::IDENT,
            Integer => TokenKind::INTEGER,
            Float => TokenKind::FLOAT,
            String => TokenKind::STRING,

            // Multi-char punctuation
            ColonColon => TokenKind::COLON_COLON,
            Arrow => TokenKind::ARROW,
            FatArrow => TokenKind::FAT_ARROW,
            Ellipsis => TokenKind::ELLIPSIS,
            PlusEq => TokenKind::PLUS_EQ,
            MinusEq => TokenKind::MINUS_EQ,
            StarEq => TokenKind::STAR_EQ,
            SlashEq => TokenKind::SLASH_EQ,
            DotEq => TokenKind::DOT_EQ,
            PercentEq => TokenKind::PERCENT_EQ,
            QuestionQuestionEq => TokenKind::QUESTION_QUESTION_EQ,
            QuestionQuestion => TokenKind::QUESTION_QUESTION,
            PipePipe => TokenKind::PIPE_PIPE,
            AmpAmp => TokenKind::AMP_AMP,
            EqEqEq => TokenKind::EQ_EQ_EQ,
            BangEqEq => TokenKind::BANG_EQ_EQ,
            EqEq => TokenKind::EQ_EQ,
            BangEq => TokenKind::BANG_EQ,
            LtEqGt => TokenKind::LT_EQ_GT,
            LtEq => TokenKind::LT_EQ,
            GtEq => TokenKind::GT_EQ,
            LtLt => TokenKind::LT_LT,
            GtGt => TokenKind::GT_GT,
            StarStar => TokenKind::STAR_STAR,
            PlusPlus => TokenKind::PLUS_PLUS,
            MinusMinus => TokenKind::MINUS_MINUS,

            // Single-char punctuation
            LBrace => TokenKind::L_BRACE,
            RBrace => TokenKind::R_BRACE,
            LBracket => TokenKind::L_BRACKET,
            RBracket => TokenKind::R_BRACKET,
            LParen => TokenKind::L_PAREN,
            RParen => TokenKind::R_PAREN,
            Semicolon => TokenKind::SEMICOLON,
            Comma => TokenKind::COMMA,
            Colon => TokenKind::COLON,
            Backslash => TokenKind::BACKSLASH,
            At => TokenKind::AT,
            Eq => TokenKind::EQ,
            Question => TokenKind::QUESTION,
            Pipe => TokenKind::PIPE,
            Caret => TokenKind::CARET,
            Amp => TokenKind::AMP,
            Lt => TokenKind::LT,
            Gt => TokenKind::GT,
            Plus => TokenKind::PLUS,
            Minus => TokenKind::MINUS,
            Dot => TokenKind::DOT,
            Star => TokenKind::STAR,
            Slash => TokenKind::SLASH,
            Percent => TokenKind::PERCENT,
            Bang => TokenKind::BANG,
            Tilde => TokenKind::TILDE,

            // Keywords
            AbstractKw => TokenKind::ABSTRACT_KW,
            AndKw => TokenKind::AND_KW,
            ArrayKw => TokenKind::ARRAY_KW,
            AsKw => TokenKind::AS_KW,
            BreakKw => TokenKind::BREAK_KW,
            CaseKw => TokenKind::CASE_KW,
            CatchKw => TokenKind::CATCH_KW,
            ClassKw => TokenKind::CLASS_KW,
            CloneKw => TokenKind::CLONE_KW,
            ConstKw => TokenKind::CONST_KW,
            ContinueKw => TokenKind::CONTINUE_KW,
            DefaultKw => TokenKind::DEFAULT_KW,
            DoKw => TokenKind::DO_KW,
            EchoKw => TokenKind::ECHO_KW,
            ElseKw => TokenKind::ELSE_KW,
            ElseifKw => TokenKind::ELSEIF_KW,
            ExtendsKw => TokenKind::EXTENDS_KW,
            FalseKw => TokenKind::FALSE_KW,
            FinalKw => TokenKind::FINAL_KW,
            FinallyKw => TokenKind::FINALLY_KW,
            ForKw => TokenKind::FOR_KW,
            ForeachKw => TokenKind::FOREACH_KW,
            FunctionKw => TokenKind::FUNCTION_KW,
            GlobalKw => TokenKind::GLOBAL_KW,
            IfKw => TokenKind::IF_KW,
            ImplementsKw => TokenKind::IMPLEMENTS_KW,
            IncludeKw => TokenKind::INCLUDE_KW,
            IncludeOnceKw => TokenKind::INCLUDE_ONCE_KW,
            InstanceofKw => TokenKind::INSTANCEOF_KW,
            InterfaceKw => TokenKind::INTERFACE_KW,
            NamespaceKw => TokenKind::NAMESPACE_KW,
            NewKw => TokenKind::NEW_KW,
            NullKw => TokenKind::NULL_KW,
            OrKw => TokenKind::OR_KW,
            PrintKw => TokenKind::PRINT_KW,
            PrivateKw => TokenKind::PRIVATE_KW,
            ProtectedKw => TokenKind::PROTECTED_KW,
            PublicKw => TokenKind::PUBLIC_KW,
            RequireKw => TokenKind::REQUIRE_KW,
            RequireOnceKw => TokenKind::REQUIRE_ONCE_KW,
            ReturnKw => TokenKind::RETURN_KW,
            StaticKw => TokenKind::STATIC_KW,
            SwitchKw => TokenKind::SWITCH_KW,
            ThrowKw => TokenKind::THROW_KW,
            TraitKw => TokenKind::TRAIT_KW,
            TrueKw => TokenKind::TRUE_KW,
            TryKw => TokenKind::TRY_KW,
            UseKw => TokenKind::USE_KW,
            VarKw => TokenKind::VAR_KW,
            WhileKw => TokenKind::WHILE_KW,
        }
    }
}
