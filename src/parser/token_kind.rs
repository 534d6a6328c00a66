//! Token kinds produced by the lexer.
//!
//! This enum defines every lexical category the parser dispatches on.

/// All token kinds of the analyzed language
///
/// Trivia (comments) is kept in the stream so doc comments can be attached
/// to the declarations that follow them. Whitespace is dropped by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum TokenKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    LINE_COMMENT = 0,
    BLOCK_COMMENT,
    DOC_COMMENT, // /** ... */

    // =========================================================================
    // MARKUP
    // =========================================================================
    INLINE_HTML, // anything outside <?php ... ?>
    OPEN_TAG,    // <?php
    CLOSE_TAG,   // ?>

    // =========================================================================
    // LITERALS
    // =========================================================================
    VARIABLE, // $name
    IDENT,    // name
    INTEGER,  // 42, 0x2A, 0b101
    FLOAT,    // 42.23, 1e3
    STRING,   // 'single', "double", heredoc or nowdoc

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,     // {
    R_BRACE,     // }
    L_BRACKET,   // [
    R_BRACKET,   // ]
    L_PAREN,     // (
    R_PAREN,     // )
    SEMICOLON,   // ;
    COMMA,       // ,
    COLON,       // :
    COLON_COLON, // ::
    BACKSLASH,   // \
    ARROW,       // ->
    FAT_ARROW,   // =>
    ELLIPSIS,    // ...
    AT,          // @

    // =========================================================================
    // OPERATORS
    // =========================================================================
    EQ,                   // =
    PLUS_EQ,              // +=
    MINUS_EQ,             // -=
    STAR_EQ,              // *=
    SLASH_EQ,             // /=
    DOT_EQ,               // .=
    PERCENT_EQ,           // %=
    QUESTION_QUESTION_EQ, // ??=
    QUESTION,             // ?
    QUESTION_QUESTION,    // ??
    PIPE_PIPE,            // ||
    AMP_AMP,              // &&
    PIPE,                 // |
    CARET,                // ^
    AMP,                  // &
    EQ_EQ,                // ==
    BANG_EQ,              // !=
    EQ_EQ_EQ,             // ===
    BANG_EQ_EQ,           // !==
    LT,                   // <
    GT,                   // >
    LT_EQ,                // <=
    GT_EQ,                // >=
    LT_EQ_GT,             // <=>
    LT_LT,                // <<
    GT_GT,                // >>
    PLUS,                 // +
    MINUS,                // -
    DOT,                  // .
    STAR,                 // *
    SLASH,                // /
    PERCENT,              // %
    STAR_STAR,            // **
    BANG,                 // !
    TILDE,                // ~
    PLUS_PLUS,            // ++
    MINUS_MINUS,          // --

    // =========================================================================
    // KEYWORDS (case-insensitive)
    // =========================================================================
    ABSTRACT_KW,
    AND_KW,
    ARRAY_KW,
    AS_KW,
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CLASS_KW,
    CLONE_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DO_KW,
    ECHO_KW,
    ELSE_KW,
    ELSEIF_KW,
    EXTENDS_KW,
    FALSE_KW,
    FINAL_KW,
    FINALLY_KW,
    FOR_KW,
    FOREACH_KW,
    FUNCTION_KW,
    GLOBAL_KW,
    IF_KW,
    IMPLEMENTS_KW,
    INCLUDE_KW,
    INCLUDE_ONCE_KW,
    INSTANCEOF_KW,
    INTERFACE_KW,
    NAMESPACE_KW,
    NEW_KW,
    NULL_KW,
    OR_KW,
    PRINT_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    PUBLIC_KW,
    REQUIRE_KW,
    REQUIRE_ONCE_KW,
    RETURN_KW,
    STATIC_KW,
    SWITCH_KW,
    THROW_KW,
    TRAIT_KW,
    TRUE_KW,
    TRY_KW,
    USE_KW,
    VAR_KW,
    WHILE_KW,
}

impl TokenKind {
    /// Check if this is a trivia token (comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::DOC_COMMENT | Self::INLINE_HTML
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::ABSTRACT_KW as u16) && (self as u16) <= (Self::WHILE_KW as u16)
    }

    /// Check if this token starts a literal expression
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER
                | Self::FLOAT
                | Self::STRING
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::NULL_KW
        )
    }

    /// Check if this is an assignment operator
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            Self::EQ
                | Self::PLUS_EQ
                | Self::MINUS_EQ
                | Self::STAR_EQ
                | Self::SLASH_EQ
                | Self::DOT_EQ
                | Self::PERCENT_EQ
                | Self::QUESTION_QUESTION_EQ
        )
    }

    /// Check if this is a member modifier (visibility, `static`, `abstract`, `final`)
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::PUBLIC_KW
                | Self::PROTECTED_KW
                | Self::PRIVATE_KW
                | Self::STATIC_KW
                | Self::ABSTRACT_KW
                | Self::FINAL_KW
                | Self::VAR_KW
        )
    }

    /// Check if the token can be used as a name segment (identifiers and,
    /// in qualified names and member positions, keywords)
    pub fn is_name(self) -> bool {
        self == Self::IDENT || self.is_keyword()
    }
}
