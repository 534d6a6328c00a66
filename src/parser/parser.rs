//! Recursive descent parser
//!
//! Builds a position-tracked [`Node`] tree from the token stream. There is
//! no error recovery: the first error ends the parse and no partial tree is
//! returned. Every node's span runs from its first to its last consumed
//! token.

use smol_str::SmolStr;

use super::ast::{LiteralKind, Modifiers, Node, NodeKind, SourceFile};
use super::errors::ParseError;
use super::lexer::Token;
use super::token_kind::TokenKind;
use super::token_stream::TokenStream;
use crate::base::constants::DEFAULT_NESTING_LIMIT;
use crate::base::{Position, Span};

type PResult<T> = Result<T, ParseError>;

/// Parse result holding the root of one file's tree
#[derive(Debug, Clone, PartialEq)]
pub struct Parse {
    root: Node,
}

impl Parse {
    /// Get the root node
    pub fn syntax(&self) -> &Node {
        &self.root
    }

    /// Get the typed root
    pub fn source_file(&self) -> SourceFile<'_> {
        SourceFile(&self.root)
    }

    pub fn into_syntax(self) -> Node {
        self.root
    }
}

/// Parse source code with the default nesting limit
pub fn parse(input: &str) -> PResult<Parse> {
    parse_with_nesting_limit(input, DEFAULT_NESTING_LIMIT)
}

/// Parse source code, failing when constructs nest deeper than `limit`
pub fn parse_with_nesting_limit(input: &str, limit: usize) -> PResult<Parse> {
    let mut parser = Parser::new(input, limit);
    let mut root = parser.parse_source_file()?;
    root.assign_ids(&mut 0);
    Ok(Parse { root })
}

/// The parser state
struct Parser<'a> {
    stream: TokenStream<'a>,
    depth: usize,
    nesting_limit: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, nesting_limit: usize) -> Self {
        Self {
            stream: TokenStream::new(input),
            depth: 0,
            nesting_limit,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn nth(&mut self, n: usize) -> Option<TokenKind> {
        self.stream.peek(n).map(|l| l.token.kind)
    }

    fn current_kind(&mut self) -> Option<TokenKind> {
        self.nth(0)
    }

    fn at(&mut self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    fn at_eof(&mut self) -> bool {
        self.current_kind().is_none()
    }

    fn current_span(&mut self) -> PResult<Span> {
        match self.stream.peek(0) {
            Some(lexeme) => Ok(lexeme.token.span),
            None => Err(self.stream.end_error()),
        }
    }

    fn current_doc(&mut self) -> Option<SmolStr> {
        self.stream.peek(0).and_then(|l| l.doc).map(SmolStr::new)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> PResult<Token<'a>> {
        self.stream
            .bump()
            .map(|l| l.token)
            .ok_or_else(|| self.stream.end_error())
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        if self.at(kind) {
            self.stream.bump().map(|l| l.token)
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> PResult<Token<'a>> {
        if self.at(kind) {
            self.bump()
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// `;`, or a closing tag which ends a statement implicitly.
    fn expect_terminator(&mut self) -> PResult<Span> {
        match self.current_kind() {
            Some(TokenKind::SEMICOLON | TokenKind::CLOSE_TAG) => Ok(self.bump()?.span),
            _ => Err(self.unexpected("';'")),
        }
    }

    /// An identifier, or a keyword where the grammar allows it as a name.
    fn expect_name(&mut self, allow_keywords: bool) -> PResult<Token<'a>> {
        match self.current_kind() {
            Some(TokenKind::IDENT) => self.bump(),
            Some(kind) if allow_keywords && kind.is_keyword() => self.bump(),
            _ => Err(self.unexpected("identifier")),
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn unexpected(&mut self, expected: &str) -> ParseError {
        match self.stream.peek(0) {
            Some(lexeme) => ParseError::syntax(
                lexeme.token.span.start,
                format!("'{}'", lexeme.token.text),
                expected,
            ),
            None => self.stream.end_error(),
        }
    }

    /// Run `f` one nesting level deeper, enforcing the nesting limit.
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.nesting_limit {
            let position = match self.stream.peek(0) {
                Some(lexeme) => lexeme.token.span.start,
                None => self.stream.last_position(),
            };
            return Err(ParseError::NestingLimit {
                position,
                limit: self.nesting_limit,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    // =========================================================================
    // Files and namespaces
    // =========================================================================

    /// SourceFile = (Namespace | Statement)*
    fn parse_source_file(&mut self) -> PResult<Node> {
        let mut children = Vec::new();
        while !self.at_eof() {
            if self.at(TokenKind::NAMESPACE_KW) && self.nth(1) != Some(TokenKind::BACKSLASH) {
                children.push(self.parse_namespace()?);
            } else {
                self.parse_top_statement(&mut children)?;
            }
        }
        if let Some(error) = self.stream.lex_error() {
            return Err(ParseError::from(error.clone()));
        }

        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => first.span().to(last.span()),
            _ => {
                let end = self.stream.last_position();
                Span::new(Position::default(), end)
            }
        };
        Ok(Node::new(NodeKind::SourceFile, span).with_children(children))
    }

    /// Namespace = 'namespace' Name? ( '{' Statement* '}' | ';' Statement* )
    fn parse_namespace(&mut self) -> PResult<Node> {
        let keyword = self.expect(TokenKind::NAMESPACE_KW, "'namespace'")?;
        let name = if self.at(TokenKind::L_BRACE) {
            SmolStr::default()
        } else {
            self.parse_qualified_name()?.0
        };
        let name = SmolStr::new(name.trim_start_matches('\\'));

        let mut members = Vec::new();
        let end = if self.eat(TokenKind::L_BRACE).is_some() {
            while !self.at(TokenKind::R_BRACE) {
                if self.at_eof() {
                    return Err(self.stream.end_error());
                }
                self.parse_top_statement(&mut members)?;
            }
            self.bump()?.span
        } else {
            let terminator = self.expect_terminator()?;
            while !self.at_eof() && !self.at(TokenKind::NAMESPACE_KW) {
                self.parse_top_statement(&mut members)?;
            }
            members.last().map_or(terminator, |m| m.span())
        };

        Ok(Node::new(NodeKind::Namespace, keyword.span.to(end))
            .with_image(name)
            .with_children(members))
    }

    /// Statements allowed only outside of function bodies.
    fn parse_top_statement(&mut self, into: &mut Vec<Node>) -> PResult<()> {
        match self.current_kind() {
            Some(TokenKind::USE_KW) => self.parse_use(into),
            Some(TokenKind::CONST_KW) => {
                let doc = self.current_doc();
                let start = self.bump()?.span;
                self.parse_constant_list(start, doc, into)
            }
            _ => {
                if let Some(statement) = self.parse_statement()? {
                    into.push(statement);
                }
                Ok(())
            }
        }
    }

    /// Use = 'use' ('function' | 'const')? UseClause (',' UseClause)* ';'
    fn parse_use(&mut self, into: &mut Vec<Node>) -> PResult<()> {
        self.expect(TokenKind::USE_KW, "'use'")?;
        if self.at(TokenKind::FUNCTION_KW) || self.at(TokenKind::CONST_KW) {
            self.bump()?;
        }
        loop {
            let (target, mut span) = self.parse_qualified_name()?;
            let mut children = Vec::new();
            if self.eat(TokenKind::AS_KW).is_some() {
                let alias = self.expect_name(false)?;
                span = span.to(alias.span);
                children.push(Node::new(NodeKind::Identifier, alias.span).with_image(alias.text));
            }
            into.push(
                Node::new(NodeKind::UseDeclaration, span)
                    .with_image(target.trim_start_matches('\\'))
                    .with_children(children),
            );
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        self.expect_terminator()?;
        Ok(())
    }

    /// QualifiedName = '\'? Name ('\' Name)*
    fn parse_qualified_name(&mut self) -> PResult<(SmolStr, Span)> {
        let mut text = String::new();
        let start = self.current_span()?;
        let mut end = start;

        if let Some(separator) = self.eat(TokenKind::BACKSLASH) {
            text.push_str(separator.text);
        }
        let first = self.expect_name(true)?;
        text.push_str(first.text);
        end = end.to(first.span);

        while self.at(TokenKind::BACKSLASH) && self.nth(1).is_some_and(TokenKind::is_name) {
            text.push_str(self.bump()?.text);
            let segment = self.bump()?;
            text.push_str(segment.text);
            end = end.to(segment.span);
        }
        Ok((SmolStr::new(text), start.to(end)))
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    /// Class = ('abstract' | 'final')* 'class' Name Extends? Implements? ClassBody
    fn parse_class(&mut self) -> PResult<Node> {
        let doc = self.current_doc();
        let start = self.current_span()?;
        let mut modifiers = Modifiers::empty();
        loop {
            if self.eat(TokenKind::ABSTRACT_KW).is_some() {
                modifiers.insert(Modifiers::ABSTRACT);
            } else if self.eat(TokenKind::FINAL_KW).is_some() {
                modifiers.insert(Modifiers::FINAL);
            } else {
                break;
            }
        }
        self.expect(TokenKind::CLASS_KW, "'class'")?;
        let name = self.expect_name(false)?;

        let mut children = Vec::new();
        if self.eat(TokenKind::EXTENDS_KW).is_some() {
            children.push(self.parse_type_reference(NodeKind::ParentClass)?);
        }
        if self.eat(TokenKind::IMPLEMENTS_KW).is_some() {
            self.parse_type_reference_list(NodeKind::ImplementedInterface, &mut children)?;
        }
        let end = self.parse_type_body(&mut children)?;

        Ok(Node::new(NodeKind::Class, start.to(end))
            .with_image(name.text)
            .with_modifiers(modifiers)
            .with_doc_comment(doc)
            .with_children(children))
    }

    /// Interface = 'interface' Name ('extends' NameList)? ClassBody
    fn parse_interface(&mut self) -> PResult<Node> {
        let doc = self.current_doc();
        let start = self.expect(TokenKind::INTERFACE_KW, "'interface'")?.span;
        let name = self.expect_name(false)?;

        let mut children = Vec::new();
        if self.eat(TokenKind::EXTENDS_KW).is_some() {
            self.parse_type_reference_list(NodeKind::ParentClass, &mut children)?;
        }
        let end = self.parse_type_body(&mut children)?;

        Ok(Node::new(NodeKind::Interface, start.to(end))
            .with_image(name.text)
            .with_doc_comment(doc)
            .with_children(children))
    }

    /// Trait = 'trait' Name ClassBody
    fn parse_trait(&mut self) -> PResult<Node> {
        let doc = self.current_doc();
        let start = self.expect(TokenKind::TRAIT_KW, "'trait'")?.span;
        let name = self.expect_name(false)?;

        let mut children = Vec::new();
        let end = self.parse_type_body(&mut children)?;

        Ok(Node::new(NodeKind::Trait, start.to(end))
            .with_image(name.text)
            .with_doc_comment(doc)
            .with_children(children))
    }

    fn parse_type_reference(&mut self, kind: NodeKind) -> PResult<Node> {
        let (name, span) = self.parse_qualified_name()?;
        Ok(Node::new(kind, span).with_image(name))
    }

    fn parse_type_reference_list(&mut self, kind: NodeKind, into: &mut Vec<Node>) -> PResult<()> {
        loop {
            into.push(self.parse_type_reference(kind)?);
            if self.eat(TokenKind::COMMA).is_none() {
                return Ok(());
            }
        }
    }

    /// ClassBody = '{' Member* '}'; returns the closing brace span.
    fn parse_type_body(&mut self, into: &mut Vec<Node>) -> PResult<Span> {
        self.expect(TokenKind::L_BRACE, "'{'")?;
        while !self.at(TokenKind::R_BRACE) {
            if self.at_eof() {
                return Err(self.stream.end_error());
            }
            self.nested(|p| p.parse_member(into))?;
        }
        Ok(self.bump()?.span)
    }

    /// Member = TraitUse | Modifier* (Constants | Method | Properties)
    fn parse_member(&mut self, into: &mut Vec<Node>) -> PResult<()> {
        let doc = self.current_doc();
        let start = self.current_span()?;

        if self.at(TokenKind::USE_KW) {
            return self.parse_use(into);
        }

        let modifiers = self.parse_modifiers()?;
        match self.current_kind() {
            Some(TokenKind::CONST_KW) => {
                self.bump()?;
                self.parse_constant_list(start, doc, into)
            }
            Some(TokenKind::FUNCTION_KW) => {
                into.push(self.parse_method(start, modifiers, doc)?);
                Ok(())
            }
            Some(TokenKind::VARIABLE) if !modifiers.is_empty() => {
                self.parse_property_list(start, modifiers, doc, None, into)
            }
            Some(TokenKind::IDENT | TokenKind::BACKSLASH | TokenKind::QUESTION | TokenKind::ARRAY_KW)
                if !modifiers.is_empty() =>
            {
                let hint = self.parse_type_hint()?;
                self.parse_property_list(start, modifiers, doc, Some(hint), into)
            }
            _ => Err(self.unexpected("class member")),
        }
    }

    fn parse_modifiers(&mut self) -> PResult<Modifiers> {
        let mut modifiers = Modifiers::empty();
        while let Some(kind) = self.current_kind().filter(|k| k.is_modifier()) {
            // `static::` and `static function` closures are not modifiers
            if kind == TokenKind::STATIC_KW && self.nth(1) == Some(TokenKind::COLON_COLON) {
                break;
            }
            self.bump()?;
            modifiers.insert(match kind {
                TokenKind::PUBLIC_KW | TokenKind::VAR_KW => Modifiers::PUBLIC,
                TokenKind::PROTECTED_KW => Modifiers::PROTECTED,
                TokenKind::PRIVATE_KW => Modifiers::PRIVATE,
                TokenKind::STATIC_KW => Modifiers::STATIC,
                TokenKind::ABSTRACT_KW => Modifiers::ABSTRACT,
                _ => Modifiers::FINAL,
            });
        }
        Ok(modifiers)
    }

    /// Method = 'function' '&'? Name Parameters ReturnType? (Block | ';')
    fn parse_method(&mut self, start: Span, modifiers: Modifiers, doc: Option<SmolStr>) -> PResult<Node> {
        self.expect(TokenKind::FUNCTION_KW, "'function'")?;
        self.eat(TokenKind::AMP);
        let name = self.expect_name(true)?;

        let mut children = Vec::new();
        self.parse_parameters(&mut children)?;
        self.parse_return_type(&mut children)?;
        let end = if self.at(TokenKind::L_BRACE) {
            let body = self.parse_block()?;
            let end = body.span();
            children.push(body);
            end
        } else {
            self.expect_terminator()?
        };

        Ok(Node::new(NodeKind::Method, start.to(end))
            .with_image(name.text)
            .with_modifiers(modifiers)
            .with_doc_comment(doc)
            .with_children(children))
    }

    /// Constants = 'const' Name '=' Expression (',' Name '=' Expression)* ';'
    fn parse_constant_list(&mut self, start: Span, doc: Option<SmolStr>, into: &mut Vec<Node>) -> PResult<()> {
        let mut first = true;
        loop {
            let name = self.expect_name(true)?;
            self.expect(TokenKind::EQ, "'='")?;
            let value = self.parse_expression()?;
            let span = if first { start } else { name.span }.to(value.span());
            into.push(
                Node::new(NodeKind::Constant, span)
                    .with_image(name.text)
                    .with_doc_comment(if first { doc.clone() } else { None })
                    .with_children(vec![value]),
            );
            first = false;
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        self.expect_terminator()?;
        Ok(())
    }

    /// Properties = Variable ('=' Expression)? (',' Variable ('=' Expression)?)* ';'
    fn parse_property_list(
        &mut self,
        start: Span,
        modifiers: Modifiers,
        doc: Option<SmolStr>,
        hint: Option<Node>,
        into: &mut Vec<Node>,
    ) -> PResult<()> {
        let mut first = true;
        loop {
            let variable = self.expect(TokenKind::VARIABLE, "variable")?;
            let mut children: Vec<Node> = hint.iter().cloned().collect();
            let mut end = variable.span;
            if self.eat(TokenKind::EQ).is_some() {
                let value = self.parse_expression()?;
                end = value.span();
                children.push(value);
            }
            let span = if first { start } else { variable.span }.to(end);
            into.push(
                Node::new(NodeKind::Property, span)
                    .with_image(variable.text)
                    .with_modifiers(modifiers)
                    .with_doc_comment(if first { doc.clone() } else { None })
                    .with_children(children),
            );
            first = false;
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        self.expect_terminator()?;
        Ok(())
    }

    // =========================================================================
    // Functions and parameters
    // =========================================================================

    /// Function = 'function' '&'? Name Parameters ReturnType? Block
    fn parse_function(&mut self) -> PResult<Node> {
        let doc = self.current_doc();
        let start = self.expect(TokenKind::FUNCTION_KW, "'function'")?.span;
        self.eat(TokenKind::AMP);
        let name = self.expect_name(false)?;

        let mut children = Vec::new();
        self.parse_parameters(&mut children)?;
        self.parse_return_type(&mut children)?;
        let body = self.parse_block()?;
        let end = body.span();
        children.push(body);

        Ok(Node::new(NodeKind::Function, start.to(end))
            .with_image(name.text)
            .with_doc_comment(doc)
            .with_children(children))
    }

    /// Closure = 'static'? 'function' '&'? Parameters ('use' '(' Variables ')')? ReturnType? Block
    fn parse_closure(&mut self) -> PResult<Node> {
        let start = self.current_span()?;
        self.eat(TokenKind::STATIC_KW);
        self.expect(TokenKind::FUNCTION_KW, "'function'")?;
        self.eat(TokenKind::AMP);

        let mut children = Vec::new();
        self.parse_parameters(&mut children)?;
        if self.eat(TokenKind::USE_KW).is_some() {
            self.expect(TokenKind::L_PAREN, "'('")?;
            while !self.at(TokenKind::R_PAREN) {
                self.eat(TokenKind::AMP);
                let variable = self.expect(TokenKind::VARIABLE, "variable")?;
                children.push(Node::new(NodeKind::Variable, variable.span).with_image(variable.text));
                if self.eat(TokenKind::COMMA).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::R_PAREN, "')'")?;
        }
        self.parse_return_type(&mut children)?;
        let body = self.parse_block()?;
        let end = body.span();
        children.push(body);

        Ok(Node::new(NodeKind::Closure, start.to(end)).with_children(children))
    }

    /// Parameters = '(' (Parameter (',' Parameter)* ','?)? ')'
    fn parse_parameters(&mut self, into: &mut Vec<Node>) -> PResult<()> {
        self.expect(TokenKind::L_PAREN, "'('")?;
        while !self.at(TokenKind::R_PAREN) {
            into.push(self.parse_parameter()?);
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        self.expect(TokenKind::R_PAREN, "')'")?;
        Ok(())
    }

    /// Parameter = Modifier* TypeHint? '&'? '...'? Variable ('=' Expression)?
    fn parse_parameter(&mut self) -> PResult<Node> {
        let start = self.current_span()?;
        // constructor promotion
        self.parse_modifiers()?;

        let mut children = Vec::new();
        if !matches!(
            self.current_kind(),
            Some(TokenKind::VARIABLE | TokenKind::AMP | TokenKind::ELLIPSIS)
        ) {
            children.push(self.parse_type_hint()?);
        }
        self.eat(TokenKind::AMP);
        self.eat(TokenKind::ELLIPSIS);
        let variable = self.expect(TokenKind::VARIABLE, "variable")?;
        let mut end = variable.span;
        if self.eat(TokenKind::EQ).is_some() {
            let default = self.parse_expression()?;
            end = default.span();
            children.push(default);
        }

        Ok(Node::new(NodeKind::Parameter, start.to(end))
            .with_image(variable.text)
            .with_children(children))
    }

    /// ReturnType = ':' TypeHint
    fn parse_return_type(&mut self, into: &mut Vec<Node>) -> PResult<()> {
        if self.eat(TokenKind::COLON).is_some() {
            into.push(self.parse_type_hint()?);
        }
        Ok(())
    }

    /// TypeHint = '?'? TypeName ('|' TypeName)*
    fn parse_type_hint(&mut self) -> PResult<Node> {
        let start = self.current_span()?;
        let mut text = String::new();
        if let Some(question) = self.eat(TokenKind::QUESTION) {
            text.push_str(question.text);
        }
        let mut end = start;
        loop {
            let (name, span) = match self.current_kind() {
                Some(TokenKind::ARRAY_KW | TokenKind::STATIC_KW | TokenKind::NULL_KW | TokenKind::FALSE_KW) => {
                    let token = self.bump()?;
                    (SmolStr::new(token.text), token.span)
                }
                _ => self.parse_qualified_name()?,
            };
            text.push_str(&name);
            end = end.to(span);
            match self.eat(TokenKind::PIPE) {
                Some(pipe) => text.push_str(pipe.text),
                None => break,
            }
        }
        Ok(Node::new(NodeKind::TypeHint, start.to(end)).with_image(text))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Statement; `None` for empty statements and closing tags.
    fn parse_statement(&mut self) -> PResult<Option<Node>> {
        self.nested(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> PResult<Option<Node>> {
        let Some(kind) = self.current_kind() else {
            return Err(self.stream.end_error());
        };
        let node = match kind {
            TokenKind::SEMICOLON | TokenKind::CLOSE_TAG => {
                self.bump()?;
                return Ok(None);
            }
            TokenKind::L_BRACE => self.parse_block()?,
            TokenKind::IF_KW => self.parse_if()?,
            TokenKind::WHILE_KW => self.parse_while()?,
            TokenKind::DO_KW => self.parse_do_while()?,
            TokenKind::SWITCH_KW => self.parse_switch()?,
            TokenKind::FOR_KW => self.parse_for()?,
            TokenKind::FOREACH_KW => self.parse_foreach()?,
            TokenKind::TRY_KW => self.parse_try()?,
            TokenKind::RETURN_KW => self.parse_return()?,
            TokenKind::THROW_KW => self.parse_throw()?,
            TokenKind::ECHO_KW => self.parse_echo()?,
            TokenKind::BREAK_KW => self.parse_jump(NodeKind::Break)?,
            TokenKind::CONTINUE_KW => self.parse_jump(NodeKind::Continue)?,
            TokenKind::GLOBAL_KW => self.parse_global()?,
            TokenKind::STATIC_KW if self.nth(1) == Some(TokenKind::VARIABLE) => {
                self.parse_static_variables()?
            }
            TokenKind::ABSTRACT_KW | TokenKind::FINAL_KW | TokenKind::CLASS_KW => self.parse_class()?,
            TokenKind::INTERFACE_KW => self.parse_interface()?,
            TokenKind::TRAIT_KW => self.parse_trait()?,
            TokenKind::FUNCTION_KW if self.nth(1).is_some_and(|k| k == TokenKind::IDENT)
                || (self.nth(1) == Some(TokenKind::AMP) && self.nth(2) == Some(TokenKind::IDENT)) =>
            {
                self.parse_function()?
            }
            _ => self.parse_expression_statement()?,
        };
        Ok(Some(node))
    }

    /// Block = '{' Statement* '}'
    fn parse_block(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::L_BRACE, "'{'")?.span;
        let mut children = Vec::new();
        while !self.at(TokenKind::R_BRACE) {
            if self.at_eof() {
                return Err(self.stream.end_error());
            }
            if let Some(statement) = self.parse_statement()? {
                children.push(statement);
            }
        }
        let end = self.bump()?.span;
        Ok(Node::new(NodeKind::Block, start.to(end)).with_children(children))
    }

    /// Body of a control structure; an empty statement becomes an empty block.
    fn parse_body(&mut self) -> PResult<Node> {
        let start = self.current_span()?;
        match self.parse_statement()? {
            Some(statement) => Ok(statement),
            None => Ok(Node::new(NodeKind::Block, start)),
        }
    }

    fn parse_parenthesized(&mut self) -> PResult<Node> {
        self.expect(TokenKind::L_PAREN, "'('")?;
        let expression = self.parse_expression()?;
        self.expect(TokenKind::R_PAREN, "')'")?;
        Ok(expression)
    }

    /// If = 'if' '(' Expression ')' Statement ElseIf* Else?
    fn parse_if(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::IF_KW, "'if'")?.span;
        let condition = self.parse_parenthesized()?;
        let then_branch = self.parse_body()?;
        let mut end = then_branch.span();
        let mut children = vec![condition, then_branch];

        while let Some(keyword) = self.eat(TokenKind::ELSEIF_KW) {
            let condition = self.parse_parenthesized()?;
            let body = self.parse_body()?;
            end = body.span();
            children.push(
                Node::new(NodeKind::ElseIf, keyword.span.to(end)).with_children(vec![condition, body]),
            );
        }
        if let Some(keyword) = self.eat(TokenKind::ELSE_KW) {
            let body = self.parse_body()?;
            end = body.span();
            children.push(Node::new(NodeKind::Else, keyword.span.to(end)).with_children(vec![body]));
        }

        Ok(Node::new(NodeKind::If, start.to(end)).with_children(children))
    }

    /// While = 'while' '(' Expression ')' Statement
    fn parse_while(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::WHILE_KW, "'while'")?.span;
        let condition = self.parse_parenthesized()?;
        let body = self.parse_body()?;
        Ok(Node::new(NodeKind::While, start.to(body.span())).with_children(vec![condition, body]))
    }

    /// DoWhile = 'do' Statement 'while' '(' Expression ')' ';'
    fn parse_do_while(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::DO_KW, "'do'")?.span;
        let body = self.parse_body()?;
        self.expect(TokenKind::WHILE_KW, "'while'")?;
        let condition = self.parse_parenthesized()?;
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::DoWhile, start.to(end)).with_children(vec![body, condition]))
    }

    /// For = 'for' '(' Expressions? ';' Expressions? ';' Expressions? ')' Statement
    fn parse_for(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::FOR_KW, "'for'")?.span;
        self.expect(TokenKind::L_PAREN, "'('")?;
        let mut children = Vec::new();
        for terminator in [TokenKind::SEMICOLON, TokenKind::SEMICOLON, TokenKind::R_PAREN] {
            while !self.at(terminator) {
                children.push(self.parse_expression()?);
                if self.eat(TokenKind::COMMA).is_none() {
                    break;
                }
            }
            self.expect(terminator, if terminator == TokenKind::R_PAREN { "')'" } else { "';'" })?;
        }
        let body = self.parse_body()?;
        let end = body.span();
        children.push(body);
        Ok(Node::new(NodeKind::For, start.to(end)).with_children(children))
    }

    /// Foreach = 'foreach' '(' Expression 'as' ('&'? Expression '=>')? '&'? Expression ')' Statement
    fn parse_foreach(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::FOREACH_KW, "'foreach'")?.span;
        self.expect(TokenKind::L_PAREN, "'('")?;
        let mut children = vec![self.parse_expression()?];
        self.expect(TokenKind::AS_KW, "'as'")?;
        self.eat(TokenKind::AMP);
        children.push(self.parse_expression()?);
        if self.eat(TokenKind::FAT_ARROW).is_some() {
            self.eat(TokenKind::AMP);
            children.push(self.parse_expression()?);
        }
        self.expect(TokenKind::R_PAREN, "')'")?;
        let body = self.parse_body()?;
        let end = body.span();
        children.push(body);
        Ok(Node::new(NodeKind::Foreach, start.to(end)).with_children(children))
    }

    /// Switch = 'switch' '(' Expression ')' '{' SwitchCase* '}'
    fn parse_switch(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::SWITCH_KW, "'switch'")?.span;
        let mut children = vec![self.parse_parenthesized()?];
        self.expect(TokenKind::L_BRACE, "'{'")?;
        while !self.at(TokenKind::R_BRACE) {
            children.push(self.nested(|p| p.parse_switch_case())?);
        }
        let end = self.bump()?.span;
        Ok(Node::new(NodeKind::Switch, start.to(end)).with_children(children))
    }

    /// SwitchCase = ('case' Expression | 'default') (':' | ';') Statement*
    fn parse_switch_case(&mut self) -> PResult<Node> {
        let (kind, keyword, mut children) = match self.current_kind() {
            Some(TokenKind::CASE_KW) => {
                let keyword = self.bump()?;
                (NodeKind::Case, keyword, vec![self.parse_expression()?])
            }
            Some(TokenKind::DEFAULT_KW) => (NodeKind::DefaultCase, self.bump()?, Vec::new()),
            Some(_) => return Err(self.unexpected("'case' or 'default'")),
            None => return Err(self.stream.end_error()),
        };
        let mut end = match self.current_kind() {
            Some(TokenKind::COLON | TokenKind::SEMICOLON) => self.bump()?.span,
            _ => return Err(self.unexpected("':'")),
        };

        while !matches!(
            self.current_kind(),
            Some(TokenKind::CASE_KW | TokenKind::DEFAULT_KW | TokenKind::R_BRACE)
        ) {
            if self.at_eof() {
                return Err(self.stream.end_error());
            }
            if let Some(statement) = self.parse_statement()? {
                end = statement.span();
                children.push(statement);
            }
        }
        Ok(Node::new(kind, keyword.span.to(end)).with_children(children))
    }

    /// Try = 'try' Block Catch* Finally?
    fn parse_try(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::TRY_KW, "'try'")?.span;
        let body = self.parse_block()?;
        let mut end = body.span();
        let mut children = vec![body];

        while let Some(keyword) = self.eat(TokenKind::CATCH_KW) {
            self.expect(TokenKind::L_PAREN, "'('")?;
            let mut catch_children = Vec::new();
            loop {
                catch_children.push(self.parse_type_reference(NodeKind::TypeHint)?);
                if self.eat(TokenKind::PIPE).is_none() {
                    break;
                }
            }
            if let Some(variable) = self.eat(TokenKind::VARIABLE) {
                catch_children.push(Node::new(NodeKind::Variable, variable.span).with_image(variable.text));
            }
            self.expect(TokenKind::R_PAREN, "')'")?;
            let block = self.parse_block()?;
            end = block.span();
            catch_children.push(block);
            children.push(Node::new(NodeKind::Catch, keyword.span.to(end)).with_children(catch_children));
        }
        if let Some(keyword) = self.eat(TokenKind::FINALLY_KW) {
            let block = self.parse_block()?;
            end = block.span();
            children.push(Node::new(NodeKind::Finally, keyword.span.to(end)).with_children(vec![block]));
        }
        if children.len() == 1 {
            return Err(self.unexpected("'catch' or 'finally'"));
        }

        Ok(Node::new(NodeKind::Try, start.to(end)).with_children(children))
    }

    /// Return = 'return' Expression? ';'
    fn parse_return(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::RETURN_KW, "'return'")?.span;
        let mut children = Vec::new();
        if !matches!(
            self.current_kind(),
            Some(TokenKind::SEMICOLON | TokenKind::CLOSE_TAG)
        ) {
            children.push(self.parse_expression()?);
        }
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::Return, start.to(end)).with_children(children))
    }

    /// Throw = 'throw' Expression ';'
    fn parse_throw(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::THROW_KW, "'throw'")?.span;
        let expression = self.parse_expression()?;
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::Throw, start.to(end)).with_children(vec![expression]))
    }

    /// Echo = 'echo' Expression (',' Expression)* ';'
    fn parse_echo(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::ECHO_KW, "'echo'")?.span;
        let mut children = vec![self.parse_expression()?];
        while self.eat(TokenKind::COMMA).is_some() {
            children.push(self.parse_expression()?);
        }
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::Echo, start.to(end)).with_children(children))
    }

    /// Jump = ('break' | 'continue') Integer? ';'
    fn parse_jump(&mut self, kind: NodeKind) -> PResult<Node> {
        let keyword = self.bump()?;
        let mut children = Vec::new();
        if self.at(TokenKind::INTEGER) {
            children.push(self.parse_literal()?);
        }
        let end = self.expect_terminator()?;
        Ok(Node::new(kind, keyword.span.to(end)).with_children(children))
    }

    /// Global = 'global' Variable (',' Variable)* ';'
    fn parse_global(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::GLOBAL_KW, "'global'")?.span;
        let mut children = Vec::new();
        loop {
            let variable = self.expect(TokenKind::VARIABLE, "variable")?;
            children.push(Node::new(NodeKind::Variable, variable.span).with_image(variable.text));
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::Global, start.to(end)).with_children(children))
    }

    /// StaticVariables = 'static' Variable ('=' Expression)? (',' Variable ('=' Expression)?)* ';'
    ///
    /// A variable with an initializer becomes an assignment node.
    fn parse_static_variables(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::STATIC_KW, "'static'")?.span;
        let mut children = Vec::new();
        loop {
            let token = self.expect(TokenKind::VARIABLE, "variable")?;
            let variable = Node::new(NodeKind::Variable, token.span).with_image(token.text);
            children.push(match self.eat(TokenKind::EQ) {
                Some(operator) => {
                    let value = self.parse_expression()?;
                    binary(NodeKind::Assignment, operator.text, variable, value)
                }
                None => variable,
            });
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::StaticVariables, start.to(end)).with_children(children))
    }

    fn parse_expression_statement(&mut self) -> PResult<Node> {
        let expression = self.parse_expression()?;
        let start = expression.span();
        let end = self.expect_terminator()?;
        Ok(Node::new(NodeKind::ExpressionStatement, start.to(end)).with_children(vec![expression]))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Expression = LowOr
    fn parse_expression(&mut self) -> PResult<Node> {
        self.nested(|p| p.parse_low_or())
    }

    /// LowOr = LowAnd ('or' LowAnd)*
    fn parse_low_or(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_low_and()?;
        while let Some(operator) = self.eat(TokenKind::OR_KW) {
            let rhs = self.parse_low_and()?;
            lhs = binary(NodeKind::BinaryExpression, operator.text, lhs, rhs);
        }
        Ok(lhs)
    }

    /// LowAnd = Assignment ('and' Assignment)*
    fn parse_low_and(&mut self) -> PResult<Node> {
        let mut lhs = self.parse_assignment()?;
        while let Some(operator) = self.eat(TokenKind::AND_KW) {
            let rhs = self.parse_assignment()?;
            lhs = binary(NodeKind::BinaryExpression, operator.text, lhs, rhs);
        }
        Ok(lhs)
    }

    /// Assignment = Conditional (AssignOp '&'? Assignment)?
    fn parse_assignment(&mut self) -> PResult<Node> {
        let lhs = self.parse_conditional()?;
        match self.current_kind() {
            Some(kind) if kind.is_assignment() => {
                let operator = self.bump()?;
                if kind == TokenKind::EQ {
                    self.eat(TokenKind::AMP);
                }
                let rhs = self.nested(|p| p.parse_assignment())?;
                Ok(binary(NodeKind::Assignment, operator.text, lhs, rhs))
            }
            _ => Ok(lhs),
        }
    }

    /// Conditional = Binary ('?' Assignment? ':' Assignment)?
    ///
    /// The node spans from the condition's first token to the else
    /// branch's last token.
    fn parse_conditional(&mut self) -> PResult<Node> {
        let condition = self.parse_binary(0)?;
        if !self.at(TokenKind::QUESTION) {
            return Ok(condition);
        }
        self.bump()?;
        self.nested(|p| {
            let mut image = "?";
            let mut children = vec![condition];
            if p.eat(TokenKind::COLON).is_some() {
                image = "?:";
            } else {
                children.push(p.parse_assignment()?);
                p.expect(TokenKind::COLON, "':'")?;
            }
            let else_branch = p.parse_assignment()?;
            let span = children[0].span().to(else_branch.span());
            children.push(else_branch);
            Ok(Node::new(NodeKind::ConditionalExpression, span)
                .with_image(image)
                .with_children(children))
        })
    }

    /// Binary operators by precedence climbing, `??` lowest.
    fn parse_binary(&mut self, min_precedence: u8) -> PResult<Node> {
        let mut lhs = self.parse_unary()?;
        while let Some((precedence, right_assoc)) = self.current_kind().and_then(binary_precedence) {
            if precedence < min_precedence {
                break;
            }
            let operator = self.bump()?;
            if operator.kind == TokenKind::INSTANCEOF_KW {
                let rhs = self.parse_class_reference()?;
                lhs = binary(NodeKind::InstanceOf, operator.text, lhs, rhs);
                continue;
            }
            let next = if right_assoc { precedence } else { precedence + 1 };
            let rhs = self.nested(|p| p.parse_binary(next))?;
            lhs = binary(NodeKind::BinaryExpression, operator.text, lhs, rhs);
        }
        Ok(lhs)
    }

    /// Unary = ('!' | '-' | '+' | '~' | '@' | '++' | '--') Unary | Cast Unary | 'clone' Unary
    ///       | ('include' | 'include_once' | 'require' | 'require_once' | 'print') Assignment
    ///       | Power
    ///
    /// A sign in front of a number stays a unary operator, so the literal's
    /// image never includes it.
    fn parse_unary(&mut self) -> PResult<Node> {
        match self.current_kind() {
            Some(TokenKind::BANG) => {
                // `!` binds looser than `instanceof`
                let operator = self.bump()?;
                let operand = self.nested(|p| p.parse_binary(INSTANCEOF_PRECEDENCE))?;
                Ok(Node::new(NodeKind::UnaryExpression, operator.span.to(operand.span()))
                    .with_image(operator.text)
                    .with_children(vec![operand]))
            }
            Some(
                TokenKind::MINUS
                | TokenKind::PLUS
                | TokenKind::TILDE
                | TokenKind::AT
                | TokenKind::PLUS_PLUS
                | TokenKind::MINUS_MINUS,
            ) => {
                let operator = self.bump()?;
                let operand = self.nested(|p| p.parse_unary())?;
                Ok(Node::new(NodeKind::UnaryExpression, operator.span.to(operand.span()))
                    .with_image(operator.text)
                    .with_children(vec![operand]))
            }
            Some(
                TokenKind::INCLUDE_KW
                | TokenKind::INCLUDE_ONCE_KW
                | TokenKind::REQUIRE_KW
                | TokenKind::REQUIRE_ONCE_KW,
            ) => {
                let keyword = self.bump()?;
                let operand = self.nested(|p| p.parse_assignment())?;
                Ok(Node::new(NodeKind::Include, keyword.span.to(operand.span()))
                    .with_image(keyword.text.to_ascii_lowercase())
                    .with_children(vec![operand]))
            }
            Some(TokenKind::PRINT_KW) => {
                let keyword = self.bump()?;
                let operand = self.nested(|p| p.parse_assignment())?;
                Ok(Node::new(NodeKind::Print, keyword.span.to(operand.span()))
                    .with_children(vec![operand]))
            }
            Some(TokenKind::CLONE_KW) => {
                let keyword = self.bump()?;
                let operand = self.nested(|p| p.parse_unary())?;
                Ok(Node::new(NodeKind::Clone, keyword.span.to(operand.span())).with_children(vec![operand]))
            }
            Some(TokenKind::L_PAREN) if self.at_cast() => {
                let open = self.bump()?;
                let target = self.bump()?;
                self.bump()?;
                let operand = self.nested(|p| p.parse_unary())?;
                Ok(Node::new(NodeKind::CastExpression, open.span.to(operand.span()))
                    .with_image(target.text.to_ascii_lowercase())
                    .with_children(vec![operand]))
            }
            _ => self.parse_power(),
        }
    }

    fn at_cast(&mut self) -> bool {
        const CASTS: &[&str] = &[
            "int", "integer", "bool", "boolean", "float", "double", "real", "string", "array", "object",
            "unset", "binary",
        ];
        if !matches!(self.nth(1), Some(TokenKind::IDENT | TokenKind::ARRAY_KW))
            || self.nth(2) != Some(TokenKind::R_PAREN)
        {
            return false;
        }
        self.stream
            .peek(1)
            .is_some_and(|l| CASTS.iter().any(|c| c.eq_ignore_ascii_case(l.token.text)))
    }

    /// Power = Postfix ('**' Unary)?
    fn parse_power(&mut self) -> PResult<Node> {
        let base = self.parse_postfix()?;
        match self.eat(TokenKind::STAR_STAR) {
            Some(operator) => {
                let exponent = self.nested(|p| p.parse_unary())?;
                Ok(binary(NodeKind::BinaryExpression, operator.text, base, exponent))
            }
            None => Ok(base),
        }
    }

    /// Postfix = Primary (Arguments | '->' Member | '::' Member | '[' Expression? ']' | '++' | '--')*
    fn parse_postfix(&mut self) -> PResult<Node> {
        let mut expression = self.parse_primary()?;
        loop {
            expression = match self.current_kind() {
                Some(TokenKind::L_PAREN) => {
                    let arguments = self.parse_arguments()?;
                    let span = expression.span().to(arguments.span());
                    Node::new(NodeKind::Call, span).with_children(vec![expression, arguments])
                }
                Some(TokenKind::ARROW) => {
                    self.bump()?;
                    let member = self.parse_member_name()?;
                    let span = expression.span().to(member.span());
                    Node::new(NodeKind::MemberAccess, span).with_children(vec![expression, member])
                }
                Some(TokenKind::COLON_COLON) => {
                    self.bump()?;
                    let member = self.parse_member_name()?;
                    let span = expression.span().to(member.span());
                    Node::new(NodeKind::StaticAccess, span).with_children(vec![expression, member])
                }
                Some(TokenKind::L_BRACKET) => {
                    self.bump()?;
                    let mut children = vec![expression];
                    if !self.at(TokenKind::R_BRACKET) {
                        children.push(self.parse_expression()?);
                    }
                    let end = self.expect(TokenKind::R_BRACKET, "']'")?.span;
                    let span = children[0].span().to(end);
                    Node::new(NodeKind::Index, span).with_children(children)
                }
                Some(TokenKind::PLUS_PLUS | TokenKind::MINUS_MINUS) => {
                    let operator = self.bump()?;
                    let span = expression.span().to(operator.span);
                    Node::new(NodeKind::PostfixExpression, span)
                        .with_image(operator.text)
                        .with_children(vec![expression])
                }
                _ => return Ok(expression),
            };
        }
    }

    /// Member = Name | Variable | 'class' | '{' Expression '}'
    fn parse_member_name(&mut self) -> PResult<Node> {
        match self.current_kind() {
            Some(TokenKind::VARIABLE) => {
                let variable = self.bump()?;
                Ok(Node::new(NodeKind::Variable, variable.span).with_image(variable.text))
            }
            Some(TokenKind::L_BRACE) => {
                self.bump()?;
                let expression = self.parse_expression()?;
                self.expect(TokenKind::R_BRACE, "'}'")?;
                Ok(expression)
            }
            _ => {
                let name = self.expect_name(true)?;
                Ok(Node::new(NodeKind::Identifier, name.span).with_image(name.text))
            }
        }
    }

    /// Arguments = '(' (('...')? Expression (',' ('...')? Expression)* ','?)? ')'
    fn parse_arguments(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::L_PAREN, "'('")?.span;
        let mut children = Vec::new();
        while !self.at(TokenKind::R_PAREN) {
            self.eat(TokenKind::ELLIPSIS);
            children.push(self.parse_expression()?);
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        let end = self.expect(TokenKind::R_PAREN, "')'")?.span;
        Ok(Node::new(NodeKind::Arguments, start.to(end)).with_children(children))
    }

    /// Primary = Variable | Literal | '(' Expression ')' | Array | Allocation | Closure | QualifiedName
    fn parse_primary(&mut self) -> PResult<Node> {
        let Some(kind) = self.current_kind() else {
            return Err(self.stream.end_error());
        };
        match kind {
            TokenKind::VARIABLE => {
                let variable = self.bump()?;
                Ok(Node::new(NodeKind::Variable, variable.span).with_image(variable.text))
            }
            kind if kind.is_literal() => self.parse_literal(),
            TokenKind::L_PAREN => self.parse_parenthesized(),
            TokenKind::L_BRACKET => self.parse_array(TokenKind::L_BRACKET, TokenKind::R_BRACKET),
            TokenKind::ARRAY_KW if self.nth(1) == Some(TokenKind::L_PAREN) => {
                self.parse_array(TokenKind::L_PAREN, TokenKind::R_PAREN)
            }
            TokenKind::NEW_KW => self.parse_allocation(),
            TokenKind::FUNCTION_KW => self.parse_closure(),
            TokenKind::STATIC_KW if self.nth(1) == Some(TokenKind::FUNCTION_KW) => self.parse_closure(),
            TokenKind::STATIC_KW => {
                let keyword = self.bump()?;
                Ok(Node::new(NodeKind::Identifier, keyword.span).with_image(keyword.text))
            }
            TokenKind::IDENT | TokenKind::BACKSLASH | TokenKind::NAMESPACE_KW => {
                let (name, span) = self.parse_qualified_name()?;
                Ok(Node::new(NodeKind::Identifier, span).with_image(name))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Literal recognition dispatches on the current token's kind.
    fn parse_literal(&mut self) -> PResult<Node> {
        let token = self.bump()?;
        let kind = match token.kind {
            TokenKind::TRUE_KW | TokenKind::FALSE_KW => LiteralKind::Boolean,
            TokenKind::NULL_KW => LiteralKind::Null,
            TokenKind::INTEGER => LiteralKind::Integer,
            TokenKind::FLOAT => LiteralKind::Float,
            TokenKind::STRING => LiteralKind::String,
            _ => {
                return Err(ParseError::syntax(
                    token.span.start,
                    format!("'{}'", token.text),
                    "literal",
                ));
            }
        };
        Ok(Node::new(NodeKind::Literal(kind), token.span).with_image(token.text))
    }

    /// Array = ('[' | 'array' '(') (Element (',' Element)* ','?)? (']' | ')')
    fn parse_array(&mut self, open: TokenKind, close: TokenKind) -> PResult<Node> {
        let start = self.current_span()?;
        if open == TokenKind::L_PAREN {
            self.expect(TokenKind::ARRAY_KW, "'array'")?;
        }
        self.bump()?;

        let mut children = Vec::new();
        while !self.at(close) {
            children.push(self.parse_array_element()?);
            if self.eat(TokenKind::COMMA).is_none() {
                break;
            }
        }
        let end = self.expect(close, if close == TokenKind::R_PAREN { "')'" } else { "']'" })?.span;
        Ok(Node::new(NodeKind::Array, start.to(end)).with_children(children))
    }

    /// Element = '...' Expression | (Expression '=>')? '&'? Expression
    fn parse_array_element(&mut self) -> PResult<Node> {
        let start = self.current_span()?;
        self.eat(TokenKind::ELLIPSIS);
        self.eat(TokenKind::AMP);
        let mut children = vec![self.parse_expression()?];
        if self.eat(TokenKind::FAT_ARROW).is_some() {
            self.eat(TokenKind::AMP);
            children.push(self.parse_expression()?);
        }
        let end = children[children.len() - 1].span();
        Ok(Node::new(NodeKind::ArrayElement, start.to(end)).with_children(children))
    }

    /// Allocation = 'new' ClassReference Arguments?
    fn parse_allocation(&mut self) -> PResult<Node> {
        let start = self.expect(TokenKind::NEW_KW, "'new'")?.span;
        let class = self.parse_class_reference()?;
        let mut end = class.span();
        let mut children = vec![class];
        if self.at(TokenKind::L_PAREN) {
            let arguments = self.parse_arguments()?;
            end = arguments.span();
            children.push(arguments);
        }
        Ok(Node::new(NodeKind::Allocation, start.to(end)).with_children(children))
    }

    /// ClassReference = QualifiedName | 'static' | Variable
    fn parse_class_reference(&mut self) -> PResult<Node> {
        match self.current_kind() {
            Some(TokenKind::VARIABLE) => {
                let variable = self.bump()?;
                Ok(Node::new(NodeKind::Variable, variable.span).with_image(variable.text))
            }
            Some(TokenKind::STATIC_KW) => {
                let keyword = self.bump()?;
                Ok(Node::new(NodeKind::Identifier, keyword.span).with_image(keyword.text))
            }
            _ => {
                let (name, span) = self.parse_qualified_name()?;
                Ok(Node::new(NodeKind::Identifier, span).with_image(name))
            }
        }
    }
}

/// Node for a binary operator spanning both operands.
fn binary(kind: NodeKind, operator: &str, lhs: Node, rhs: Node) -> Node {
    Node::new(kind, lhs.span().to(rhs.span()))
        .with_image(operator)
        .with_children(vec![lhs, rhs])
}

const INSTANCEOF_PRECEDENCE: u8 = 12;

/// Precedence (higher binds tighter) and right-associativity of binary operators.
fn binary_precedence(kind: TokenKind) -> Option<(u8, bool)> {
    use TokenKind::*;
    let entry = match kind {
        QUESTION_QUESTION => (1, true),
        PIPE_PIPE => (2, false),
        AMP_AMP => (3, false),
        PIPE => (4, false),
        CARET => (5, false),
        AMP => (6, false),
        EQ_EQ | BANG_EQ | EQ_EQ_EQ | BANG_EQ_EQ | LT_EQ_GT => (7, false),
        LT | LT_EQ | GT | GT_EQ => (8, false),
        LT_LT | GT_GT => (9, false),
        PLUS | MINUS | DOT => (10, false),
        STAR | SLASH | PERCENT => (11, false),
        INSTANCEOF_KW => (INSTANCEOF_PRECEDENCE, false),
        _ => return None,
    };
    Some(entry)
}
