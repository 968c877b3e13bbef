//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, parse options, the token cursor and the public
//! entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, cursor helpers, and coordination
//! - `declarations`: module-scope declarations (`enable`, `alias`, `struct`,
//!   `fn`, `var`/`let`/`const`/`override`, `static_assert`)
//! - `statements`: statements inside function bodies
//! - `types`: type specifiers and attributes
//! - `expressions`: expressions with precedence climbing
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared cursor state.
//!
//! # Cursor
//!
//! The cursor supports [`Parser::mark`] / [`Parser::reset`] for the one place
//! the grammar needs unbounded lookahead (templated type constructors versus
//! `<` comparisons). It can also split a `>>`, `>=` or `>>=` token when a
//! type parameter list closes; the unconsumed remainder is kept as a residual
//! token and is part of the mark.

use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use thiserror::Error;
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// The parser reached a token the lexer could not recognize.
    #[error("Lexical error at {location}: {message} '{text}'")]
    Lexical {
        message: String,
        text: String,
        location: SourceLocation,
    },
    /// The expected token or construct was not found.
    #[error("Parse error at {location}: expected {expected}, found {found}")]
    Syntax {
        expected: String,
        found: String,
        location: SourceLocation,
    },
    /// A recognized keyword whose grammar is not implemented.
    #[error("Unsupported construct at {location}: {construct}")]
    Unsupported {
        construct: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::Lexical { location, .. }
            | ParseError::Syntax { location, .. }
            | ParseError::Unsupported { location, .. } => *location,
        }
    }
}

/// Knobs for a parse run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Keep parenthesized sub-expressions as [`Expression::Grouped`] nodes.
    ///
    /// Conditions of `if`, `while`, `switch` and `static_assert` never keep
    /// their outermost parentheses, so `if (c) {}` and `if c {}` parse alike
    /// either way.
    pub preserve_parentheses: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preserved_parentheses(mut self) -> Self {
        self.preserve_parentheses = true;
        self
    }
}

/// Saved cursor state, see [`Parser::mark`].
#[derive(Debug, Clone)]
pub(crate) struct Mark {
    position: usize,
    residual: Option<Token>,
    previous_location: SourceLocation,
}

/// Recursive descent parser for shader source
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Unconsumed tail of a split token at `position`
    residual: Option<Token>,
    previous_location: SourceLocation,
    pub(crate) options: ParseOptions,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let tokens = Lexer::new(source).tokenize();
        debug!(token_count = tokens.len(), "tokenized shader source");
        Self::from_tokens(tokens)
    }

    /// Build a parser over an externally produced token sequence.
    ///
    /// A missing trailing [`TokenKind::Eof`] is added, so an empty vector is
    /// a valid (empty) module.
    pub fn from_tokens(mut tokens: Vec<Token>) -> Self {
        match tokens.last() {
            Some(token) if token.kind == TokenKind::Eof => {}
            last => {
                let location = last.map(|t| t.location).unwrap_or(SourceLocation::new(1, 1));
                tokens.push(Token::new(TokenKind::Eof, location));
            }
        }

        Self {
            tokens,
            position: 0,
            residual: None,
            previous_location: SourceLocation::new(1, 1),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the entire module (top-level declarations)
    pub fn parse_module(&mut self) -> Result<Vec<Declaration>, ParseError> {
        let mut declarations = Vec::new();

        loop {
            while self.match_token(&TokenKind::Semicolon) {}
            if self.is_at_end() {
                break;
            }

            let decl = self.parse_global_declaration().inspect_err(|err| {
                debug!(%err, "shader parse failed");
            })?;
            trace!(kind = decl.kind_name(), name = decl.name(), "parsed declaration");
            declarations.push(decl);
        }

        debug!(declarations = declarations.len(), "parsed shader module");
        Ok(declarations)
    }

    // ===== Cursor =====

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            position: self.position,
            residual: self.residual.clone(),
            previous_location: self.previous_location,
        }
    }

    pub(crate) fn reset(&mut self, mark: Mark) {
        self.position = mark.position;
        self.residual = mark.residual;
        self.previous_location = mark.previous_location;
    }

    pub(crate) fn peek(&self) -> &Token {
        match &self.residual {
            Some(token) => token,
            None => &self.tokens[self.position],
        }
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Kind of the token `n` places after the current one.
    pub(crate) fn peek_ahead(&self, n: usize) -> &TokenKind {
        let index = (self.position + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.previous_location = token.location;
        if self.residual.take().is_some() || !self.is_at_end() {
            self.position += 1;
        }
        token
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek_kind()) == std::mem::discriminant(kind)
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.previous_location
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek().location
    }

    /// Consumes a `>` closing a type parameter list, splitting `>>`, `>=`
    /// and `>>=` so their remainder stays in the stream.
    pub(crate) fn expect_closing_angle(&mut self, ctx: &str) -> Result<(), ParseError> {
        let remainder = match self.peek_kind() {
            TokenKind::Gt => {
                self.advance();
                return Ok(());
            }
            TokenKind::GtGt => TokenKind::Gt,
            TokenKind::Ge => TokenKind::Eq,
            TokenKind::GtGtEq => TokenKind::Ge,
            _ => return Err(self.unexpected(format!("'>' {ctx}"))),
        };

        let location = self.current_location();
        self.previous_location = location;
        self.residual = Some(Token::new(remainder, location.shifted(1)));
        Ok(())
    }

    // ===== Errors =====

    /// Error for the current token. An error token from the lexer is
    /// reported as a lexical error rather than a syntax error.
    pub(crate) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        let token = self.peek();
        match &token.kind {
            TokenKind::Error { text, reason } => ParseError::Lexical {
                message: reason.to_string(),
                text: text.clone(),
                location: token.location,
            },
            _ => ParseError::Syntax {
                expected: expected.into(),
                found: token.to_string(),
                location: token.location,
            },
        }
    }

    pub(crate) fn unsupported(&self, construct: impl Into<String>) -> ParseError {
        match self.peek_kind() {
            TokenKind::Error { .. } => self.unexpected(""),
            _ => ParseError::Unsupported {
                construct: construct.into(),
                location: self.current_location(),
            },
        }
    }

    // ===== Expect helpers =====

    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        ctx: &str,
    ) -> Result<SourceLocation, ParseError> {
        if self.check(kind) {
            Ok(self.advance().location)
        } else {
            let expected = match kind.lexeme() {
                Some(text) => format!("'{text}' {ctx}"),
                None => format!("{kind} {ctx}"),
            };
            Err(self.unexpected(expected))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::LParen, ctx)
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::RParen, ctx)
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::LBrace, ctx)
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::RBrace, ctx)
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::Semicolon, ctx)
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> Result<String, ParseError> {
        if let TokenKind::Ident(name) = self.peek_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected(format!("identifier {ctx}")))
        }
    }
}

/// Parse shader source into its top-level declarations.
pub fn parse(source: &str) -> Result<Vec<Declaration>, ParseError> {
    Parser::new(source).parse_module()
}

pub fn parse_with_options(
    source: &str,
    options: ParseOptions,
) -> Result<Vec<Declaration>, ParseError> {
    Parser::new(source).with_options(options).parse_module()
}

/// Absent input is an empty module.
pub fn parse_optional(source: Option<&str>) -> Result<Vec<Declaration>, ParseError> {
    source.map_or_else(|| Ok(Vec::new()), parse)
}

/// Parse a token sequence produced outside this crate.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Vec<Declaration>, ParseError> {
    Parser::from_tokens(tokens).parse_module()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_empty_inputs() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse(";;;;").unwrap().is_empty());
        assert!(parse_optional(None).unwrap().is_empty());
        assert!(parse_tokens(Vec::new()).unwrap().is_empty());
        assert!(parse("  // only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_tokens_matches_parse() {
        let source = "alias foo = array<vec4<f32>, 4>;";
        assert_eq!(parse_tokens(tokenize(source)).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_parse_tokens_without_eof() {
        let mut tokens = tokenize("enable f16;");
        tokens.pop();
        let decls = parse_tokens(tokens).unwrap();
        assert_eq!(decls.len(), 1);
    }

    #[test]
    fn test_mark_and_reset_restore_residual() {
        let mut parser = Parser::new("a>>b");
        parser.advance();
        let mark = parser.mark();

        parser.expect_closing_angle("in test").unwrap();
        assert_eq!(parser.peek_kind(), &TokenKind::Gt);
        assert_eq!(parser.current_location(), SourceLocation::new(1, 3));

        parser.reset(mark);
        assert_eq!(parser.peek_kind(), &TokenKind::GtGt);
    }

    #[test]
    fn test_split_closing_angle_then_advance() {
        let mut parser = Parser::new(">>= x");
        parser.expect_closing_angle("in test").unwrap();
        assert_eq!(parser.peek_kind(), &TokenKind::Ge);
        parser.expect_closing_angle("in test").unwrap();
        assert_eq!(parser.peek_kind(), &TokenKind::Eq);
        parser.advance();
        assert!(matches!(parser.peek_kind(), TokenKind::Ident(name) if name == "x"));
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let err = parse("alias foo = ;").unwrap_err();
        match err {
            ParseError::Syntax { found, location, .. } => {
                assert_eq!(found, "';'");
                assert_eq!(location, SourceLocation::new(1, 13));
            }
            other => panic!("Expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_lexical_error_surfaces_when_reached() {
        let err = parse("alias foo = $;").unwrap_err();
        assert!(matches!(err, ParseError::Lexical { ref text, .. } if text == "$"));
        assert_eq!(err.location(), SourceLocation::new(1, 13));
        assert!(err.to_string().contains("line 1, column 13"));
    }

    #[test]
    fn test_unsupported_directive() {
        let err = parse("requires readonly_and_readwrite_storage_textures;").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { .. }));
    }

    #[test]
    fn test_parser_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Parser>();
        assert_send::<ParseError>();
    }

    #[test]
    fn test_parse_is_deterministic() {
        let source = "@group(0) @binding(1) var<storage, read_write> data: array<u32>;
                      fn main() { data[0] = data[1] + 2u; }";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }
}
