//! Lexer (tokenizer) for shader source
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The lexer never fails: characters outside the lexical grammar, malformed
//! numeric literals and unterminated block comments become
//! [`TokenKind::Error`] tokens, which the parser reports if it reaches them.
//!
//! Numeric literals are kept verbatim (`1.61803398875`, `0x1p4f`, `3u`);
//! interpreting them is left to consumers of the AST.

use super::ast::SourceLocation;
use std::fmt;
use tracing::trace;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Ident(String),
    Number(String),

    // Keywords
    Alias,
    Break,
    Case,
    Const,
    ConstAssert,
    Continue,
    Continuing,
    Default,
    Diagnostic,
    Discard,
    Else,
    Enable,
    False,
    Fn,
    For,
    If,
    Let,
    Loop,
    Override,
    Requires,
    Return,
    StaticAssert,
    Struct,
    Switch,
    True,
    Var,
    While,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !

    // Bitwise
    Amp,   // &
    Pipe,  // |
    Caret, // ^
    Tilde, // ~
    LtLt,  // <<
    GtGt,  // >>

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    LtLtEq,    // <<=
    GtGtEq,    // >>=

    // Increment/Decrement
    PlusPlus,   // ++
    MinusMinus, // --

    // Punctuation
    At,        // @
    Arrow,     // ->
    Dot,       // .
    Colon,     // :
    Semicolon, // ;
    Comma,     // ,
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]

    /// Text outside the lexical grammar
    Error { text: String, reason: &'static str },

    Eof,
}

impl TokenKind {
    /// Source spelling of fixed tokens; `None` for names, literals, errors and end of input.
    pub fn lexeme(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Ident(_)
            | TokenKind::Number(_)
            | TokenKind::Error { .. }
            | TokenKind::Eof => return None,
            TokenKind::Alias => "alias",
            TokenKind::Break => "break",
            TokenKind::Case => "case",
            TokenKind::Const => "const",
            TokenKind::ConstAssert => "const_assert",
            TokenKind::Continue => "continue",
            TokenKind::Continuing => "continuing",
            TokenKind::Default => "default",
            TokenKind::Diagnostic => "diagnostic",
            TokenKind::Discard => "discard",
            TokenKind::Else => "else",
            TokenKind::Enable => "enable",
            TokenKind::False => "false",
            TokenKind::Fn => "fn",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Let => "let",
            TokenKind::Loop => "loop",
            TokenKind::Override => "override",
            TokenKind::Requires => "requires",
            TokenKind::Return => "return",
            TokenKind::StaticAssert => "static_assert",
            TokenKind::Struct => "struct",
            TokenKind::Switch => "switch",
            TokenKind::True => "true",
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Amp => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::LtLt => "<<",
            TokenKind::GtGt => ">>",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::LtLtEq => "<<=",
            TokenKind::GtGtEq => ">>=",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::At => "@",
            TokenKind::Arrow => "->",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
        };
        Some(text)
    }

    pub fn is_keyword(&self) -> bool {
        self.lexeme()
            .is_some_and(|text| text.starts_with(|c: char| c.is_ascii_alphabetic()))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier '{}'", name),
            TokenKind::Number(text) => write!(f, "number '{}'", text),
            TokenKind::Error { text, .. } => write!(f, "invalid text '{}'", text),
            TokenKind::Eof => write!(f, "end of file"),
            other => write!(f, "'{}'", other.lexeme().unwrap_or_default()),
        }
    }
}

/// A token with the location of its first character.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    /// Exact source text of this token (empty for end of input).
    pub fn text(&self) -> &str {
        match &self.kind {
            TokenKind::Ident(text) | TokenKind::Number(text) => text.as_str(),
            TokenKind::Error { text, .. } => text.as_str(),
            kind => kind.lexeme().unwrap_or_default(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

/// Maps a word to its keyword token, if it is one.
fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "alias" => TokenKind::Alias,
        "break" => TokenKind::Break,
        "case" => TokenKind::Case,
        "const" => TokenKind::Const,
        "const_assert" => TokenKind::ConstAssert,
        "continue" => TokenKind::Continue,
        "continuing" => TokenKind::Continuing,
        "default" => TokenKind::Default,
        "diagnostic" => TokenKind::Diagnostic,
        "discard" => TokenKind::Discard,
        "else" => TokenKind::Else,
        "enable" => TokenKind::Enable,
        "false" => TokenKind::False,
        "fn" => TokenKind::Fn,
        "for" => TokenKind::For,
        "if" => TokenKind::If,
        "let" => TokenKind::Let,
        "loop" => TokenKind::Loop,
        "override" => TokenKind::Override,
        "requires" => TokenKind::Requires,
        "return" => TokenKind::Return,
        "static_assert" => TokenKind::StaticAssert,
        "struct" => TokenKind::Struct,
        "switch" => TokenKind::Switch,
        "true" => TokenKind::True,
        "var" => TokenKind::Var,
        "while" => TokenKind::While,
        _ => return None,
    };
    Some(kind)
}

/// Convenience wrapper: tokenize `source` in one call.
pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

/// Lexer for shader source
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The result always ends with [`TokenKind::Eof`].
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            if let Some(error) = self.skip_whitespace_and_comments() {
                tokens.push(error);
                continue;
            }

            if self.is_at_end() {
                tokens.push(Token::new(TokenKind::Eof, self.current_location()));
                break;
            }

            let token = self.next_token();
            if let TokenKind::Error { text, reason } = &token.kind {
                trace!(%text, reason, location = %token.location, "lexical error");
            }
            tokens.push(token);
        }

        tokens
    }

    /// Get next token
    fn next_token(&mut self) -> Token {
        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, loc);
        };

        let kind = match ch {
            '0'..='9' => self.number_literal(ch),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => self.number_literal(ch),
            c if c == '_' || c.is_alphabetic() => self.identifier_or_keyword(ch),

            '+' => self.pick(&[('+', TokenKind::PlusPlus), ('=', TokenKind::PlusEq)], TokenKind::Plus),
            '-' => self.pick(
                &[
                    ('-', TokenKind::MinusMinus),
                    ('=', TokenKind::MinusEq),
                    ('>', TokenKind::Arrow),
                ],
                TokenKind::Minus,
            ),
            '*' => self.pick(&[('=', TokenKind::StarEq)], TokenKind::Star),
            '/' => self.pick(&[('=', TokenKind::SlashEq)], TokenKind::Slash),
            '%' => self.pick(&[('=', TokenKind::PercentEq)], TokenKind::Percent),
            '=' => self.pick(&[('=', TokenKind::EqEq)], TokenKind::Eq),
            '!' => self.pick(&[('=', TokenKind::NotEq)], TokenKind::Bang),
            '^' => self.pick(&[('=', TokenKind::CaretEq)], TokenKind::Caret),
            '&' => self.pick(&[('&', TokenKind::AndAnd), ('=', TokenKind::AmpEq)], TokenKind::Amp),
            '|' => self.pick(&[('|', TokenKind::OrOr), ('=', TokenKind::PipeEq)], TokenKind::Pipe),
            '<' => {
                if self.peek() == Some('<') {
                    self.advance();
                    self.pick(&[('=', TokenKind::LtLtEq)], TokenKind::LtLt)
                } else {
                    self.pick(&[('=', TokenKind::Le)], TokenKind::Lt)
                }
            }
            '>' => {
                if self.peek() == Some('>') {
                    self.advance();
                    self.pick(&[('=', TokenKind::GtGtEq)], TokenKind::GtGt)
                } else {
                    self.pick(&[('=', TokenKind::Ge)], TokenKind::Gt)
                }
            }
            '~' => TokenKind::Tilde,
            '@' => TokenKind::At,
            '.' => TokenKind::Dot,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,

            _ => TokenKind::Error {
                text: ch.to_string(),
                reason: "unexpected character",
            },
        };

        Token::new(kind, loc)
    }

    /// Consumes the next character if it matches one of `options`; otherwise
    /// yields `single`.
    fn pick(&mut self, options: &[(char, TokenKind)], single: TokenKind) -> TokenKind {
        let next = self.peek();
        for (ch, kind) in options {
            if next == Some(*ch) {
                self.advance();
                return kind.clone();
            }
        }
        single
    }

    /// Parse numeric literal, keeping its exact spelling
    fn number_literal(&mut self, first: char) -> TokenKind {
        let mut text = String::new();
        text.push(first);

        let is_hex = first == '0' && matches!(self.peek(), Some('x' | 'X'));
        let mut is_float = first == '.';
        // Every literal needs mantissa digits, and an exponent needs its own
        let mut well_formed = true;

        if is_hex {
            text.extend(self.advance());
            let mut digits = self.take_while_into(&mut text, |c| c.is_ascii_hexdigit());
            if self.peek() == Some('.') {
                is_float = true;
                text.extend(self.advance());
                digits += self.take_while_into(&mut text, |c| c.is_ascii_hexdigit());
            }
            well_formed = digits > 0;
            if matches!(self.peek(), Some('p' | 'P')) {
                is_float = true;
                well_formed &= self.exponent_into(&mut text);
            }
        } else {
            self.take_while_into(&mut text, |c| c.is_ascii_digit());
            if !is_float && self.peek() == Some('.') {
                is_float = true;
                text.extend(self.advance());
                self.take_while_into(&mut text, |c| c.is_ascii_digit());
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                is_float = true;
                well_formed = self.exponent_into(&mut text);
            }
        }

        // Suffix
        match self.peek() {
            Some('i' | 'u') if !is_float => text.extend(self.advance()),
            Some('f' | 'h') if !is_hex || is_float => text.extend(self.advance()),
            _ => {}
        }

        let trailing = self
            .peek()
            .is_some_and(|c| c == '_' || c.is_alphanumeric());
        if trailing || !well_formed {
            self.take_while_into(&mut text, |c| c == '_' || c.is_alphanumeric());
            return TokenKind::Error {
                text,
                reason: "invalid numeric literal",
            };
        }

        TokenKind::Number(text)
    }

    /// Appends `e`/`p`, an optional sign and the exponent digits. Returns
    /// false when no digits follow.
    fn exponent_into(&mut self, text: &mut String) -> bool {
        text.extend(self.advance());
        if matches!(self.peek(), Some('+' | '-')) {
            text.extend(self.advance());
        }
        self.take_while_into(text, |c| c.is_ascii_digit()) > 0
    }

    /// Moves accepted characters into `text`, returning how many were taken
    fn take_while_into(&mut self, text: &mut String, accept: impl Fn(char) -> bool) -> usize {
        let mut taken = 0;
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
            taken += 1;
        }
        taken
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);
        self.take_while_into(&mut ident, |c| c == '_' || c.is_alphanumeric());

        keyword(&ident).unwrap_or(TokenKind::Ident(ident))
    }

    /// Skip whitespace and comments. An unterminated block comment is
    /// returned as an error token.
    fn skip_whitespace_and_comments(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        if let Some(error) = self.skip_block_comment() {
                            return Some(error);
                        }
                    } else {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip a block comment (/* ... */). Block comments nest.
    fn skip_block_comment(&mut self) -> Option<Token> {
        let start_loc = self.current_location();
        let start = self.position;
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        let mut depth = 1;
        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                depth -= 1;
                if depth == 0 {
                    return None;
                }
            } else if self.peek() == Some('/') && self.peek_ahead(1) == Some('*') {
                self.advance();
                self.advance();
                depth += 1;
            } else {
                self.advance();
            }
        }

        Some(Token::new(
            TokenKind::Error {
                text: self.input[start..].iter().collect(),
                reason: "unterminated block comment",
            },
            start_loc,
        ))
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}
