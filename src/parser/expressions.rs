//! Expression parsing implementation
//!
//! Binary operators are parsed by precedence climbing over a fixed table;
//! unary, postfix and primary forms use recursive descent.
//!
//! # Precedence
//!
//! Lowest to highest, all binary levels left-associative:
//!
//! | level | operators           |
//! |-------|---------------------|
//! | 1     | `\|\|`              |
//! | 2     | `&&`                |
//! | 3     | `\|`                |
//! | 4     | `^`                 |
//! | 5     | `&`                 |
//! | 6     | `==` `!=`           |
//! | 7     | `<` `>` `<=` `>=`   |
//! | 8     | `<<` `>>`           |
//! | 9     | `+` `-`             |
//! | 10    | `*` `/` `%`         |
//!
//! followed by prefix `-` `!` `~` `*` `&`, then postfix call, index and
//! member access.
//!
//! # Type constructors
//!
//! `vec3<i32>(0, 1, 0)` and `array(a, b)` produce [`Expression::Construct`].
//! Inside a type parameter list `>` always closes the list, so
//! `array<f32, N << 2>` keeps the shift in the count.
//! An identifier followed by `<` is first tried as a templated type; if no
//! `(` follows the closing `>` the cursor is reset and `<` is a comparison.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};
use crate::parser::types::is_constructible_type_name;

#[derive(Clone, Copy)]
enum Infix {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

/// Precedence and operator for a binary operator token
fn infix_operator(kind: &TokenKind) -> Option<(u8, Infix)> {
    let entry = match kind {
        TokenKind::OrOr => (1, Infix::Logical(LogicalOp::Or)),
        TokenKind::AndAnd => (2, Infix::Logical(LogicalOp::And)),
        TokenKind::Pipe => (3, Infix::Binary(BinaryOp::BitOr)),
        TokenKind::Caret => (4, Infix::Binary(BinaryOp::BitXor)),
        TokenKind::Amp => (5, Infix::Binary(BinaryOp::BitAnd)),
        TokenKind::EqEq => (6, Infix::Binary(BinaryOp::Eq)),
        TokenKind::NotEq => (6, Infix::Binary(BinaryOp::Ne)),
        TokenKind::Lt => (7, Infix::Binary(BinaryOp::Lt)),
        TokenKind::Gt => (7, Infix::Binary(BinaryOp::Gt)),
        TokenKind::Le => (7, Infix::Binary(BinaryOp::Le)),
        TokenKind::Ge => (7, Infix::Binary(BinaryOp::Ge)),
        TokenKind::LtLt => (8, Infix::Binary(BinaryOp::Shl)),
        TokenKind::GtGt => (8, Infix::Binary(BinaryOp::Shr)),
        TokenKind::Plus => (9, Infix::Binary(BinaryOp::Add)),
        TokenKind::Minus => (9, Infix::Binary(BinaryOp::Sub)),
        TokenKind::Star => (10, Infix::Binary(BinaryOp::Mul)),
        TokenKind::Slash => (10, Infix::Binary(BinaryOp::Div)),
        TokenKind::Percent => (10, Infix::Binary(BinaryOp::Mod)),
        _ => return None,
    };
    Some(entry)
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_binary(1, false)
    }

    /// Parse a condition; an outermost pair of parentheses is never kept.
    pub(crate) fn parse_condition(&mut self) -> Result<Expression, ParseError> {
        Ok(self.parse_expression()?.ungrouped())
    }

    /// Parse an expression inside a type parameter list (`array<f32, N << 2>`).
    ///
    /// `>`, `>=` and `>>` end the expression instead of being read as
    /// operators; a comparison or right shift in a count must be
    /// parenthesized.
    pub(crate) fn parse_template_expression(&mut self) -> Result<Expression, ParseError> {
        self.parse_binary(1, true)
    }

    /// Precedence climbing over binary operators binding at least as
    /// tightly as `min_precedence`
    fn parse_binary(
        &mut self,
        min_precedence: u8,
        in_template: bool,
    ) -> Result<Expression, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((precedence, op)) = infix_operator(self.peek_kind()) {
            if precedence < min_precedence || (in_template && self.check_closing_angle()) {
                break;
            }
            let location = self.advance().location;
            let right = Box::new(self.parse_binary(precedence + 1, in_template)?);
            let left_box = Box::new(left);

            left = match op {
                Infix::Binary(op) => Expression::Binary {
                    op,
                    left: left_box,
                    right,
                    location,
                },
                Infix::Logical(op) => Expression::Logical {
                    op,
                    left: left_box,
                    right,
                    location,
                },
            };
        }

        Ok(left)
    }

    /// Parse unary (- ! ~ * &)
    pub(crate) fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let op = match self.peek_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Tilde => UnaryOp::BitNot,
            TokenKind::Star => UnaryOp::Deref,
            TokenKind::Amp => UnaryOp::AddrOf,
            _ => return self.parse_postfix(),
        };

        let location = self.advance().location;
        let operand = Box::new(self.parse_unary()?);
        Ok(Expression::Unary {
            op,
            operand,
            location,
        })
    }

    /// Parse postfix ([] . ())
    fn parse_postfix(&mut self) -> Result<Expression, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let location = self.current_location();

            if self.match_token(&TokenKind::LBracket) {
                let index = Box::new(self.parse_expression()?);
                self.expect_token(&TokenKind::RBracket, "after index")?;
                expr = Expression::Index {
                    object: Box::new(expr),
                    index,
                    location,
                };
            } else if self.match_token(&TokenKind::Dot) {
                let member = self.expect_identifier("after '.'")?;
                expr = Expression::Member {
                    object: Box::new(expr),
                    member,
                    location,
                };
            } else if self.check(&TokenKind::LParen) {
                // Function call
                let call_location = expr.location();
                let callee = match expr {
                    Expression::Identifier { name, .. } => name,
                    _ => return Err(self.unexpected("operator; only named functions can be called")),
                };
                let args = self.parse_argument_list()?;
                expr = Expression::Call {
                    callee,
                    args,
                    location: call_location,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    /// Parse argument list: (expr, expr, ...) with an optional trailing comma
    pub(crate) fn parse_argument_list(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.expect_lparen("to open argument list")?;

        let mut args = Vec::new();
        while !self.check(&TokenKind::RParen) {
            args.push(self.parse_expression()?);
            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_rparen("after arguments")?;
        Ok(args)
    }

    /// Parse primary (literals, identifiers, constructors, parenthesized expressions)
    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        let location = self.current_location();

        match self.peek_kind() {
            TokenKind::Number(text) => {
                let value = text.clone();
                self.advance();
                Ok(Expression::Literal {
                    kind: LiteralKind::of_number(&value),
                    value,
                    location,
                })
            }
            TokenKind::True | TokenKind::False => {
                let value = self.advance().text().to_string();
                Ok(Expression::Literal {
                    value,
                    kind: LiteralKind::Bool,
                    location,
                })
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                if self.options.preserve_parentheses {
                    Ok(Expression::Grouped {
                        inner: Box::new(inner),
                        location,
                    })
                } else {
                    Ok(inner)
                }
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                match self.peek_ahead(1) {
                    TokenKind::Lt => {
                        if let Some(expr) = self.try_templated_constructor()? {
                            return Ok(expr);
                        }
                    }
                    TokenKind::LParen if is_constructible_type_name(&name) => {
                        let ty = self.parse_type()?;
                        let args = self.parse_argument_list()?;
                        return Ok(Expression::Construct { ty, args, location });
                    }
                    _ => {}
                }

                self.advance();
                Ok(Expression::Identifier { name, location })
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Try `name<...>(args)`. Returns `None` with the cursor restored when
    /// the tokens do not form a templated type followed by `(`.
    fn try_templated_constructor(&mut self) -> Result<Option<Expression>, ParseError> {
        let mark = self.mark();
        let location = self.current_location();

        let ty = match self.parse_type() {
            Ok(ty) if self.check(&TokenKind::LParen) => ty,
            _ => {
                self.reset(mark);
                return Ok(None);
            }
        };

        if ty.name == "bitcast" {
            let target = ty
                .format
                .map(|format| *format)
                .ok_or_else(|| self.unexpected("bitcast target type"))?;
            let mut args = self.parse_argument_list()?;
            if args.len() != 1 {
                return Err(ParseError::Syntax {
                    expected: "exactly one bitcast argument".to_string(),
                    found: format!("{} arguments", args.len()),
                    location,
                });
            }
            return Ok(Some(Expression::Bitcast {
                ty: target,
                value: Box::new(args.remove(0)),
                location,
            }));
        }

        let args = self.parse_argument_list()?;
        Ok(Some(Expression::Construct { ty, args, location }))
    }
}
