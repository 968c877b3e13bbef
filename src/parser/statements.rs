//! Statement parsing implementation
//!
//! This module handles parsing of all statement types inside function bodies:
//!
//! - Variable declarations: `var x = 1;`, `let y: f32 = 2.0;`, `const z = 3;`
//! - Control flow: `if`, `switch`, `for`, `while`, `loop`
//! - Jump statements: `return`, `break`, `break if`, `continue`, `discard`
//! - Assertions: `static_assert` / `const_assert`
//! - Compound statements: `{ ... }`
//! - Simple statements: assignments, increments and function calls
//!
//! # Grammar
//!
//! ```text
//! statement ::= var_decl ";" | if_stmt | switch_stmt | for_stmt | while_stmt
//!             | loop_stmt | return_stmt | "break" ";" | "continue" ";"
//!             | "discard" ";" | assert_stmt | block | simple_stmt ";"
//! simple_stmt ::= lhs ( assign_op expr | "++" | "--" ) | call
//! ```
//!
//! `if`, `switch`, `for`, `while`, `loop` and blocks may be preceded by
//! attributes (`@diagnostic(off, derivative_uniformity) if c { }`).
//!
//! The conditions of `if`, `switch`, `while` and `static_assert` may be written
//! with or without parentheses; both spellings give the same AST.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

fn assignment_operator(kind: &TokenKind) -> Option<AssignOp> {
    let op = match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::Add,
        TokenKind::MinusEq => AssignOp::Sub,
        TokenKind::StarEq => AssignOp::Mul,
        TokenKind::SlashEq => AssignOp::Div,
        TokenKind::PercentEq => AssignOp::Mod,
        TokenKind::AmpEq => AssignOp::BitAnd,
        TokenKind::PipeEq => AssignOp::BitOr,
        TokenKind::CaretEq => AssignOp::BitXor,
        TokenKind::GtGtEq => AssignOp::Shr,
        TokenKind::LtLtEq => AssignOp::Shl,
        _ => return None,
    };
    Some(op)
}

impl Parser {
    /// Parse `{ statements }`
    pub(crate) fn parse_block(&mut self, ctx: &str) -> Result<Vec<Statement>, ParseError> {
        self.expect_lbrace(ctx)?;
        let statements = self.parse_block_statements()?;
        self.expect_rbrace("to close block")?;
        Ok(statements)
    }

    /// Parse block statements (inside braces, excluding the braces themselves)
    fn parse_block_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        loop {
            while self.match_token(&TokenKind::Semicolon) {}
            if self.check(&TokenKind::RBrace) || self.is_at_end() {
                break;
            }
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let attributes = self.parse_attributes()?;
        let location = self.current_location();

        // Only compound and control-flow statements take attributes
        match self.peek_kind() {
            TokenKind::If => return self.parse_if_statement(attributes),
            TokenKind::Switch => return self.parse_switch_statement(attributes),
            TokenKind::For => return self.parse_for_statement(attributes),
            TokenKind::Loop => return self.parse_loop_statement(attributes),
            TokenKind::While => {
                self.advance();
                let condition = self.parse_condition()?;
                let body = self.parse_block("for 'while' body")?;
                return Ok(Statement::While {
                    condition,
                    body,
                    attributes,
                    location,
                });
            }
            TokenKind::LBrace => {
                let statements = self.parse_block("for block")?;
                return Ok(Statement::Block {
                    statements,
                    attributes,
                    location,
                });
            }
            _ if !attributes.is_empty() => {
                return Err(self.unexpected(
                    "'if', 'switch', 'for', 'while', 'loop' or '{' after statement attributes",
                ));
            }
            _ => {}
        }

        match self.peek_kind() {
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                let decl = self.parse_variable_declaration(Vec::new())?;
                self.expect_semicolon("after variable declaration")?;
                Ok(Statement::Declaration(decl))
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.expect_semicolon("after return")?;
                Ok(Statement::Return { value, location })
            }
            TokenKind::Break => {
                self.advance();
                if self.match_token(&TokenKind::If) {
                    let condition = self.parse_condition()?;
                    self.expect_semicolon("after 'break if' condition")?;
                    return Ok(Statement::BreakIf {
                        condition,
                        location,
                    });
                }
                self.expect_semicolon("after 'break'")?;
                Ok(Statement::Break { location })
            }
            TokenKind::Continue => {
                self.advance();
                self.expect_semicolon("after 'continue'")?;
                Ok(Statement::Continue { location })
            }
            TokenKind::Discard => {
                self.advance();
                self.expect_semicolon("after 'discard'")?;
                Ok(Statement::Discard { location })
            }
            TokenKind::StaticAssert | TokenKind::ConstAssert => {
                self.advance();
                let condition = self.parse_condition()?;
                self.expect_semicolon("after assertion")?;
                Ok(Statement::StaticAssert {
                    condition,
                    location,
                })
            }
            _ => {
                let statement = self.parse_simple_statement()?;
                self.expect_semicolon("after statement")?;
                Ok(statement)
            }
        }
    }

    /// Parse an assignment, increment/decrement or call statement without
    /// its terminator.
    ///
    /// The left-hand side is parsed first; the token after it decides the
    /// statement form.
    pub(crate) fn parse_simple_statement(&mut self) -> Result<Statement, ParseError> {
        let location = self.current_location();
        let target = self.parse_unary()?;

        if let Some(op) = assignment_operator(self.peek_kind()) {
            self.advance();
            let value = self.parse_expression()?;
            return Ok(Statement::Assign {
                target,
                op,
                value,
                location,
            });
        }

        let increment = match self.peek_kind() {
            TokenKind::PlusPlus => Some(IncrementOp::Increment),
            TokenKind::MinusMinus => Some(IncrementOp::Decrement),
            _ => None,
        };
        if let Some(op) = increment {
            self.advance();
            return Ok(Statement::Increment {
                target,
                op,
                location,
            });
        }

        match target {
            Expression::Call { callee, args, .. } => Ok(Statement::Call {
                callee,
                args,
                location,
            }),
            _ => Err(self.unexpected("assignment, '++', '--' or function call")),
        }
    }

    /// Parse if statement with its `else if` chain
    fn parse_if_statement(&mut self, attributes: Vec<Attribute>) -> Result<Statement, ParseError> {
        let location = self.expect_token(&TokenKind::If, "")?;
        let condition = self.parse_condition()?;
        let body = self.parse_block("for 'if' body")?;

        let mut else_if = Vec::new();
        let mut else_body = None;

        while self.match_token(&TokenKind::Else) {
            if self.check(&TokenKind::If) {
                let clause_location = self.advance().location;
                let condition = self.parse_condition()?;
                let body = self.parse_block("for 'else if' body")?;
                else_if.push(ElseIf {
                    condition,
                    body,
                    location: clause_location,
                });
            } else {
                else_body = Some(self.parse_block("for 'else' body")?);
                break;
            }
        }

        Ok(Statement::If {
            condition,
            body,
            else_if,
            else_body,
            attributes,
            location,
        })
    }

    /// Parse switch statement
    fn parse_switch_statement(
        &mut self,
        attributes: Vec<Attribute>,
    ) -> Result<Statement, ParseError> {
        let location = self.expect_token(&TokenKind::Switch, "")?;
        let selector = self.parse_condition()?;
        self.expect_lbrace("before switch body")?;

        let mut clauses = Vec::new();
        let mut has_default = false;

        while !self.check(&TokenKind::RBrace) {
            let clause_location = self.current_location();

            if self.match_token(&TokenKind::Case) {
                let mut selectors = Vec::new();
                loop {
                    selectors.push(self.parse_expression()?);
                    if !self.match_token(&TokenKind::Comma)
                        || self.check(&TokenKind::Colon)
                        || self.check(&TokenKind::LBrace)
                    {
                        break;
                    }
                }
                self.match_token(&TokenKind::Colon);
                let body = self.parse_block("for case body")?;

                clauses.push(SwitchClause::Case {
                    selectors,
                    body,
                    location: clause_location,
                });
            } else if self.check(&TokenKind::Default) {
                if has_default {
                    return Err(self.unexpected("'case' or '}'; a switch has at most one 'default'"));
                }
                self.advance();
                has_default = true;
                self.match_token(&TokenKind::Colon);
                let body = self.parse_block("for default body")?;

                clauses.push(SwitchClause::Default {
                    body,
                    location: clause_location,
                });
            } else {
                return Err(self.unexpected("'case', 'default' or '}' in switch body"));
            }
        }

        self.expect_rbrace("after switch body")?;

        Ok(Statement::Switch {
            selector,
            clauses,
            attributes,
            location,
        })
    }

    /// Parse for statement
    fn parse_for_statement(&mut self, attributes: Vec<Attribute>) -> Result<Statement, ParseError> {
        let location = self.expect_token(&TokenKind::For, "")?;
        self.expect_lparen("after 'for'")?;

        // Init (optional)
        let init = match self.peek_kind() {
            TokenKind::Semicolon => None,
            TokenKind::Var | TokenKind::Let | TokenKind::Const => Some(Box::new(
                Statement::Declaration(self.parse_variable_declaration(Vec::new())?),
            )),
            _ => Some(Box::new(self.parse_simple_statement()?)),
        };
        self.expect_semicolon("after for initializer")?;

        // Condition (optional)
        let condition = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semicolon("after for condition")?;

        // Increment (optional)
        let increment = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_simple_statement()?))
        };
        self.expect_rparen("after for clauses")?;

        let body = self.parse_block("for 'for' body")?;

        Ok(Statement::For {
            init,
            condition,
            increment,
            body,
            attributes,
            location,
        })
    }

    /// Parse `loop { ... continuing { ... } }`
    fn parse_loop_statement(&mut self, attributes: Vec<Attribute>) -> Result<Statement, ParseError> {
        let location = self.expect_token(&TokenKind::Loop, "")?;
        self.expect_lbrace("for 'loop' body")?;

        let mut body = Vec::new();
        let mut continuing = None;

        loop {
            while self.match_token(&TokenKind::Semicolon) {}
            if self.check(&TokenKind::RBrace) {
                break;
            }
            if self.match_token(&TokenKind::Continuing) {
                // Must be the last thing in the loop body
                continuing = Some(self.parse_block("for 'continuing' body")?);
                break;
            }
            body.push(self.parse_statement()?);
        }

        self.expect_rbrace("after loop body")?;

        Ok(Statement::Loop {
            body,
            continuing,
            attributes,
            location,
        })
    }
}
