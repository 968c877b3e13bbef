//! Declaration parsing implementation
//!
//! This module handles parsing of module-scope declarations:
//!
//! - Directives: `enable f16, subgroups;`
//! - Type aliases: `alias Vec = vec3<f32>;`
//! - Struct definitions: `struct Name { member: type, ... }`
//! - Function definitions: `fn name(params) -> type { ... }`
//! - Variables: `var`, `let`, `const`, `override`
//! - Assertions: `static_assert` / `const_assert`
//!
//! # Grammar
//!
//! ```text
//! declaration ::= attribute* ( enable | alias | struct | function | variable ";" | assert )
//! struct      ::= "struct" name "{" ( member ( "," member )* ","? )? "}"
//! member      ::= attribute* name ":" type
//! function    ::= "fn" name "(" params ")" ( "->" attribute* type )? block
//! variable    ::= "var" ( "<" name ( "," name )? ">" )? name ( ":" type )? ( "=" expr )?
//!               | ( "let" | "const" ) name ( ":" type )? "=" expr
//!               | "override" name ( ":" type )? ( "=" expr )?
//! ```
//!
//! Attributes collected before the keyword belong to the declaration.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse one module-scope declaration, including its leading attributes
    pub(crate) fn parse_global_declaration(&mut self) -> Result<Declaration, ParseError> {
        let attributes = self.parse_attributes()?;

        match self.peek_kind() {
            TokenKind::Enable => {
                let location = self.advance().location;
                let name = self.expect_identifier("after 'enable'")?;
                let mut additional = Vec::new();
                while self.match_token(&TokenKind::Comma) && !self.check(&TokenKind::Semicolon) {
                    additional.push(self.expect_identifier("in enable list")?);
                }
                self.expect_semicolon("after enable directive")?;
                Ok(Declaration::Enable {
                    name,
                    additional,
                    attributes,
                    location,
                })
            }
            TokenKind::Alias => {
                let location = self.advance().location;
                let name = self.expect_identifier("for alias name")?;
                self.expect_token(&TokenKind::Eq, "after alias name")?;
                let ty = self.parse_type()?;
                self.expect_semicolon("after alias")?;
                Ok(Declaration::Alias {
                    name,
                    ty,
                    attributes,
                    location,
                })
            }
            TokenKind::Struct => self.parse_struct_declaration(attributes).map(Declaration::Struct),
            TokenKind::Fn => self.parse_function_declaration(attributes).map(Declaration::Function),
            TokenKind::Var | TokenKind::Let | TokenKind::Const | TokenKind::Override => {
                let decl = self.parse_variable_declaration(attributes)?;
                self.expect_semicolon("after variable declaration")?;
                Ok(Declaration::Variable(decl))
            }
            TokenKind::StaticAssert | TokenKind::ConstAssert => {
                let location = self.advance().location;
                let condition = self.parse_condition()?;
                self.expect_semicolon("after assertion")?;
                Ok(Declaration::StaticAssert {
                    condition,
                    attributes,
                    location,
                })
            }
            TokenKind::Requires => Err(self.unsupported("'requires' directive")),
            TokenKind::Diagnostic => Err(self.unsupported("'diagnostic' directive")),
            TokenKind::LBracket => Err(self.unsupported("'[[...]]' attribute syntax")),
            _ => Err(self.unexpected(
                "global declaration ('enable', 'alias', 'struct', 'fn', 'var', 'let', 'const', 'override' or 'static_assert')",
            )),
        }
    }

    /// Parse struct definition: struct Name { members }
    fn parse_struct_declaration(
        &mut self,
        attributes: Vec<Attribute>,
    ) -> Result<StructDecl, ParseError> {
        let location = self.expect_token(&TokenKind::Struct, "")?;
        let name = self.expect_identifier("for struct name")?;
        self.expect_lbrace("after struct name")?;

        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let member_attributes = self.parse_attributes()?;
            let member_location = self.current_location();
            let member_name = self.expect_identifier("for struct member")?;
            self.expect_token(&TokenKind::Colon, "after struct member name")?;
            let ty = self.parse_type()?;

            members.push(StructMember {
                name: member_name,
                ty,
                attributes: member_attributes,
                location: member_location,
            });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        self.expect_rbrace("after struct members")?;

        Ok(StructDecl {
            name,
            members,
            attributes,
            location,
        })
    }

    /// Parse function definition: fn name(params) -> type { body }
    fn parse_function_declaration(
        &mut self,
        attributes: Vec<Attribute>,
    ) -> Result<FunctionDecl, ParseError> {
        self.expect_token(&TokenKind::Fn, "")?;
        let name = self.expect_identifier("for function name")?;
        let location = self.previous_location();

        self.expect_lparen("after function name")?;
        let params = self.parse_parameter_list()?;
        self.expect_rparen("after parameters")?;

        let mut return_attributes = Vec::new();
        let mut return_type = None;
        if self.match_token(&TokenKind::Arrow) {
            return_attributes = self.parse_attributes()?;
            return_type = Some(self.parse_type()?);
        }

        let body = self.parse_block("before function body")?;

        Ok(FunctionDecl {
            name,
            params,
            return_type,
            return_attributes,
            body,
            attributes,
            location,
        })
    }

    /// Parse parameter list: (name: type, name: type, ...)
    fn parse_parameter_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();

        while !self.check(&TokenKind::RParen) {
            let attributes = self.parse_attributes()?;
            let location = self.current_location();
            let name = self.expect_identifier("for parameter name")?;
            self.expect_token(&TokenKind::Colon, "after parameter name")?;
            let ty = self.parse_type()?;

            params.push(Param {
                name,
                ty,
                attributes,
                location,
            });

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse `var`/`let`/`const`/`override` up to, but not including, the `;`
    pub(crate) fn parse_variable_declaration(
        &mut self,
        attributes: Vec<Attribute>,
    ) -> Result<VariableDecl, ParseError> {
        let location = self.current_location();
        let kind = match self.advance().kind {
            TokenKind::Var => VariableKind::Var,
            TokenKind::Let => VariableKind::Let,
            TokenKind::Const => VariableKind::Const,
            TokenKind::Override => VariableKind::Override,
            _ => {
                return Err(ParseError::Syntax {
                    expected: "'var', 'let', 'const' or 'override'".to_string(),
                    found: "declaration keyword".to_string(),
                    location,
                })
            }
        };

        let mut storage_class = None;
        let mut access_mode = None;
        if kind == VariableKind::Var && self.match_token(&TokenKind::Lt) {
            storage_class = Some(self.expect_identifier("for storage class")?);
            if self.match_token(&TokenKind::Comma) {
                access_mode = Some(self.expect_identifier("for access mode")?);
            }
            self.expect_closing_angle("after variable storage class")?;
        }

        let name = self.expect_identifier(&format!("after '{}'", kind.keyword()))?;

        let ty = if self.match_token(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };

        let initializer = match kind {
            VariableKind::Let | VariableKind::Const => {
                self.expect_token(
                    &TokenKind::Eq,
                    &format!("and initializer for '{}' declaration", kind.keyword()),
                )?;
                Some(self.parse_expression()?)
            }
            VariableKind::Var | VariableKind::Override => {
                if self.match_token(&TokenKind::Eq) {
                    Some(self.parse_expression()?)
                } else {
                    None
                }
            }
        };

        if ty.is_none() && initializer.is_none() {
            return Err(self.unexpected(format!(
                "':' type or '=' initializer for '{name}'"
            )));
        }

        Ok(VariableDecl {
            kind,
            name,
            ty,
            storage_class,
            access_mode,
            initializer,
            attributes,
            location,
        })
    }
}
