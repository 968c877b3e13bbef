//! Type specifier and attribute parsing
//!
//! # Grammar
//!
//! ```text
//! attribute ::= "@" name ( "(" ( expr ( "," expr )* ","? )? ")" )?
//! type      ::= attribute* name ( "<" type_params ">" )?
//! ```
//!
//! Parameter lists are interpreted by the type name:
//! - `ptr<storage_class, T (, access)?>`
//! - `array<T (, count)?>`, `binding_array<T (, count)?>`
//! - anything else: `name<T (, count | access)?>`
//!
//! Array counts may use any binary operator, but `>`, `>=` and `>>` always
//! end the count, so the closing `>` is never taken for a comparison. A
//! closing `>` may come from a lexed `>>` (`array<vec4<f32>>`), see
//! [`Parser::expect_closing_angle`].

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Built-in type names that may be called as constructors without a
/// parameter list: `vec3f(...)`, `array(...)`, `f32(...)`.
pub(crate) fn is_constructible_type_name(name: &str) -> bool {
    match name {
        "bool" | "i32" | "u32" | "f32" | "f16" | "array" => true,
        _ => is_vector_name(name) || is_matrix_name(name),
    }
}

/// `vec2`..`vec4`, optionally with an `i`, `u`, `f` or `h` shorthand suffix
fn is_vector_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("vec") else {
        return false;
    };
    matches!(
        rest.as_bytes(),
        [b'2'..=b'4'] | [b'2'..=b'4', b'i' | b'u' | b'f' | b'h']
    )
}

/// `mat2x2`..`mat4x4`, optionally with an `f` or `h` shorthand suffix
fn is_matrix_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("mat") else {
        return false;
    };
    matches!(
        rest.as_bytes(),
        [b'2'..=b'4', b'x', b'2'..=b'4'] | [b'2'..=b'4', b'x', b'2'..=b'4', b'f' | b'h']
    )
}

impl Parser {
    /// Parse zero or more `@name(args)` attributes
    pub(crate) fn parse_attributes(&mut self) -> Result<Vec<Attribute>, ParseError> {
        let mut attributes = Vec::new();
        while self.check(&TokenKind::At) {
            attributes.push(self.parse_attribute()?);
        }
        Ok(attributes)
    }

    fn parse_attribute(&mut self) -> Result<Attribute, ParseError> {
        let location = self.expect_token(&TokenKind::At, "before attribute")?;

        // Attribute names may collide with keywords: `@const`, `@diagnostic(...)`
        let name = match self.peek_kind() {
            TokenKind::Ident(name) => name.clone(),
            kind if kind.is_keyword() => self.peek().text().to_string(),
            _ => return Err(self.unexpected("attribute name after '@'")),
        };
        self.advance();

        let mut arguments = Vec::new();
        if self.match_token(&TokenKind::LParen) {
            while !self.check(&TokenKind::RParen) {
                arguments.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect_rparen("to close attribute arguments")?;
        }

        Ok(Attribute {
            name,
            arguments,
            location,
        })
    }

    /// Parse a type specifier, including leading attributes such as `@stride(16)`
    pub(crate) fn parse_type(&mut self) -> Result<TypeSpecifier, ParseError> {
        let attributes = self.parse_attributes()?;
        let location = self.current_location();
        let name = self.expect_identifier("for type")?;

        let ty = TypeSpecifier::new(name, location).with_attributes(attributes);
        if self.check(&TokenKind::Lt) {
            self.parse_type_parameters(ty)
        } else {
            Ok(ty)
        }
    }

    /// Parse `< ... >` after a type name
    fn parse_type_parameters(&mut self, mut ty: TypeSpecifier) -> Result<TypeSpecifier, ParseError> {
        self.expect_token(&TokenKind::Lt, "to open type parameters")?;

        if ty.name == "ptr" {
            ty.storage_class = Some(self.expect_identifier("for pointer storage class")?);
            self.expect_token(&TokenKind::Comma, "after pointer storage class")?;
            ty = ty.with_format(self.parse_type()?);
            if self.match_token(&TokenKind::Comma) && !self.check_closing_angle() {
                ty.access_mode = Some(self.expect_identifier("for pointer access mode")?);
            }
        } else {
            ty = ty.with_format(self.parse_type()?);
            if self.match_token(&TokenKind::Comma) && !self.check_closing_angle() {
                let is_array = ty.name == "array" || ty.name == "binding_array";
                if is_array || matches!(self.peek_kind(), TokenKind::Number(_)) {
                    ty = ty.with_count(self.parse_template_expression()?);
                } else {
                    ty.access_mode = Some(self.expect_identifier("for access mode")?);
                }
            }
        }

        // Trailing comma before the closing '>'
        self.match_token(&TokenKind::Comma);
        self.expect_closing_angle(&format!("to close '{}' type parameters", ty.name))?;
        Ok(ty)
    }

    pub(crate) fn check_closing_angle(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Gt | TokenKind::GtGt | TokenKind::Ge | TokenKind::GtGtEq
        )
    }
}
