//! # Introduction
//!
//! wgsl-parse turns WGSL-style shader source into a typed syntax tree.  It does
//! no semantic analysis: names are not resolved and types are not checked, so
//! the tree reflects exactly what was written.
//!
//! ## Parsing pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Declarations
//! ```
//!
//! 1. [`parser::lexer`]: turns text into [`Token`]s.  Lexing never fails;
//!    unrecognized input becomes a [`TokenKind::Error`] token that the parser
//!    reports when it reaches it.
//! 2. [`parser::parse`]: the recursive descent [`Parser`], its [`ParseError`]
//!    and [`ParseOptions`], and the [`parse`] entry points.
//! 3. [`parser::ast`]: [`Declaration`], [`Statement`], [`Expression`] and
//!    [`TypeSpecifier`] nodes, each carrying a [`SourceLocation`].
//!
//! ## Example
//!
//! ```
//! use wgsl_parse::{parse, Declaration};
//!
//! let module = parse("alias Positions = array<vec3<f32>, 4>;").unwrap();
//! match &module[0] {
//!     Declaration::Alias { name, ty, .. } => {
//!         assert_eq!(name, "Positions");
//!         assert_eq!(ty.count_literal(), Some("4"));
//!     }
//!     _ => unreachable!(),
//! }
//! ```

pub mod parser;

pub use parser::ast::*;
pub use parser::lexer::{tokenize, Token, TokenKind};
pub use parser::parse::{
    parse, parse_optional, parse_tokens, parse_with_options, ParseError, ParseOptions, Parser,
};
