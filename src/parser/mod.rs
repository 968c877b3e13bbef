//! Shader source parser
//!
//! This module transforms WGSL-style shader text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parser struct, errors, options and entry points (tokens → AST)
//! - [`ast`]: AST node definitions
//!
//! The grammar is split across `impl Parser` blocks in `declarations`,
//! `statements`, `types` and `expressions`.
//!
//! # Supported Subset
//!
//! - Directives: `enable` with one or more extension names
//! - Declarations: `alias`, `struct`, `fn`, `var`, `let`, `const`, `override`,
//!   `static_assert` / `const_assert`
//! - Statements: assignments (including compound), `++`/`--`, calls, `if`/`else if`,
//!   `switch`, `for`, `while`, `loop`/`continuing`, `break`, `break if`,
//!   `continue`, `return`, `discard`
//! - Types: named types with `<...>` parameters, pointers, sized and runtime arrays
//! - Attributes on declarations, members, parameters, return types and types,
//!   and on control-flow statements and blocks
//! - No `diagnostic` or `requires` directives, no `[[...]]` attributes
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;
mod types;
