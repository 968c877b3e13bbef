// AST (Abstract Syntax Tree) definitions for shader source

use rustc_hash::FxHashMap;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The location `n` columns to the right on the same line.
    pub fn shifted(self, n: usize) -> Self {
        Self {
            line: self.line,
            column: self.column + n,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// An `@name(args)` annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub arguments: Vec<Expression>,
    pub location: SourceLocation,
}

impl Attribute {
    /// Raw text of the first argument, if it is a literal or an identifier.
    ///
    /// `@group(0)` yields `"0"`, `@builtin(position)` yields `"position"`.
    pub fn value(&self) -> Option<&str> {
        match self.arguments.first()? {
            Expression::Literal { value, .. } => Some(value.as_str()),
            Expression::Identifier { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }
}

/// First attribute called `name`, in source order.
pub fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|attr| attr.name == name)
}

/// Groups attributes by name. Duplicates are kept in source order.
pub fn index_attributes(attributes: &[Attribute]) -> FxHashMap<&str, Vec<&Attribute>> {
    let mut index: FxHashMap<&str, Vec<&Attribute>> = FxHashMap::default();
    for attr in attributes {
        index.entry(attr.name.as_str()).or_default().push(attr);
    }
    index
}

/// A type specifier such as `f32`, `vec3<f32>`, `array<f32, 5>` or
/// `ptr<storage, T, read_write>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpecifier {
    pub name: String,
    /// Nested element type (`f32` in `vec3<f32>`)
    pub format: Option<Box<TypeSpecifier>>,
    /// Element count of a sized array, literal or constant expression
    pub count: Option<Box<Expression>>,
    pub storage_class: Option<String>,
    pub access_mode: Option<String>,
    pub attributes: Vec<Attribute>,
    pub location: SourceLocation,
}

impl TypeSpecifier {
    pub fn new(name: impl Into<String>, location: SourceLocation) -> Self {
        TypeSpecifier {
            name: name.into(),
            format: None,
            count: None,
            storage_class: None,
            access_mode: None,
            attributes: Vec::new(),
            location,
        }
    }

    pub fn with_format(mut self, format: TypeSpecifier) -> Self {
        self.format = Some(Box::new(format));
        self
    }

    pub fn with_count(mut self, count: Expression) -> Self {
        self.count = Some(Box::new(count));
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Raw text of the count when it was written as a literal.
    pub fn count_literal(&self) -> Option<&str> {
        match self.count.as_deref()? {
            Expression::Literal { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }
}

/// Primitive kind of a literal, inferred from its spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    AbstractInt,
    AbstractFloat,
    I32,
    U32,
    F32,
    F16,
    Bool,
}

impl LiteralKind {
    /// Infers the kind of a numeric literal from its suffix and shape.
    pub fn of_number(text: &str) -> Self {
        let is_hex = text.starts_with("0x") || text.starts_with("0X");
        let last = text.chars().last();

        if is_hex {
            let has_exponent = text.contains(&['p', 'P'][..]);
            return match last {
                Some('i') => LiteralKind::I32,
                Some('u') => LiteralKind::U32,
                Some('f') if has_exponent => LiteralKind::F32,
                Some('h') if has_exponent => LiteralKind::F16,
                _ if has_exponent || text.contains('.') => LiteralKind::AbstractFloat,
                _ => LiteralKind::AbstractInt,
            };
        }

        match last {
            Some('i') => LiteralKind::I32,
            Some('u') => LiteralKind::U32,
            Some('f') => LiteralKind::F32,
            Some('h') => LiteralKind::F16,
            _ if text.contains(&['.', 'e', 'E'][..]) => LiteralKind::AbstractFloat,
            _ => LiteralKind::AbstractInt,
        }
    }
}

/// Binary operators (arithmetic, bitwise, comparison)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

/// Short-circuiting operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,    // -x
    Not,    // !x
    BitNot, // ~x
    Deref,  // *x
    AddrOf, // &x
}

/// Assignment operators, plain and compound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BitAnd,
    BitOr,
    BitXor,
    Shr,
    Shl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncrementOp {
    Increment,
    Decrement,
}

/// Expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal {
        value: String,
        kind: LiteralKind,
        location: SourceLocation,
    },
    Identifier {
        name: String,
        location: SourceLocation,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        location: SourceLocation,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
        location: SourceLocation,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
        location: SourceLocation,
    },
    Member {
        object: Box<Expression>,
        member: String,
        location: SourceLocation,
    },
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
        location: SourceLocation,
    },
    Call {
        callee: String,
        args: Vec<Expression>,
        location: SourceLocation,
    },
    /// Value construction from an explicit type: `vec3<i32>(0, 1, 0)`, `array(a, b)`
    Construct {
        ty: TypeSpecifier,
        args: Vec<Expression>,
        location: SourceLocation,
    },
    Bitcast {
        ty: TypeSpecifier,
        value: Box<Expression>,
        location: SourceLocation,
    },
    /// Only produced when parentheses are preserved
    Grouped {
        inner: Box<Expression>,
        location: SourceLocation,
    },
}

impl Expression {
    /// Get the source location of this expression
    pub fn location(&self) -> SourceLocation {
        match self {
            Expression::Literal { location, .. }
            | Expression::Identifier { location, .. }
            | Expression::Unary { location, .. }
            | Expression::Binary { location, .. }
            | Expression::Logical { location, .. }
            | Expression::Member { location, .. }
            | Expression::Index { location, .. }
            | Expression::Call { location, .. }
            | Expression::Construct { location, .. }
            | Expression::Bitcast { location, .. }
            | Expression::Grouped { location, .. } => *location,
        }
    }

    /// Strips one outermost grouping, if any.
    pub fn ungrouped(self) -> Expression {
        match self {
            Expression::Grouped { inner, .. } => *inner,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
    Override,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
            VariableKind::Override => "override",
        }
    }
}

/// `var`, `let`, `const` or `override` declaration, at module scope or in a body
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub kind: VariableKind,
    pub name: String,
    pub ty: Option<TypeSpecifier>,
    pub storage_class: Option<String>,
    pub access_mode: Option<String>,
    pub initializer: Option<Expression>,
    pub attributes: Vec<Attribute>,
    pub location: SourceLocation,
}

/// Struct member
#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: String,
    pub ty: TypeSpecifier,
    pub attributes: Vec<Attribute>,
    pub location: SourceLocation,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeSpecifier,
    pub attributes: Vec<Attribute>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub name: String,
    pub members: Vec<StructMember>,
    pub attributes: Vec<Attribute>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Option<TypeSpecifier>,
    pub return_attributes: Vec<Attribute>,
    pub body: Vec<Statement>,
    pub attributes: Vec<Attribute>,
    pub location: SourceLocation,
}

/// Top-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `enable a, b;` keeps `a` in `name` and the rest in `additional`
    Enable {
        name: String,
        additional: Vec<String>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Alias {
        name: String,
        ty: TypeSpecifier,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Struct(StructDecl),
    Function(FunctionDecl),
    Variable(VariableDecl),
    StaticAssert {
        condition: Expression,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
}

impl Declaration {
    /// Short lowercase tag naming the declaration form
    pub fn kind_name(&self) -> &'static str {
        match self {
            Declaration::Enable { .. } => "enable",
            Declaration::Alias { .. } => "alias",
            Declaration::Struct(_) => "struct",
            Declaration::Function(_) => "function",
            Declaration::Variable(decl) => decl.kind.keyword(),
            Declaration::StaticAssert { .. } => "static_assert",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Declaration::Enable { name, .. } | Declaration::Alias { name, .. } => Some(name.as_str()),
            Declaration::Struct(decl) => Some(decl.name.as_str()),
            Declaration::Function(decl) => Some(decl.name.as_str()),
            Declaration::Variable(decl) => Some(decl.name.as_str()),
            Declaration::StaticAssert { .. } => None,
        }
    }

    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Declaration::Enable { attributes, .. }
            | Declaration::Alias { attributes, .. }
            | Declaration::StaticAssert { attributes, .. } => attributes,
            Declaration::Struct(decl) => &decl.attributes,
            Declaration::Function(decl) => &decl.attributes,
            Declaration::Variable(decl) => &decl.attributes,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Declaration::Enable { location, .. }
            | Declaration::Alias { location, .. }
            | Declaration::StaticAssert { location, .. } => *location,
            Declaration::Struct(decl) => decl.location,
            Declaration::Function(decl) => decl.location,
            Declaration::Variable(decl) => decl.location,
        }
    }
}

/// An `else if` arm of an `if` statement
#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub location: SourceLocation,
}

/// Switch clause
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchClause {
    Case {
        selectors: Vec<Expression>,
        body: Vec<Statement>,
        location: SourceLocation,
    },
    Default {
        body: Vec<Statement>,
        location: SourceLocation,
    },
}

/// Statements inside function bodies
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Declaration(VariableDecl),
    Assign {
        target: Expression,
        op: AssignOp,
        value: Expression,
        location: SourceLocation,
    },
    Increment {
        target: Expression,
        op: IncrementOp,
        location: SourceLocation,
    },
    Call {
        callee: String,
        args: Vec<Expression>,
        location: SourceLocation,
    },
    If {
        condition: Expression,
        body: Vec<Statement>,
        else_if: Vec<ElseIf>,
        else_body: Option<Vec<Statement>>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Switch {
        selector: Expression,
        clauses: Vec<SwitchClause>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    For {
        init: Option<Box<Statement>>,
        condition: Option<Expression>,
        increment: Option<Box<Statement>>,
        body: Vec<Statement>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Loop {
        body: Vec<Statement>,
        continuing: Option<Vec<Statement>>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
    Return {
        value: Option<Expression>,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    BreakIf {
        condition: Expression,
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Discard {
        location: SourceLocation,
    },
    StaticAssert {
        condition: Expression,
        location: SourceLocation,
    },
    Block {
        statements: Vec<Statement>,
        attributes: Vec<Attribute>,
        location: SourceLocation,
    },
}

impl Statement {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Statement::Declaration(decl) => decl.location,
            Statement::Assign { location, .. }
            | Statement::Increment { location, .. }
            | Statement::Call { location, .. }
            | Statement::If { location, .. }
            | Statement::Switch { location, .. }
            | Statement::For { location, .. }
            | Statement::While { location, .. }
            | Statement::Loop { location, .. }
            | Statement::Return { location, .. }
            | Statement::Break { location }
            | Statement::BreakIf { location, .. }
            | Statement::Continue { location }
            | Statement::Discard { location }
            | Statement::StaticAssert { location, .. }
            | Statement::Block { location, .. } => *location,
        }
    }

    /// Attributes written before a compound or control-flow statement
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Statement::If { attributes, .. }
            | Statement::Switch { attributes, .. }
            | Statement::For { attributes, .. }
            | Statement::While { attributes, .. }
            | Statement::Loop { attributes, .. }
            | Statement::Block { attributes, .. } => attributes,
            _ => &[],
        }
    }
}
