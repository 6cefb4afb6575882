//! Syntax tree consumed by the evaluator
//!
//! Quickbeam does not parse source text. A host-side parser produces these
//! nodes, and the evaluator assumes the tree is structurally valid. The
//! taxonomy is deliberately wider than what the evaluator implements: loops
//! other than `for ... in`, unary and conditional expressions, destructuring
//! patterns and the like are representable so that a parser can hand them
//! over, and the evaluator answers them with
//! [`EvalError::UnsupportedConstruct`](crate::EvalError::UnsupportedConstruct).
//!
//! The associated constructor functions (`Expr::int`, `Stmt::const_`, ...)
//! exist so hosts and tests can assemble trees by hand.

use std::sync::Arc;

/// A whole program: the top-level statement list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements, evaluated in order
    pub body: Vec<Stmt>,
}

impl Program {
    /// Create a program from its statements.
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// An expression evaluated for its value or side effects: `f(x);`
    Expr(Expr),

    /// `let`/`const`/`var` declaration
    VarDecl(VarDecl),

    /// `function name(params) { ... }`
    FuncDecl(FuncDecl),

    /// `{ ... }`
    Block(Block),

    /// `if (cond) ... else ...`
    If(IfStmt),

    /// `return expr;`
    Return(Option<Expr>),

    /// `for (let x in expr) ...`
    ForIn(ForInStmt),

    /// A lone `;`
    Empty,

    /// `while (cond) ...` (not evaluated)
    While(WhileStmt),

    /// `break label;` (not evaluated)
    Break(Option<String>),

    /// `continue label;` (not evaluated)
    Continue(Option<String>),

    /// `throw expr;` (not evaluated)
    Throw(Expr),
}

/// Expression nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric, string or boolean literal
    Literal(Literal),

    /// Variable reference
    Ident(String),

    /// `[a, b, c]`
    Array(Vec<Expr>),

    /// `{ key: value, ... }`
    Object(Vec<Property>),

    /// Arrow function or anonymous function expression
    Function(Arc<FunctionDef>),

    /// `callee(args...)`
    Call(CallExpr),

    /// `object.property`
    Dot(DotExpr),

    /// `object[index]`
    Index(IndexExpr),

    /// `left op right`
    Binary(BinaryExpr),

    /// `target = value`, `target += value`, ...
    Assign(AssignExpr),

    /// `op operand` (not evaluated)
    Unary(UnaryExpr),

    /// `test ? consequent : alternate` (not evaluated)
    Conditional(ConditionalExpr),
}

/// Literal values as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Numeric literal in its source spelling (`2`, `2.0`, `1e3`).
    ///
    /// The evaluator decides between the integer and float subtypes from
    /// the spelling.
    Number(String),

    /// String literal with quotes removed and escapes resolved
    String(String),

    /// `true` or `false`
    Bool(bool),

    /// `null` (not evaluated)
    Null,

    /// `/pattern/flags` (not evaluated)
    Regex(String),
}

/// A `{ ... }` statement list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Statements in source order
    pub stmts: Vec<Stmt>,
}

impl Block {
    /// Create a block from its statements.
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// Declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
}

/// `let a = 1, b;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Declaration keyword
    pub kind: DeclKind,

    /// One element per declared binding
    pub list: Vec<BindingElement>,
}

/// A binding target with an optional default-value expression.
///
/// Used for declarations (`let x = 1`) and parameters (`(x = 1) => ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct BindingElement {
    /// What gets bound
    pub binding: Binding,

    /// Evaluated only when no value is supplied
    pub default: Option<Expr>,
}

/// Binding target.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A plain name
    Ident(String),

    /// `[a, b]` destructuring (not evaluated)
    Array(Vec<BindingElement>),

    /// `{a, b: c}` destructuring (not evaluated)
    Object(Vec<(String, BindingElement)>),
}

/// Formal parameter list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    /// Positional parameters
    pub items: Vec<BindingElement>,

    /// `...rest` (not evaluated)
    pub rest: Option<Binding>,
}

/// Shared definition behind function declarations and expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Name, if the function has one
    pub name: Option<String>,

    /// Formal parameters
    pub params: Params,

    /// Function body
    pub body: Block,
}

/// `function name(...) { ... }` as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    /// Name bound in the enclosing scope
    pub name: String,

    /// The function itself
    pub function: Arc<FunctionDef>,
}

/// `if` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Condition, tested for truthiness
    pub cond: Expr,

    /// Taken when the condition is truthy
    pub body: Box<Stmt>,

    /// Taken otherwise
    pub alternate: Option<Box<Stmt>>,
}

/// Left-hand side of `for ... in`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `for (let x in ...)`
    Decl(VarDecl),

    /// `for (x in ...)` (not evaluated)
    Expr(Expr),
}

/// `for (init in value) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStmt {
    /// Loop variable declaration
    pub init: ForInit,

    /// The iterated collection
    pub value: Expr,

    /// Loop body
    pub body: Box<Stmt>,
}

/// `while (cond) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// Loop condition
    pub cond: Expr,

    /// Loop body
    pub body: Box<Stmt>,
}

/// Object literal property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Property key
    pub key: PropertyKey,

    /// Property value
    pub value: Expr,
}

/// How an object literal spells a key.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// `{ x: ... }`
    Ident(String),

    /// `{ "x": ... }` or `{ 1: ... }`
    Literal(Literal),

    /// `{ [expr]: ... }`
    Computed(Expr),
}

/// `callee(args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// The called expression
    pub callee: Box<Expr>,

    /// Arguments in source order
    pub args: Vec<Expr>,
}

/// `object.property`
#[derive(Debug, Clone, PartialEq)]
pub struct DotExpr {
    /// Receiver
    pub object: Box<Expr>,

    /// Member name
    pub property: String,
}

/// `object[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpr {
    /// Receiver
    pub object: Box<Expr>,

    /// Key or position
    pub index: Box<Expr>,
}

/// `left op right`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Operator
    pub op: BinaryOp,

    /// Left operand
    pub left: Box<Expr>,

    /// Right operand
    pub right: Box<Expr>,
}

/// `target op value`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    /// Assignment operator
    pub op: AssignOp,

    /// Name, member or index expression
    pub target: Box<Expr>,

    /// Assigned value
    pub value: Box<Expr>,
}

/// `op operand`
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// Operator
    pub op: UnaryOp,

    /// Operand
    pub operand: Box<Expr>,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    /// Condition
    pub test: Box<Expr>,

    /// Value when truthy
    pub consequent: Box<Expr>,

    /// Value when falsy
    pub alternate: Box<Expr>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Exp,
    /// `==`
    Eq,
    /// `===`
    StrictEq,
    /// `!=`
    NotEq,
    /// `!==`
    StrictNotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Nullish,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `in`
    In,
    /// `instanceof`
    InstanceOf,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Eq => "==",
            BinaryOp::StrictEq => "===",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Nullish => "??",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `%=`
    Rem,
}

impl AssignOp {
    /// The binary operator a compound assignment desugars to.
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `!x`
    Not,
    /// `~x`
    BitNot,
    /// `typeof x`
    TypeOf,
}

// ═══════════════════════════════════════════════════════════════════════
// Node references and kind names
// ═══════════════════════════════════════════════════════════════════════

/// A borrowed statement or expression, handed to evaluation hooks.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    /// A statement node
    Stmt(&'a Stmt),
    /// An expression node
    Expr(&'a Expr),
}

impl NodeRef<'_> {
    /// Human-readable node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeRef::Stmt(stmt) => stmt.kind_name(),
            NodeRef::Expr(expr) => expr.kind_name(),
        }
    }
}

impl Stmt {
    /// Human-readable statement kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Stmt::Expr(_) => "expression statement",
            Stmt::VarDecl(_) => "variable declaration",
            Stmt::FuncDecl(_) => "function declaration",
            Stmt::Block(_) => "block",
            Stmt::If(_) => "if statement",
            Stmt::Return(_) => "return statement",
            Stmt::ForIn(_) => "for-in statement",
            Stmt::Empty => "empty statement",
            Stmt::While(_) => "while statement",
            Stmt::Break(_) => "break statement",
            Stmt::Continue(_) => "continue statement",
            Stmt::Throw(_) => "throw statement",
        }
    }
}

impl Expr {
    /// Human-readable expression kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Literal(_) => "literal",
            Expr::Ident(_) => "identifier",
            Expr::Array(_) => "array literal",
            Expr::Object(_) => "object literal",
            Expr::Function(_) => "function expression",
            Expr::Call(_) => "call expression",
            Expr::Dot(_) => "member access",
            Expr::Index(_) => "index access",
            Expr::Binary(_) => "binary expression",
            Expr::Assign(_) => "assignment",
            Expr::Unary(_) => "unary expression",
            Expr::Conditional(_) => "conditional expression",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Constructors
// ═══════════════════════════════════════════════════════════════════════

impl Expr {
    /// Numeric literal from its source spelling.
    pub fn number(raw: impl Into<String>) -> Self {
        Expr::Literal(Literal::Number(raw.into()))
    }

    /// Integer literal.
    pub fn int(n: i64) -> Self {
        Expr::number(n.to_string())
    }

    /// Float literal; always spelled with a fractional part.
    pub fn float(n: f64) -> Self {
        Expr::number(format!("{:?}", n))
    }

    /// String literal.
    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(s.into()))
    }

    /// Boolean literal.
    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    /// Variable reference.
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Array literal.
    pub fn array(items: Vec<Expr>) -> Self {
        Expr::Array(items)
    }

    /// Object literal with string-literal keys.
    pub fn object<K: Into<String>>(props: Vec<(K, Expr)>) -> Self {
        Expr::Object(
            props
                .into_iter()
                .map(|(key, value)| Property {
                    key: PropertyKey::Literal(Literal::String(key.into())),
                    value,
                })
                .collect(),
        )
    }

    /// Arrow function with plain parameters.
    pub fn arrow(params: &[&str], body: Vec<Stmt>) -> Self {
        Expr::Function(Arc::new(FunctionDef {
            name: None,
            params: Params::simple(params),
            body: Block::new(body),
        }))
    }

    /// Function expression with explicit parameters.
    pub fn function(params: Params, body: Vec<Stmt>) -> Self {
        Expr::Function(Arc::new(FunctionDef {
            name: None,
            params,
            body: Block::new(body),
        }))
    }

    /// Call expression.
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call(CallExpr {
            callee: Box::new(callee),
            args,
        })
    }

    /// Method call `object.method(args...)`.
    pub fn method(object: Expr, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::call(Expr::dot(object, method), args)
    }

    /// Member access.
    pub fn dot(object: Expr, property: impl Into<String>) -> Self {
        Expr::Dot(DotExpr {
            object: Box::new(object),
            property: property.into(),
        })
    }

    /// Index access.
    pub fn index(object: Expr, index: Expr) -> Self {
        Expr::Index(IndexExpr {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    /// Binary expression.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Plain assignment.
    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::assign_op(AssignOp::Assign, target, value)
    }

    /// Assignment with an explicit operator.
    pub fn assign_op(op: AssignOp, target: Expr, value: Expr) -> Self {
        Expr::Assign(AssignExpr {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }
}

impl Stmt {
    /// Expression statement.
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    /// `let name = init;`
    pub fn let_(name: impl Into<String>, init: Expr) -> Self {
        Stmt::decl(DeclKind::Let, name, Some(init))
    }

    /// `const name = init;`
    pub fn const_(name: impl Into<String>, init: Expr) -> Self {
        Stmt::decl(DeclKind::Const, name, Some(init))
    }

    /// Single-binding declaration.
    pub fn decl(kind: DeclKind, name: impl Into<String>, init: Option<Expr>) -> Self {
        Stmt::VarDecl(VarDecl {
            kind,
            list: vec![BindingElement::ident(name, init)],
        })
    }

    /// `{ ... }`
    pub fn block(stmts: Vec<Stmt>) -> Self {
        Stmt::Block(Block::new(stmts))
    }

    /// `if (cond) body else alternate`
    pub fn if_(cond: Expr, body: Stmt, alternate: Option<Stmt>) -> Self {
        Stmt::If(IfStmt {
            cond,
            body: Box::new(body),
            alternate: alternate.map(Box::new),
        })
    }

    /// `return value;`
    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }

    /// `for (kind name in value) body`
    pub fn for_in(kind: DeclKind, name: impl Into<String>, value: Expr, body: Stmt) -> Self {
        Stmt::ForIn(ForInStmt {
            init: ForInit::Decl(VarDecl {
                kind,
                list: vec![BindingElement::ident(name, None)],
            }),
            value,
            body: Box::new(body),
        })
    }

    /// `function name(params) { body }`
    pub fn function(name: impl Into<String>, params: &[&str], body: Vec<Stmt>) -> Self {
        let name = name.into();
        Stmt::FuncDecl(FuncDecl {
            name: name.clone(),
            function: Arc::new(FunctionDef {
                name: Some(name),
                params: Params::simple(params),
                body: Block::new(body),
            }),
        })
    }
}

impl BindingElement {
    /// A plain identifier binding.
    pub fn ident(name: impl Into<String>, default: Option<Expr>) -> Self {
        Self {
            binding: Binding::Ident(name.into()),
            default,
        }
    }
}

impl Params {
    /// Parameters without defaults.
    pub fn simple(names: &[&str]) -> Self {
        Self {
            items: names
                .iter()
                .map(|name| BindingElement::ident(*name, None))
                .collect(),
            rest: None,
        }
    }
}
