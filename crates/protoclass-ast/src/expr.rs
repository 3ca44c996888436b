//! Expression definitions for the AST

use super::*;
use std::fmt;

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal values
    Literal(Literal),

    /// Identifier
    Ident(Ident),

    /// Binary or logical operation: left op right
    Binary {
        left: Box<Node<Expr>>,
        op: BinaryOp,
        right: Box<Node<Expr>>,
    },

    /// Unary or update operation: op expr
    Unary {
        op: UnaryOp,
        expr: Box<Node<Expr>>,
    },

    /// Assignment: target = value
    Assignment {
        target: Box<Node<Expr>>,
        op: AssignmentOp,
        value: Box<Node<Expr>>,
    },

    /// Function call: callee(args)
    Call {
        callee: Box<Node<Expr>>,
        args: Vec<Node<Expr>>,
    },

    /// Member access: object.property
    Member {
        object: Box<Node<Expr>>,
        property: Node<Ident>,
    },

    /// Index access: object[index]
    Index {
        object: Box<Node<Expr>>,
        index: Box<Node<Expr>>,
    },

    /// Array literal: [elem1, elem2, ...]
    Array(Vec<Option<Node<Expr>>>),

    /// Object literal: { key1: value1, key2: value2 }
    Object(Vec<ObjectProperty>),

    /// Arrow function: (params) => body
    Arrow {
        params: Vec<Param>,
        body: ArrowBody,
        is_async: bool,
    },

    /// Function expression: function name?(params) { body }
    Function(Function),

    /// Class expression: class Name? { members }
    Class(Box<Class>),

    /// Ternary/conditional: condition ? then_expr : else_expr
    Ternary {
        condition: Box<Node<Expr>>,
        then_expr: Box<Node<Expr>>,
        else_expr: Box<Node<Expr>>,
    },

    /// Template literal, kept raw (substitutions included)
    Template { raw: String },

    /// Tagged template literal: tag`template`
    TaggedTemplate {
        tag: Box<Node<Expr>>,
        raw: String,
    },

    /// New expression: new Constructor(args)
    New {
        callee: Box<Node<Expr>>,
        args: Option<Vec<Node<Expr>>>,
    },

    /// Await expression: await expr
    Await(Box<Node<Expr>>),

    /// Parenthesized expression
    Paren(Box<Node<Expr>>),

    /// This expression
    This,

    /// Super expression
    Super,

    /// Sequence expression: expr1, expr2, ...
    Sequence(Vec<Node<Expr>>),

    /// Spread expression: ...expr (in call args, array literals)
    Spread(Box<Node<Expr>>),

    /// Optional chaining call: expr?.(args)
    OptionalCall {
        callee: Box<Node<Expr>>,
        args: Vec<Node<Expr>>,
    },

    /// Optional chaining index: expr?.[index]
    OptionalIndex {
        object: Box<Node<Expr>>,
        index: Box<Node<Expr>>,
    },

    /// Optional chaining member: expr?.prop
    OptionalMember {
        object: Box<Node<Expr>>,
        property: Node<Ident>,
    },

    /// Meta property: new.target, import.meta
    MetaProperty {
        meta: Node<Ident>,
        property: Node<Ident>,
    },

    /// Yield expression: yield expr, yield* expr
    Yield {
        argument: Option<Box<Node<Expr>>>,
        delegate: bool,
    },
}

impl Node<Expr> {
    /// Strips any number of enclosing parentheses, keeping the inner node's span.
    pub fn unparen(&self) -> &Node<Expr> {
        let mut node = self;
        while let Expr::Paren(inner) = &node.value {
            node = inner;
        }
        node
    }
}

impl Expr {
    /// Strips any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren(inner) => &inner.unparen().value,
            expr => expr,
        }
    }

    /// Name of a bare identifier expression.
    pub fn as_ident(&self) -> Option<&str> {
        match self.unparen() {
            Expr::Ident(ident) => Some(ident.name.as_str()),
            _ => None,
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    BigInt(String),
    RegExp { pattern: String, flags: String },
}

impl Literal {
    /// String, number, boolean or null: the literals a field initializer may carry.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Literal::Number(_) | Literal::String(_) | Literal::Boolean(_) | Literal::Null
        )
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,
    NullishCoalesce,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,
    UnsignedRightShift,

    // Other
    In,
    InstanceOf,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    TypeOf,
    Void,
    Delete,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostIncrement | UnaryOp::PostDecrement)
    }
}

/// Assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    LeftShiftAssign,
    RightShiftAssign,
    UnsignedRightShiftAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

/// Arrow function body
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expr(Box<Node<Expr>>),
    Block(BlockId),
}

/// Object property
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty {
    Property {
        key: PropertyName,
        value: Node<Expr>,
        shorthand: bool,
    },
    /// `key() {}`, `get key() {}`, `set key(v) {}`, `async key() {}`, `*key() {}`
    Method {
        kind: MethodKind,
        key: PropertyName,
        function: Function,
    },
    Spread(Node<Expr>),
}

/// Property name
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Ident(Node<Ident>),
    String(String),
    Number(f64),
    Computed(Box<Node<Expr>>),
}

impl PropertyName {
    /// Static name of the key, if it has one.
    pub fn static_name(&self) -> Option<String> {
        match self {
            PropertyName::Ident(ident) => Some(ident.value.name.clone()),
            PropertyName::String(s) => Some(s.clone()),
            PropertyName::Number(n) => Some(n.to_string()),
            PropertyName::Computed(_) => None,
        }
    }
}

// Display implementations

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::NullishCoalesce => "??",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LeftShift => "<<",
            BinaryOp::RightShift => ">>",
            BinaryOp::UnsignedRightShift => ">>>",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
            UnaryOp::PreIncrement => "++",
            UnaryOp::PreDecrement => "--",
            UnaryOp::PostIncrement => "++",
            UnaryOp::PostDecrement => "--",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for AssignmentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignmentOp::Assign => "=",
            AssignmentOp::AddAssign => "+=",
            AssignmentOp::SubAssign => "-=",
            AssignmentOp::MulAssign => "*=",
            AssignmentOp::DivAssign => "/=",
            AssignmentOp::ModAssign => "%=",
            AssignmentOp::PowAssign => "**=",
            AssignmentOp::LeftShiftAssign => "<<=",
            AssignmentOp::RightShiftAssign => ">>=",
            AssignmentOp::UnsignedRightShiftAssign => ">>>=",
            AssignmentOp::BitAndAssign => "&=",
            AssignmentOp::BitOrAssign => "|=",
            AssignmentOp::BitXorAssign => "^=",
            AssignmentOp::AndAssign => "&&=",
            AssignmentOp::OrAssign => "||=",
            AssignmentOp::NullishAssign => "??=",
        };
        write!(f, "{}", s)
    }
}
