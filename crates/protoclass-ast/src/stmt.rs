//! Statement definitions for the AST
//!
//! Nested statements and statement lists are arena handles into the
//! owning [`SyntaxTree`]; everything below statement level is stored inline.

use super::*;
use std::fmt;

/// Statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement
    Expr(Node<Expr>),

    /// Variable declaration: let/const/var name = value
    VarDecl(VarDecl),

    /// Function declaration (the name is always present)
    Function(Function),

    /// Class declaration (the name is always present)
    Class(Class),

    /// Return statement
    Return(Option<Node<Expr>>),

    /// If statement
    If {
        condition: Node<Expr>,
        then_stmt: StmtId,
        else_stmt: Option<StmtId>,
    },

    /// For statement
    For {
        init: Option<ForInit>,
        condition: Option<Node<Expr>>,
        update: Option<Node<Expr>>,
        body: StmtId,
    },

    /// For-in statement: for (left in right) body
    ForIn {
        left: ForInLeft,
        right: Node<Expr>,
        body: StmtId,
    },

    /// For-of statement: for (left of right) body
    ForOf {
        left: ForInLeft,
        right: Node<Expr>,
        body: StmtId,
        is_await: bool,
    },

    /// While statement
    While { condition: Node<Expr>, body: StmtId },

    /// Do-while statement
    DoWhile { body: StmtId, condition: Node<Expr> },

    /// Block statement: { stmts }
    Block(BlockId),

    /// Break statement
    Break(Option<Node<Ident>>),

    /// Continue statement
    Continue(Option<Node<Ident>>),

    /// Throw statement
    Throw(Node<Expr>),

    /// Try-catch-finally statement
    Try {
        block: BlockId,
        catch: Option<CatchClause>,
        finally: Option<BlockId>,
    },

    /// Switch statement
    Switch {
        discriminant: Node<Expr>,
        cases: Vec<SwitchCase>,
    },

    /// Labeled statement
    Labeled { label: Node<Ident>, body: StmtId },

    /// Import declaration
    Import(ImportDecl),

    /// Export declaration
    Export(ExportDecl),

    /// Empty statement: ;
    Empty,

    /// Debugger statement
    Debugger,
}

impl Stmt {
    pub fn as_expr(&self) -> Option<&Node<Expr>> {
        match self {
            Stmt::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Stmt::Class(class) => Some(class),
            _ => None,
        }
    }
}

/// Variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarDeclKind,
    pub declarations: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarDeclKind {
    Let,
    Const,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub pattern: Node<Pattern>,
    pub init: Option<Node<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    VarDecl(VarDecl),
    Expr(Node<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInLeft {
    VarDecl(VarDecl),
    Pattern(Node<Pattern>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Node<Pattern>>,
    pub body: BlockId,
}

/// `case test:` or `default:` followed by its consequent list
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Node<Expr>>,
    pub consequent: BlockId,
}

/// Pattern for destructuring
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Identifier pattern
    Ident(Node<Ident>),

    /// Array pattern: [a, b, ...rest]
    Array {
        elements: Vec<Option<Node<Pattern>>>,
        rest: Option<Box<Node<Pattern>>>,
    },

    /// Object pattern: { a, b: c, ...rest }
    Object {
        properties: Vec<ObjectPatternProperty>,
        rest: Option<Box<Node<Pattern>>>,
    },

    /// Assignment pattern: pattern = default_value
    Assignment {
        pattern: Box<Node<Pattern>>,
        default: Box<Node<Expr>>,
    },

    /// Member target, only valid on the left of for-in/for-of
    Expr(Box<Node<Expr>>),
}

impl Pattern {
    pub fn as_ident(&self) -> Option<&Node<Ident>> {
        match self {
            Pattern::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: PropertyName,
    pub value: Node<Pattern>,
    pub shorthand: bool,
}

// Display implementations

impl fmt::Display for VarDeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarDeclKind::Let => write!(f, "let"),
            VarDeclKind::Const => write!(f, "const"),
            VarDeclKind::Var => write!(f, "var"),
        }
    }
}
