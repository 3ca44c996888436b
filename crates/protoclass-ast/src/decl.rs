//! Function and class definitions for the AST

use super::*;
use std::fmt;

/// Function declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Option<Node<Ident>>,
    pub params: Vec<Param>,
    /// `(` through `)` of the parameter list
    pub params_span: Span,
    pub body: BlockId,
    pub is_async: bool,
    pub is_generator: bool,
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub pattern: Node<Pattern>,
    pub is_rest: bool,
    pub span: Span,
}

/// Class declaration or expression
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub name: Option<Node<Ident>>,
    pub extends: Option<Box<Node<Expr>>>,
    pub members: Vec<ClassMember>,
}

impl Class {
    pub fn constructor(&self) -> Option<&MethodDef> {
        self.members.iter().find_map(|member| match member {
            ClassMember::Method(method) if method.value.kind == MethodKind::Constructor => {
                Some(&method.value)
            }
            _ => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDef> {
        self.members.iter().filter_map(|member| match member {
            ClassMember::Method(method) => Some(&method.value),
            _ => None,
        })
    }
}

/// Class member
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Constructor, method or accessor
    Method(Node<MethodDef>),

    /// Property/field: `name = init;`
    Property(Node<ClassProperty>),

    /// `static { ... }`
    StaticBlock(Node<BlockId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Constructor,
    Method,
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub kind: MethodKind,
    pub key: PropertyName,
    pub is_static: bool,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassProperty {
    pub key: PropertyName,
    pub value: Option<Node<Expr>>,
    pub is_static: bool,
}

// Display implementations

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Constructor => write!(f, "constructor"),
            MethodKind::Method => write!(f, "method"),
            MethodKind::Get => write!(f, "get"),
            MethodKind::Set => write!(f, "set"),
        }
    }
}
