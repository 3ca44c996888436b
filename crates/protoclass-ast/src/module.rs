//! Module system definitions for the AST

use super::*;

/// Import declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// import name from "module"
    Default(Node<Ident>),

    /// import * as name from "module"
    Namespace(Node<Ident>),

    /// import { name } from "module" or import { name as alias } from "module"
    Named {
        imported: Node<Ident>,
        local: Option<Node<Ident>>,
    },
}

/// Export declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDecl {
    /// export { name }
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },

    /// export default expr
    Default(Node<Expr>),

    /// export default function/class; the declaration is its own statement
    DefaultDecl(StmtId),

    /// export * from "module"
    All {
        source: String,
        as_name: Option<Node<Ident>>,
    },

    /// export declaration; the declaration is its own statement
    Decl(StmtId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: Node<Ident>,
    pub exported: Option<Node<Ident>>,
}
