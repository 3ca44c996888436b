//! # Protoclass AST
//!
//! Syntax tree definitions for the protoclass rewriter.
//! Covers the ECMAScript dialect that legacy prototype-style code is written in,
//! plus class syntax so rewritten output can be parsed again.

use std::fmt;

// =============================================================================
// Core Types (kept in lib.rs - used by all modules)
// =============================================================================

/// Sentinel file id carried by spans of generated nodes.
pub const SYNTHESIZED_FILE: usize = usize::MAX;

/// Source location information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub file_id: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, file_id: usize) -> Self {
        Self { start, end, file_id }
    }

    /// Span for a node that has no source text.
    pub fn synthesized() -> Self {
        Self {
            start: 0,
            end: 0,
            file_id: SYNTHESIZED_FILE,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        self.file_id == SYNTHESIZED_FILE
    }

    pub fn merge(&self, other: &Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            file_id: self.file_id,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// AST node wrapper that includes span information
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub span: Span,
    pub value: T,
}

impl<T> Node<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { span, value }
    }

    pub fn synthesized(value: T) -> Self {
        Self {
            span: Span::synthesized(),
            value,
        }
    }
}

/// Identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// A comment collected by the lexer. The text is `source[span]`, delimiters included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Comment {
    pub kind: CommentKind,
    pub span: Span,
}

impl Comment {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start..self.span.end]
    }
}

// =============================================================================
// Module Declarations
// =============================================================================

pub mod expr;
pub mod stmt;
pub mod decl;
pub mod module;
pub mod tree;
pub mod visit;
pub mod line_index;

// =============================================================================
// Re-exports
// =============================================================================

pub use expr::*;
pub use stmt::*;
pub use decl::*;
pub use module::*;
pub use tree::*;
pub use visit::{walk_expr, walk_stmt, Child, Visit};
pub use line_index::LineIndex;

/// Returns true when `name` can be written as a bare identifier.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_span() -> Span {
        Span::new(0, 0, 0)
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(4, 9, 0);
        let b = Span::new(2, 6, 0);
        let merged = a.merge(&b);
        assert_eq!(merged.start, 2);
        assert_eq!(merged.end, 9);
        assert_eq!(merged.len(), 7);
    }

    #[test]
    fn test_synthesized_span() {
        assert!(Span::synthesized().is_synthesized());
        assert!(!dummy_span().is_synthesized());

        let node = Node::synthesized(Expr::This);
        assert!(node.span.is_synthesized());
    }

    #[test]
    fn test_expressions() {
        let literal = Expr::Literal(Literal::Number(42.0));
        assert!(matches!(literal, Expr::Literal(Literal::Number(n)) if n == 42.0));

        let ident = Expr::Ident(Ident::new("x"));
        assert!(matches!(ident, Expr::Ident(_)));
    }

    #[test]
    fn test_unparen_keeps_inner_span() {
        let inner = Node::new(Expr::Ident(Ident::new("x")), Span::new(2, 3, 0));
        let once = Node::new(Expr::Paren(Box::new(inner.clone())), Span::new(1, 4, 0));
        let twice = Node::new(Expr::Paren(Box::new(once)), Span::new(0, 5, 0));

        assert_eq!(twice.unparen(), &inner);
        assert_eq!(twice.value.unparen(), &inner.value);
        assert_eq!(twice.value.as_ident(), Some("x"));
        assert_eq!(inner.unparen().span, Span::new(2, 3, 0));
    }

    #[test]
    fn test_binary_op() {
        assert_eq!(format!("{}", BinaryOp::Add), "+");
        assert_eq!(format!("{}", BinaryOp::StrictEq), "===");
        assert_eq!(format!("{}", AssignmentOp::NullishAssign), "??=");
    }

    #[test]
    fn test_comment_text() {
        let source = "a; // note\n";
        let comment = Comment {
            kind: CommentKind::Line,
            span: Span::new(3, 10, 0),
        };
        assert_eq!(comment.text(source), "// note");
    }

    #[test]
    fn test_identifier_names() {
        assert!(is_identifier_name("size"));
        assert!(is_identifier_name("_private"));
        assert!(is_identifier_name("$el"));
        assert!(!is_identifier_name("foo-bar"));
        assert!(!is_identifier_name("2d"));
        assert!(!is_identifier_name(""));
    }
}
