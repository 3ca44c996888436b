//! Registry of synthesized classes

use protoclass_ast::*;
use std::collections::HashMap;

/// Maps class names to the statements holding their synthesized classes.
///
/// Only classes produced by the synthesizer are registered; existing class
/// declarations in the source never receive members.
#[derive(Debug, Clone, Default)]
pub struct ClassRegistry {
    classes: HashMap<String, StmtId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class and returns the statement previously registered
    /// under the same name. The latest declaration wins.
    pub fn insert(&mut self, name: impl Into<String>, stmt: StmtId) -> Option<StmtId> {
        self.classes.insert(name.into(), stmt)
    }

    pub fn get(&self, name: &str) -> Option<StmtId> {
        self.classes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Body of the constructor of the class held by `class_stmt`.
pub fn constructor_body(tree: &SyntaxTree, class_stmt: StmtId) -> Option<BlockId> {
    tree.stmt(class_stmt)
        .value
        .as_class()?
        .constructor()
        .map(|constructor| constructor.function.body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_registration_wins() {
        let mut registry = ClassRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.insert("Foo", StmtId(1)), None);
        assert_eq!(registry.insert("Bar", StmtId(2)), None);
        assert_eq!(registry.insert("Foo", StmtId(7)), Some(StmtId(1)));

        assert_eq!(registry.get("Foo"), Some(StmtId(7)));
        assert!(registry.contains("Bar"));
        assert!(!registry.contains("foo"));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Bar", "Foo"]);
    }

    #[test]
    fn test_constructor_body_requires_class() {
        let source = "x;";
        let mut tree = SyntaxTree::new(source, 0);
        let span = Span::new(0, 2, 0);
        let stmt = tree.alloc_stmt(
            Node::new(Stmt::Expr(Node::new(Expr::Ident(Ident::new("x")), Span::new(0, 1, 0))), span),
            Span::new(0, 0, 0),
            2,
            Vec::new(),
        );
        tree.set_root_stmts(vec![stmt], 2);
        tree.link_parents();
        assert_eq!(constructor_body(&tree, stmt), None);
    }
}
