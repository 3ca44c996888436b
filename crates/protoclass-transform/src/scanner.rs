//! Collection of names involved in prototype-style code.
//!
//! The scanner only observes. Its result is reported for diagnostics and has
//! no influence on the phases that follow.

use crate::pattern::{is_define_property, prototype_of};
use protoclass_ast::*;
use std::collections::BTreeSet;

/// Names used as `Name.prototype`, as the object of a function-valued member
/// assignment, or as the target of `Object.defineProperty`.
pub fn scan(tree: &SyntaxTree) -> BTreeSet<String> {
    let mut scanner = Scanner::default();
    scanner.visit_block(tree, tree.root());
    scanner.names
}

#[derive(Default)]
struct Scanner {
    names: BTreeSet<String>,
}

impl Scanner {
    fn insert(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }
}

impl Visit for Scanner {
    fn visit_expr(&mut self, tree: &SyntaxTree, expr: &Node<Expr>) {
        match &expr.value {
            Expr::Member { object, property } if property.value.name == "prototype" => {
                if let Some(name) = object.value.as_ident() {
                    self.insert(name);
                }
            }
            Expr::Assignment { target, value, .. } => {
                if let Expr::Member { object, .. } = &target.value {
                    if let (Some(name), Expr::Function(_)) =
                        (object.value.as_ident(), &value.unparen().value)
                    {
                        self.insert(name);
                    }
                }
            }
            Expr::Call { callee, args } if is_define_property(callee) => {
                if let Some(target) = args.first() {
                    let target = target.unparen();
                    if let Some(name) = target.value.as_ident() {
                        self.insert(name);
                    } else if let Some(class) = prototype_of(target) {
                        self.insert(&class.value.name);
                    }
                }
            }
            _ => {}
        }
        walk_expr(self, tree, expr);
    }
}
