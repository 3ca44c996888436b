//! Read-only traversal over a [`SyntaxTree`].
//!
//! The default methods walk everything in source order. Override a method to
//! observe a node; call the matching `walk_*` function to keep descending.

use super::*;

/// A statement-level node directly nested in a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Child {
    Block(BlockId),
    Stmt(StmtId),
}

pub trait Visit {
    fn visit_stmt(&mut self, tree: &SyntaxTree, id: StmtId) {
        walk_stmt(self, tree, id);
    }

    fn visit_block(&mut self, tree: &SyntaxTree, block: BlockId) {
        walk_block(self, tree, block);
    }

    fn visit_expr(&mut self, tree: &SyntaxTree, expr: &Node<Expr>) {
        walk_expr(self, tree, expr);
    }

    fn visit_pattern(&mut self, tree: &SyntaxTree, pattern: &Node<Pattern>) {
        walk_pattern(self, tree, pattern);
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, block: BlockId) {
    for &id in tree.block_stmts(block) {
        v.visit_stmt(tree, id);
    }
}

pub fn walk_stmt<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, id: StmtId) {
    match &tree.stmt(id).value {
        Stmt::Expr(expr) | Stmt::Throw(expr) => v.visit_expr(tree, expr),
        Stmt::VarDecl(decl) => walk_var_decl(v, tree, decl),
        Stmt::Function(function) => walk_function(v, tree, function),
        Stmt::Class(class) => walk_class(v, tree, class),
        Stmt::Return(expr) => {
            if let Some(expr) = expr {
                v.visit_expr(tree, expr);
            }
        }
        Stmt::If {
            condition,
            then_stmt,
            else_stmt,
        } => {
            v.visit_expr(tree, condition);
            v.visit_stmt(tree, *then_stmt);
            if let Some(else_stmt) = else_stmt {
                v.visit_stmt(tree, *else_stmt);
            }
        }
        Stmt::For {
            init,
            condition,
            update,
            body,
        } => {
            match init {
                Some(ForInit::VarDecl(decl)) => walk_var_decl(v, tree, decl),
                Some(ForInit::Expr(expr)) => v.visit_expr(tree, expr),
                None => {}
            }
            if let Some(condition) = condition {
                v.visit_expr(tree, condition);
            }
            if let Some(update) = update {
                v.visit_expr(tree, update);
            }
            v.visit_stmt(tree, *body);
        }
        Stmt::ForIn { left, right, body } | Stmt::ForOf { left, right, body, .. } => {
            match left {
                ForInLeft::VarDecl(decl) => walk_var_decl(v, tree, decl),
                ForInLeft::Pattern(pattern) => v.visit_pattern(tree, pattern),
            }
            v.visit_expr(tree, right);
            v.visit_stmt(tree, *body);
        }
        Stmt::While { condition, body } => {
            v.visit_expr(tree, condition);
            v.visit_stmt(tree, *body);
        }
        Stmt::DoWhile { body, condition } => {
            v.visit_stmt(tree, *body);
            v.visit_expr(tree, condition);
        }
        Stmt::Block(block) => v.visit_block(tree, *block),
        Stmt::Try {
            block,
            catch,
            finally,
        } => {
            v.visit_block(tree, *block);
            if let Some(catch) = catch {
                if let Some(param) = &catch.param {
                    v.visit_pattern(tree, param);
                }
                v.visit_block(tree, catch.body);
            }
            if let Some(finally) = finally {
                v.visit_block(tree, *finally);
            }
        }
        Stmt::Switch {
            discriminant,
            cases,
        } => {
            v.visit_expr(tree, discriminant);
            for case in cases {
                if let Some(test) = &case.test {
                    v.visit_expr(tree, test);
                }
                v.visit_block(tree, case.consequent);
            }
        }
        Stmt::Labeled { body, .. } => v.visit_stmt(tree, *body),
        Stmt::Export(export) => match export {
            ExportDecl::Default(expr) => v.visit_expr(tree, expr),
            ExportDecl::Decl(decl) | ExportDecl::DefaultDecl(decl) => v.visit_stmt(tree, *decl),
            ExportDecl::Named { .. } | ExportDecl::All { .. } => {}
        },
        Stmt::Import(_)
        | Stmt::Break(_)
        | Stmt::Continue(_)
        | Stmt::Empty
        | Stmt::Debugger => {}
    }
}

fn walk_var_decl<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, decl: &VarDecl) {
    for declarator in &decl.declarations {
        v.visit_pattern(tree, &declarator.pattern);
        if let Some(init) = &declarator.init {
            v.visit_expr(tree, init);
        }
    }
}

pub fn walk_function<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, function: &Function) {
    for param in &function.params {
        v.visit_pattern(tree, &param.pattern);
    }
    v.visit_block(tree, function.body);
}

pub fn walk_class<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, class: &Class) {
    if let Some(extends) = &class.extends {
        v.visit_expr(tree, extends);
    }
    for member in &class.members {
        match member {
            ClassMember::Method(method) => {
                walk_property_name(v, tree, &method.value.key);
                walk_function(v, tree, &method.value.function);
            }
            ClassMember::Property(property) => {
                walk_property_name(v, tree, &property.value.key);
                if let Some(value) = &property.value.value {
                    v.visit_expr(tree, value);
                }
            }
            ClassMember::StaticBlock(block) => v.visit_block(tree, block.value),
        }
    }
}

fn walk_property_name<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, key: &PropertyName) {
    if let PropertyName::Computed(expr) = key {
        v.visit_expr(tree, expr);
    }
}

pub fn walk_expr<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, expr: &Node<Expr>) {
    match &expr.value {
        Expr::Literal(_)
        | Expr::Ident(_)
        | Expr::This
        | Expr::Super
        | Expr::Template { .. }
        | Expr::MetaProperty { .. } => {}
        Expr::Binary { left, right, .. } => {
            v.visit_expr(tree, left);
            v.visit_expr(tree, right);
        }
        Expr::Unary { expr, .. }
        | Expr::Await(expr)
        | Expr::Paren(expr)
        | Expr::Spread(expr) => v.visit_expr(tree, expr),
        Expr::Assignment { target, value, .. } => {
            v.visit_expr(tree, target);
            v.visit_expr(tree, value);
        }
        Expr::Call { callee, args } | Expr::OptionalCall { callee, args } => {
            v.visit_expr(tree, callee);
            for arg in args {
                v.visit_expr(tree, arg);
            }
        }
        Expr::New { callee, args } => {
            v.visit_expr(tree, callee);
            for arg in args.iter().flatten() {
                v.visit_expr(tree, arg);
            }
        }
        Expr::Member { object, .. } | Expr::OptionalMember { object, .. } => {
            v.visit_expr(tree, object)
        }
        Expr::Index { object, index } | Expr::OptionalIndex { object, index } => {
            v.visit_expr(tree, object);
            v.visit_expr(tree, index);
        }
        Expr::Array(elements) => {
            for element in elements.iter().flatten() {
                v.visit_expr(tree, element);
            }
        }
        Expr::Object(properties) => {
            for property in properties {
                match property {
                    ObjectProperty::Property { key, value, .. } => {
                        walk_property_name(v, tree, key);
                        v.visit_expr(tree, value);
                    }
                    ObjectProperty::Method { key, function, .. } => {
                        walk_property_name(v, tree, key);
                        walk_function(v, tree, function);
                    }
                    ObjectProperty::Spread(expr) => v.visit_expr(tree, expr),
                }
            }
        }
        Expr::Arrow { params, body, .. } => {
            for param in params {
                v.visit_pattern(tree, &param.pattern);
            }
            match body {
                ArrowBody::Expr(expr) => v.visit_expr(tree, expr),
                ArrowBody::Block(block) => v.visit_block(tree, *block),
            }
        }
        Expr::Function(function) => walk_function(v, tree, function),
        Expr::Class(class) => walk_class(v, tree, class),
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(tree, condition);
            v.visit_expr(tree, then_expr);
            v.visit_expr(tree, else_expr);
        }
        Expr::TaggedTemplate { tag, .. } => v.visit_expr(tree, tag),
        Expr::Sequence(exprs) => {
            for expr in exprs {
                v.visit_expr(tree, expr);
            }
        }
        Expr::Yield { argument, .. } => {
            if let Some(argument) = argument {
                v.visit_expr(tree, argument);
            }
        }
    }
}

pub fn walk_pattern<V: Visit + ?Sized>(v: &mut V, tree: &SyntaxTree, pattern: &Node<Pattern>) {
    match &pattern.value {
        Pattern::Ident(_) => {}
        Pattern::Array { elements, rest } => {
            for element in elements.iter().flatten() {
                v.visit_pattern(tree, element);
            }
            if let Some(rest) = rest {
                v.visit_pattern(tree, rest);
            }
        }
        Pattern::Object { properties, rest } => {
            for property in properties {
                walk_property_name(v, tree, &property.key);
                v.visit_pattern(tree, &property.value);
            }
            if let Some(rest) = rest {
                v.visit_pattern(tree, rest);
            }
        }
        Pattern::Assignment { pattern, default } => {
            v.visit_pattern(tree, pattern);
            v.visit_expr(tree, default);
        }
        Pattern::Expr(expr) => v.visit_expr(tree, expr),
    }
}
