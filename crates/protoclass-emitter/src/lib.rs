//! # Protoclass Emitter
//!
//! Prints a [`SyntaxTree`] back to source text.
//!
//! Regions the transform did not touch are copied from the source byte for
//! byte. Dirty statement lists are rebuilt child by child, and generated
//! nodes (synthesized classes, appended statements) are rendered from the
//! tree. A tree without mutations prints exactly as its source.

mod members;
mod text;

pub use text::{format_number, quote_string};

use protoclass_ast::*;
use std::ops::Range;

/// Printer configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrintOptions {
    /// One level of indentation for generated class bodies. `None` follows
    /// the unit's own indentation.
    pub indent: Option<String>,
}

impl PrintOptions {
    pub fn spaces(width: usize) -> Self {
        Self {
            indent: Some(" ".repeat(width)),
        }
    }

    pub fn tabs() -> Self {
        Self {
            indent: Some("\t".to_string()),
        }
    }
}

/// Prints `tree` with the default options.
pub fn print(tree: &SyntaxTree) -> String {
    Printer::new(tree).print()
}

pub struct Printer<'t> {
    tree: &'t SyntaxTree,
    indent: String,
    /// Line break used for generated lines
    newline: &'static str,
    out: String,
    /// Output ranges whose line breaks belong to a string or template literal
    protected: Vec<Range<usize>>,
    /// Source spans of string and template literals that contain line breaks
    literals: Vec<Span>,
}

impl<'t> Printer<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        Self::with_options(tree, PrintOptions::default())
    }

    pub fn with_options(tree: &'t SyntaxTree, options: PrintOptions) -> Self {
        let indent = options
            .indent
            .unwrap_or_else(|| text::detect_indent(&tree.source));
        Self {
            tree,
            indent,
            newline: text::detect_newline(&tree.source),
            out: String::with_capacity(tree.source.len()),
            protected: Vec::new(),
            literals: multiline_literals(tree),
        }
    }

    pub fn print(mut self) -> String {
        if !self.tree.is_modified() {
            return self.tree.source.clone();
        }
        let root = self.tree.root();
        self.print_block(root);
        self.out
    }

    // =========================================================================
    // Blocks and statements
    // =========================================================================

    fn print_block(&mut self, id: BlockId) {
        let tree = self.tree;
        let block = tree.block(id);
        if !block.dirty {
            self.copy(block.span.start, block.span.end);
            return;
        }

        self.copy(block.span.start, block.open_end);
        let child_indent = self.child_indent(id);
        let mut last_generated = false;

        for &stmt in &block.stmts {
            let slot = tree.slot(stmt);
            if slot.origin == Origin::Synthesized {
                self.out.push_str(self.newline);
                self.out.push_str(&child_indent);
                self.print_generated_stmt(&slot.node, &child_indent);
                last_generated = true;
            } else {
                self.copy(slot.leading.start, slot.leading.end);
                self.print_stmt(stmt);
                self.copy(slot.node.span.end, slot.trailing_end);
                last_generated = false;
            }
        }

        let suffix = tree.source.get(block.trailing_start..block.span.end).unwrap_or("");
        if last_generated && !suffix.is_empty() && !suffix.contains('\n') {
            // Closing delimiter was on the same line as the last parsed child
            let base = text::line_indent(&tree.source, block.span.start);
            self.out.push_str(self.newline);
            self.out.push_str(&base);
            let skipped = suffix.len() - suffix.trim_start().len();
            self.copy(block.trailing_start + skipped, block.span.end);
        } else {
            self.copy(block.trailing_start, block.span.end);
        }
    }

    fn print_stmt(&mut self, id: StmtId) {
        let tree = self.tree;
        let slot = tree.slot(id);
        match slot.origin {
            Origin::Parsed if !slot.dirty => self.copy_span(slot.node.span),
            Origin::Parsed => self.splice(id),
            Origin::Replaced | Origin::Synthesized => {
                let indent = if slot.node.span.is_synthesized() {
                    String::new()
                } else {
                    text::line_indent(&tree.source, slot.node.span.start)
                };
                self.print_generated_stmt(&slot.node, &indent);
            }
        }
    }

    /// Original text of a parsed statement with its dirty nested blocks and
    /// statements regenerated in place.
    fn splice(&mut self, id: StmtId) {
        let tree = self.tree;
        let span = tree.stmt(id).span;

        let mut regions: Vec<(Span, Child)> = tree
            .children(id)
            .into_iter()
            .filter_map(|child| match child {
                Child::Block(block) if tree.block(block).dirty => Some((tree.block(block).span, child)),
                Child::Stmt(stmt) if tree.slot(stmt).dirty => Some((tree.stmt(stmt).span, child)),
                _ => None,
            })
            .collect();
        regions.sort_by_key(|(span, _)| span.start);

        let mut cursor = span.start;
        for (region, child) in regions {
            self.copy(cursor, region.start);
            match child {
                Child::Block(block) => self.print_block(block),
                Child::Stmt(stmt) => self.print_stmt(stmt),
            }
            cursor = region.end;
        }
        self.copy(cursor, span.end);
    }

    fn print_generated_stmt(&mut self, node: &Node<Stmt>, indent: &str) {
        match &node.value {
            Stmt::Class(class) => self.print_class(class, indent),
            Stmt::Expr(expr) => {
                self.print_expr(expr);
                self.out.push(';');
            }
            Stmt::Empty => self.out.push(';'),
            _ => self.copy_span(node.span),
        }
    }

    /// Indentation for statements appended to a block.
    fn child_indent(&self, id: BlockId) -> String {
        let tree = self.tree;
        let block = tree.block(id);
        let source = tree.source.as_str();

        for &stmt in &block.stmts {
            let slot = tree.slot(stmt);
            if slot.origin == Origin::Synthesized {
                continue;
            }
            let start = slot.node.span.start;
            let own_line = source
                .get(block.open_end..start)
                .map_or(false, |gap| gap.contains('\n'));
            if own_line || block.owner.is_none() {
                return text::line_indent(source, start);
            }
        }

        if block.owner.is_none() {
            return String::new();
        }
        format!(
            "{}{}",
            text::line_indent(source, block.span.start),
            self.indent
        )
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn copy_span(&mut self, span: Span) {
        if !span.is_synthesized() {
            self.copy(span.start, span.end);
        }
    }

    /// Appends `source[start..end]`, remembering where multi-line literals land.
    fn copy(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let Some(chunk) = self.tree.source.get(start..end) else {
            return;
        };
        let base = self.out.len();
        for literal in &self.literals {
            if literal.end <= start || literal.start >= end {
                continue;
            }
            let from = literal.start.max(start) - start;
            let to = literal.end.min(end) - start;
            self.protected.push(base + from..base + to);
        }
        self.out.push_str(chunk);
    }

    /// Prints a function body re-indented to `indent`.
    fn print_body(&mut self, block: BlockId, indent: &str) {
        let start = self.out.len();
        self.print_block(block);
        let original = text::line_indent(&self.tree.source, self.tree.block(block).span.start);
        self.reindent(start, &original, indent);
    }

    /// Replaces the `from` indentation of every line after the first one in
    /// `out[start..]` with `to`. Lines that start inside a literal are kept.
    fn reindent(&mut self, start: usize, from: &str, to: &str) {
        if from == to || start >= self.out.len() {
            return;
        }

        let segment = self.out.split_off(start);
        let mut shifted = String::with_capacity(segment.len());
        let mut edits: Vec<(usize, isize)> = Vec::new();
        let mut offset = start;

        for (i, line) in segment.split_inclusive('\n').enumerate() {
            let keep = i == 0 || line.trim().is_empty() || self.is_protected(offset - 1);
            if keep {
                shifted.push_str(line);
            } else {
                let common = line
                    .bytes()
                    .zip(from.bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                shifted.push_str(to);
                shifted.push_str(&line[common..]);
                edits.push((offset, to.len() as isize - common as isize));
            }
            offset += line.len();
        }
        self.out.push_str(&shifted);

        if edits.is_empty() {
            return;
        }
        for range in &mut self.protected {
            if range.start >= start {
                *range = text::shift_offset(range.start, &edits)..text::shift_offset(range.end, &edits);
            }
        }
    }

    fn is_protected(&self, offset: usize) -> bool {
        self.protected.iter().any(|range| range.contains(&offset))
    }
}

/// Spans of string and template literals whose text spans several lines.
fn multiline_literals(tree: &SyntaxTree) -> Vec<Span> {
    struct Collector {
        spans: Vec<Span>,
    }

    impl Visit for Collector {
        fn visit_expr(&mut self, tree: &SyntaxTree, expr: &Node<Expr>) {
            if matches!(
                expr.value,
                Expr::Template { .. } | Expr::TaggedTemplate { .. } | Expr::Literal(Literal::String(_))
            ) && tree.text(expr.span).contains('\n')
            {
                self.spans.push(expr.span);
            }
            walk_expr(self, tree, expr);
        }
    }

    let mut collector = Collector { spans: Vec::new() };
    collector.visit_block(tree, tree.root());
    collector.spans.sort_by_key(|span| span.start);
    collector.spans.dedup();
    collector.spans
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use protoclass_parser::parse;

    fn root_stmt(tree: &SyntaxTree, index: usize) -> StmtId {
        tree.block_stmts(tree.root())[index]
    }

    fn constructor_of(function: &Function) -> ClassMember {
        ClassMember::Method(Node::synthesized(MethodDef {
            kind: MethodKind::Constructor,
            key: PropertyName::Ident(Node::synthesized(Ident::new("constructor"))),
            is_static: false,
            function: Function {
                name: None,
                ..function.clone()
            },
        }))
    }

    /// Replaces the function declaration at `index` with a class.
    fn to_class(tree: &mut SyntaxTree, index: usize) -> StmtId {
        let id = root_stmt(tree, index);
        let Stmt::Function(function) = tree.stmt(id).value.clone() else {
            panic!("expected function declaration");
        };
        let class = Class {
            name: function.name.clone(),
            extends: None,
            members: vec![constructor_of(&function)],
        };
        tree.replace_stmt(id, Stmt::Class(class));
        id
    }

    #[test]
    fn test_unmodified_tree_is_byte_identical() {
        let source = "// header\nvar  a = 1 ;   // odd spacing\n\n\nfunction Foo( x ){\n\treturn x\n}\n/* tail */";
        let tree = parse(source, 0).unwrap();
        assert_eq!(print(&tree), source);
    }

    #[test]
    fn test_removed_statement_takes_its_trivia() {
        let source = "a();\n\n// about b\nb();\nc(); // keep\n";
        let mut tree = parse(source, 0).unwrap();
        let b = root_stmt(&tree, 1);
        tree.remove_stmt(b);
        assert_eq!(print(&tree), "a();\nc(); // keep\n");
    }

    #[test]
    fn test_synthesized_class_declaration() {
        let source = "// A point\nfunction Point(x, y) {\n  this.x = x;\n  this.y = y;\n}\n";
        let mut tree = parse(source, 0).unwrap();
        to_class(&mut tree, 0);
        assert_eq!(
            print(&tree),
            "// A point\nclass Point {\n  constructor(x, y) {\n    this.x = x;\n    this.y = y;\n  }\n}\n"
        );
    }

    #[test]
    fn test_appended_statement_follows_child_indent() {
        let source = "function Foo() {\n  this.a = 1;\n}\n";
        let mut tree = parse(source, 0).unwrap();
        let Stmt::Function(function) = tree.stmt(root_stmt(&tree, 0)).value.clone() else {
            panic!("expected function declaration");
        };
        let assignment = Expr::Assignment {
            target: Box::new(Node::synthesized(Expr::Member {
                object: Box::new(Node::synthesized(Expr::This)),
                property: Node::synthesized(Ident::new("b")),
            })),
            op: AssignmentOp::Assign,
            value: Box::new(Node::synthesized(Expr::Literal(Literal::String("two".into())))),
        };
        tree.append_stmt(function.body, Stmt::Expr(Node::synthesized(assignment)));
        assert_eq!(
            print(&tree),
            "function Foo() {\n  this.a = 1;\n  this.b = \"two\";\n}\n"
        );
    }

    #[test]
    fn test_append_to_empty_and_single_line_bodies() {
        let source = "function A() {}\nfunction B() { this.a = 1; }\n";
        let mut tree = parse(source, 0).unwrap();
        for index in 0..2 {
            let Stmt::Function(function) = tree.stmt(root_stmt(&tree, index)).value.clone() else {
                panic!("expected function declaration");
            };
            tree.append_stmt(function.body, Stmt::Empty);
        }
        assert_eq!(
            print(&tree),
            "function A() {\n  ;\n}\nfunction B() { this.a = 1;\n  ;\n}\n"
        );
    }

    #[test]
    fn test_nested_change_is_spliced() {
        let source = "if (ready) {\n  start();\n  stop();\n} else {\n  wait();\n}\n";
        let mut tree = parse(source, 0).unwrap();
        let Stmt::If { then_stmt, .. } = tree.stmt(root_stmt(&tree, 0)).value.clone() else {
            panic!("expected if statement");
        };
        let Stmt::Block(block) = tree.stmt(then_stmt).value.clone() else {
            panic!("expected block");
        };
        let stop = tree.block_stmts(block)[1];
        tree.remove_stmt(stop);
        assert_eq!(print(&tree), "if (ready) {\n  start();\n} else {\n  wait();\n}\n");
    }

    #[test]
    fn test_removed_direct_body_prints_empty_statement() {
        let source = "if (ready) start();\n";
        let mut tree = parse(source, 0).unwrap();
        let Stmt::If { then_stmt, .. } = tree.stmt(root_stmt(&tree, 0)).value.clone() else {
            panic!("expected if statement");
        };
        tree.remove_stmt(then_stmt);
        assert_eq!(print(&tree), "if (ready) ;\n");
    }

    #[test]
    fn test_multiline_template_is_not_reindented() {
        let source = "function View() {\n  this.html = `<p>\n  hi\n</p>`;\n}\n";
        let mut tree = parse(source, 0).unwrap();
        to_class(&mut tree, 0);
        assert_eq!(
            print(&tree),
            "class View {\n  constructor() {\n    this.html = `<p>\n  hi\n</p>`;\n  }\n}\n"
        );
    }

    #[test]
    fn test_class_members_and_keys() {
        let source = "function Foo() {}\nfunction helper(a) {\n  return a;\n}\n";
        let mut tree = parse(source, 0).unwrap();
        let class_stmt = to_class(&mut tree, 0);
        let Stmt::Function(helper) = tree.stmt(root_stmt(&tree, 1)).value.clone() else {
            panic!("expected function declaration");
        };

        let getter = ClassMember::Method(Node::synthesized(MethodDef {
            kind: MethodKind::Get,
            key: PropertyName::String("data-size".into()),
            is_static: false,
            function: Function {
                name: None,
                ..helper.clone()
            },
        }));
        let stat = ClassMember::Method(Node::synthesized(MethodDef {
            kind: MethodKind::Method,
            key: PropertyName::String("make".into()),
            is_static: true,
            function: Function {
                name: None,
                is_async: true,
                ..helper
            },
        }));
        assert!(tree.push_class_member(class_stmt, getter));
        assert!(tree.push_class_member(class_stmt, stat));
        tree.remove_stmt(root_stmt(&tree, 1));

        assert_eq!(
            print(&tree),
            "class Foo {\n  constructor() {}\n\n  get \"data-size\"(a) {\n    return a;\n  }\n\n  static async make(a) {\n    return a;\n  }\n}\n"
        );
    }

    #[test]
    fn test_tab_indentation() {
        let source = "function Foo() {\n\tthis.a = 1;\n}\n";
        let mut tree = parse(source, 0).unwrap();
        to_class(&mut tree, 0);
        let printed = Printer::with_options(&tree, PrintOptions::tabs()).print();
        assert_eq!(printed, "class Foo {\n\tconstructor() {\n\t\tthis.a = 1;\n\t}\n}\n");
    }

    #[test]
    fn test_default_indent_and_newline_follow_the_unit() {
        let source = "function Foo() {\r\n\tthis.a = 1;\r\n}\r\n";
        let mut tree = parse(source, 0).unwrap();
        to_class(&mut tree, 0);
        assert_eq!(
            print(&tree),
            "class Foo {\r\n\tconstructor() {\r\n\t\tthis.a = 1;\r\n\t}\r\n}\r\n"
        );
    }

    #[test]
    fn test_indented_class_inside_function() {
        let source = "(function () {\n  function Inner() {\n    this.a = 1;\n  }\n})();\n";
        let mut tree = parse(source, 0).unwrap();
        let inner = tree
            .preorder()
            .into_iter()
            .find(|&id| matches!(tree.stmt(id).value, Stmt::Function(_)))
            .unwrap();
        let Stmt::Function(function) = tree.stmt(inner).value.clone() else {
            unreachable!();
        };
        tree.replace_stmt(
            inner,
            Stmt::Class(Class {
                name: function.name.clone(),
                extends: None,
                members: vec![constructor_of(&function)],
            }),
        );
        assert_eq!(
            print(&tree),
            "(function () {\n  class Inner {\n    constructor() {\n      this.a = 1;\n    }\n  }\n})();\n"
        );
    }
}
