//! # Protoclass Parser
//!
//! Recursive descent parser for ECMAScript source units. Statements are
//! allocated into a [`SyntaxTree`] arena together with their surrounding
//! trivia so the printer can reproduce untouched regions byte for byte.
//! Uses Pratt parsing for expressions with proper operator precedence.

use protoclass_ast::*;
use protoclass_lexer::{parse_number, Token, TokenKind};

// Module declarations
mod error;
mod parser;
mod expr;
mod stmt;
mod decl;
mod pattern;
mod helpers;

// Re-export public types
pub use error::{ParseError, ParseResult};
pub use parser::Parser;

/// Lexes and parses a whole source unit.
///
/// Lexical errors surface as parse errors carrying the lexer's message.
pub fn parse(source: &str, file_id: usize) -> Result<SyntaxTree, Vec<ParseError>> {
    let (tokens, comments) = protoclass_lexer::lex(source, file_id);
    Parser::new(source, tokens, comments).parse_program()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> SyntaxTree {
        match parse(source, 0) {
            Ok(tree) => tree,
            Err(errors) => panic!("parse failed for {:?}: {:?}", source, errors),
        }
    }

    fn root_stmt(tree: &SyntaxTree, index: usize) -> &Stmt {
        &tree.stmt(tree.block_stmts(tree.root())[index]).value
    }

    fn expr_of(tree: &SyntaxTree, index: usize) -> &Expr {
        match root_stmt(tree, index) {
            Stmt::Expr(expr) => &expr.value,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_variable_declaration() {
        let tree = parse_ok("let x = 42;");
        assert_eq!(tree.block_stmts(tree.root()).len(), 1);

        match root_stmt(&tree, 0) {
            Stmt::VarDecl(decl) => {
                assert_eq!(decl.kind, VarDeclKind::Let);
                assert_eq!(decl.declarations.len(), 1);
                assert_eq!(
                    decl.declarations[0].pattern.value.as_ident().map(|i| i.value.name.as_str()),
                    Some("x")
                );
                assert!(matches!(
                    decl.declarations[0].init.as_ref().map(|e| &e.value),
                    Some(Expr::Literal(Literal::Number(n))) if *n == 42.0
                ));
            }
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_declaration() {
        let source = "function Point(x, y = 0, ...rest) {\n  this.x = x;\n}";
        let tree = parse_ok(source);

        let Stmt::Function(func) = root_stmt(&tree, 0) else {
            panic!("Expected function declaration");
        };
        assert_eq!(func.name.as_ref().map(|n| n.value.name.as_str()), Some("Point"));
        assert_eq!(func.params.len(), 3);
        assert!(func.params[2].is_rest);
        assert!(matches!(func.params[1].pattern.value, Pattern::Assignment { .. }));
        assert_eq!(tree.text(func.params_span), "(x, y = 0, ...rest)");

        let body = tree.block(func.body);
        assert_eq!(body.stmts.len(), 1);
        assert_eq!(&source[body.span.start..body.open_end], "{");
        assert_eq!(&source[body.trailing_start..body.span.end], "\n}");
        assert_eq!(body.owner, Some(tree.block_stmts(tree.root())[0]));
    }

    #[test]
    fn test_parse_prototype_assignment() {
        let tree = parse_ok("Foo.prototype.bar = function(a) { return a; };");

        let Expr::Assignment { target, op, value } = expr_of(&tree, 0) else {
            panic!("Expected assignment");
        };
        assert_eq!(*op, AssignmentOp::Assign);
        let Expr::Member { object, property } = &target.value else {
            panic!("Expected member target");
        };
        assert_eq!(property.value.name, "bar");
        let Expr::Member { object: class_ref, property: proto } = &object.value else {
            panic!("Expected Foo.prototype");
        };
        assert_eq!(class_ref.value.as_ident(), Some("Foo"));
        assert_eq!(proto.value.name, "prototype");
        assert!(matches!(value.value, Expr::Function(_)));
    }

    #[test]
    fn test_parse_class() {
        let source = r#"
class Shape extends Base {
  static count = 0;
  constructor(name) { super(); this.name = name; }
  get label() { return this.name; }
  set label(v) { this.name = v; }
  static create() { return new Shape("x"); }
  async *items() {}
  #secret = 1;
  static { Shape.count = 1; }
}
"#;
        let tree = parse_ok(source);

        let Stmt::Class(class) = root_stmt(&tree, 0) else {
            panic!("Expected class declaration");
        };
        assert_eq!(class.name.as_ref().map(|n| n.value.name.as_str()), Some("Shape"));
        assert!(class.extends.is_some());
        assert_eq!(class.members.len(), 8);
        assert!(class.constructor().is_some());

        let kinds: Vec<(MethodKind, bool)> = class
            .methods()
            .map(|m| (m.kind, m.is_static))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (MethodKind::Constructor, false),
                (MethodKind::Get, false),
                (MethodKind::Set, false),
                (MethodKind::Method, true),
                (MethodKind::Method, false),
            ]
        );

        let items = class.methods().nth(4).map(|m| &m.function);
        assert!(matches!(items, Some(f) if f.is_async && f.is_generator));
        assert!(matches!(class.members[7], ClassMember::StaticBlock(_)));
    }

    #[test]
    fn test_parse_get_and_set_as_method_names() {
        let tree = parse_ok("class Store { get() {} set(v) {} static() {} }");
        let Stmt::Class(class) = root_stmt(&tree, 0) else {
            panic!("Expected class declaration");
        };
        let names: Vec<_> = class
            .methods()
            .map(|m| (m.kind, m.is_static, m.key.static_name()))
            .collect();
        assert_eq!(
            names,
            vec![
                (MethodKind::Method, false, Some("get".to_string())),
                (MethodKind::Method, false, Some("set".to_string())),
                (MethodKind::Method, false, Some("static".to_string())),
            ]
        );
    }

    #[test]
    fn test_parse_object_literal() {
        let tree = parse_ok(
            "Object.defineProperty(Foo, 'size', { get: function() { return 1; }, set(v) {}, enumerable: true, x });",
        );

        let Expr::Call { callee, args } = expr_of(&tree, 0) else {
            panic!("Expected call");
        };
        assert!(matches!(&callee.value, Expr::Member { property, .. } if property.value.name == "defineProperty"));
        assert_eq!(args.len(), 3);
        assert!(matches!(&args[1].value, Expr::Literal(Literal::String(s)) if s == "size"));

        let Expr::Object(props) = &args[2].value else {
            panic!("Expected object literal");
        };
        assert_eq!(props.len(), 4);
        assert!(matches!(&props[0], ObjectProperty::Property { value, shorthand: false, .. }
            if matches!(value.value, Expr::Function(_))));
        assert!(matches!(&props[1], ObjectProperty::Method { kind: MethodKind::Method, .. }));
        assert!(matches!(&props[3], ObjectProperty::Property { shorthand: true, .. }));
    }

    #[test]
    fn test_parse_object_accessor_methods() {
        let tree = parse_ok("x = { get a() { return 1; }, set a(v) {}, async b() {}, *c() {} };");
        let Expr::Assignment { value, .. } = expr_of(&tree, 0) else {
            panic!("Expected assignment");
        };
        let Expr::Object(props) = &value.value else {
            panic!("Expected object literal");
        };
        let kinds: Vec<_> = props
            .iter()
            .filter_map(|p| match p {
                ObjectProperty::Method { kind, function, .. } => {
                    Some((*kind, function.is_async, function.is_generator))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (MethodKind::Get, false, false),
                (MethodKind::Set, false, false),
                (MethodKind::Method, true, false),
                (MethodKind::Method, false, true),
            ]
        );
    }

    #[test]
    fn test_parse_array_literals() {
        let tree = parse_ok("a = [];\nb = [1, , 2];\nc = [[1], [2, [3]]];\nd = { list: [x], n: 1 };\ne = [...rest, last,];");
        let value = |index| match expr_of(&tree, index) {
            Expr::Assignment { value, .. } => value.value.clone(),
            other => panic!("Expected assignment, got {:?}", other),
        };

        assert_eq!(value(0), Expr::Array(vec![]));

        let Expr::Array(holes) = value(1) else {
            panic!("Expected array");
        };
        let present: Vec<bool> = holes.iter().map(Option::is_some).collect();
        assert_eq!(present, vec![true, false, true]);

        let Expr::Array(outer) = value(2) else {
            panic!("Expected array");
        };
        assert_eq!(outer.len(), 2);
        assert!(matches!(&outer[1], Some(inner) if matches!(&inner.value, Expr::Array(items) if items.len() == 2)));

        let Expr::Object(props) = value(3) else {
            panic!("Expected object literal");
        };
        assert!(matches!(&props[0], ObjectProperty::Property { value, .. } if matches!(value.value, Expr::Array(_))));

        let Expr::Array(spread) = value(4) else {
            panic!("Expected array");
        };
        assert_eq!(spread.len(), 2);
        assert!(matches!(&spread[0], Some(first) if matches!(first.value, Expr::Spread(_))));
    }

    #[test]
    fn test_parse_array_destructuring() {
        let tree = parse_ok("var [a, , b = 1] = list;\n[a, b] = [b, a];");
        let Stmt::VarDecl(decl) = root_stmt(&tree, 0) else {
            panic!("Expected variable declaration");
        };
        assert!(matches!(
            &decl.declarations[0].pattern.value,
            Pattern::Array { elements, rest: None } if elements.len() == 3 && elements[1].is_none()
        ));
        assert!(matches!(expr_of(&tree, 1), Expr::Assignment { .. }));
    }

    #[test]
    fn test_parse_import_export() {
        let source = r#"
import def, { a as b, c } from "mod";
import * as ns from "./ns";
import "side-effect";
export { b as default, c };
export * from "other";
export default function Main() {}
export class Widget {}
export const answer = 42;
"#;
        let tree = parse_ok(source);
        assert_eq!(tree.block_stmts(tree.root()).len(), 8);

        let Stmt::Import(import) = root_stmt(&tree, 0) else {
            panic!("Expected import");
        };
        assert_eq!(import.source, "mod");
        assert_eq!(import.specifiers.len(), 3);

        let Stmt::Export(ExportDecl::DefaultDecl(main)) = root_stmt(&tree, 5) else {
            panic!("Expected export default declaration");
        };
        assert!(matches!(&tree.stmt(*main).value, Stmt::Function(f)
            if f.name.as_ref().map(|n| n.value.name.as_str()) == Some("Main")));
        assert_eq!(tree.slot(*main).parent, Parent::Stmt(tree.block_stmts(tree.root())[5]));

        let Stmt::Export(ExportDecl::Decl(widget)) = root_stmt(&tree, 6) else {
            panic!("Expected export declaration");
        };
        assert!(tree.stmt(*widget).value.as_class().is_some());
    }

    #[test]
    fn test_parse_control_flow() {
        let source = r#"
if (a) { b(); } else if (c) d(); else { e(); }
for (let i = 0; i < 10; i++) {}
for (const key in obj) {}
for (x of list) {}
for (var k = ("a" in o) ? 1 : 2; k; ) {}
while (x) { break; }
do { x--; } while (x > 0)
switch (v) { case 1: one(); break; default: other(); }
try { risky(); } catch (err) { handle(err); } finally { done(); }
try { risky(); } catch { }
outer: for (;;) { continue outer; }
"#;
        let tree = parse_ok(source);
        let kinds: Vec<&str> = tree
            .block_stmts(tree.root())
            .iter()
            .map(|id| match tree.stmt(*id).value {
                Stmt::If { .. } => "if",
                Stmt::For { .. } => "for",
                Stmt::ForIn { .. } => "for-in",
                Stmt::ForOf { .. } => "for-of",
                Stmt::While { .. } => "while",
                Stmt::DoWhile { .. } => "do-while",
                Stmt::Switch { .. } => "switch",
                Stmt::Try { .. } => "try",
                Stmt::Labeled { .. } => "labeled",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "if", "for", "for-in", "for-of", "for", "while", "do-while", "switch", "try",
                "try", "labeled"
            ]
        );

        let Stmt::Switch { cases, .. } = root_stmt(&tree, 7) else {
            panic!("Expected switch");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(tree.block_stmts(cases[0].consequent).len(), 2);
        assert!(cases[1].test.is_none());
    }

    #[test]
    fn test_parse_optional_chaining() {
        let tree = parse_ok("a?.b; a?.[0]; a?.(1);");
        assert!(matches!(expr_of(&tree, 0), Expr::OptionalMember { .. }));
        assert!(matches!(expr_of(&tree, 1), Expr::OptionalIndex { .. }));
        assert!(matches!(expr_of(&tree, 2), Expr::OptionalCall { .. }));
    }

    #[test]
    fn test_parse_arrows_and_parens() {
        let tree = parse_ok("f = (a, b) => a + b;\ng = x => x;\nh = async () => {};\nk = (a);");

        let arrow = |index| match expr_of(&tree, index) {
            Expr::Assignment { value, .. } => value.value.clone(),
            other => panic!("Expected assignment, got {:?}", other),
        };
        assert!(matches!(arrow(0), Expr::Arrow { ref params, is_async: false, .. } if params.len() == 2));
        assert!(matches!(arrow(1), Expr::Arrow { ref params, .. } if params.len() == 1));
        assert!(matches!(arrow(2), Expr::Arrow { body: ArrowBody::Block(_), is_async: true, .. }));
        assert!(matches!(arrow(3), Expr::Paren(_)));
    }

    #[test]
    fn test_parse_spread_yield_new() {
        let tree = parse_ok(
            "function* gen() { yield* other(); yield; }\nf(...args);\nnew a.b.C(1);\nnew Date;",
        );
        let Expr::Call { args, .. } = expr_of(&tree, 1) else {
            panic!("Expected call");
        };
        assert!(matches!(args[0].value, Expr::Spread(_)));

        let Expr::New { callee, args } = expr_of(&tree, 2) else {
            panic!("Expected new");
        };
        assert!(matches!(&callee.value, Expr::Member { property, .. } if property.value.name == "C"));
        assert_eq!(args.as_ref().map(Vec::len), Some(1));
        assert!(matches!(expr_of(&tree, 3), Expr::New { args: None, .. }));
    }

    #[test]
    fn test_parse_literals() {
        let tree = parse_ok("x = /ab+c/gi;\ny = `t ${z}`;\nn = 0x10;\nb = 10n;");
        let value = |index| match expr_of(&tree, index) {
            Expr::Assignment { value, .. } => value.value.clone(),
            other => panic!("Expected assignment, got {:?}", other),
        };
        assert_eq!(
            value(0),
            Expr::Literal(Literal::RegExp {
                pattern: "ab+c".to_string(),
                flags: "gi".to_string()
            })
        );
        assert!(matches!(value(1), Expr::Template { .. }));
        assert_eq!(value(2), Expr::Literal(Literal::Number(16.0)));
        assert!(matches!(value(3), Expr::Literal(Literal::BigInt(_))));
    }

    #[test]
    fn test_automatic_semicolon_insertion() {
        let tree = parse_ok("function f() {\n  return\n  value\n}\na\n++b");
        let Stmt::Function(func) = root_stmt(&tree, 0) else {
            panic!("Expected function");
        };
        let body = tree.block_stmts(func.body);
        assert_eq!(body.len(), 2);
        assert_eq!(tree.stmt(body[0]).value, Stmt::Return(None));

        assert_eq!(tree.block_stmts(tree.root()).len(), 3);
        assert!(matches!(expr_of(&tree, 2), Expr::Unary { op: UnaryOp::PreIncrement, .. }));
    }

    #[test]
    fn test_missing_semicolon_on_same_line_is_error() {
        let errors = parse("a b", 0).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_statement_trivia() {
        let source = "// leading\nfoo(); // trailing\n\n/* block */ bar();\n";
        let tree = parse_ok(source);
        let stmts = tree.block_stmts(tree.root()).to_vec();

        let first = tree.slot(stmts[0]);
        assert_eq!(&source[first.leading.start..first.leading.end], "// leading\n");
        assert_eq!(first.comments.len(), 1);
        assert_eq!(tree.text(first.node.span), "foo();");
        assert_eq!(first.trailing_end, source.find("// trailing").map(|i| i + 11).unwrap());

        let second = tree.slot(stmts[1]);
        assert_eq!(second.leading.start, first.trailing_end);
        assert_eq!(&source[second.leading.start..second.leading.end], "\n\n/* block */ ");
        assert_eq!(second.comments.len(), 1);

        let root = tree.block(tree.root());
        assert_eq!(&source[root.trailing_start..root.span.end], "\n");
        assert_eq!(tree.comments().len(), 3);
    }

    #[test]
    fn test_parents_are_linked() {
        let tree = parse_ok("if (a) b(); else { c(); }");
        let if_id = tree.block_stmts(tree.root())[0];
        let Stmt::If { then_stmt, else_stmt, .. } = &tree.stmt(if_id).value else {
            panic!("Expected if");
        };
        assert_eq!(tree.slot(*then_stmt).parent, Parent::Stmt(if_id));
        let else_id = else_stmt.unwrap();
        let Stmt::Block(block) = tree.stmt(else_id).value else {
            panic!("Expected block");
        };
        assert_eq!(tree.block(block).owner, Some(else_id));
        assert_eq!(tree.slot(tree.block_stmts(block)[0]).parent, Parent::Block(block));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("let = ;", 0).is_err());
        assert!(parse("function () {}", 0).is_err());
        assert!(parse("if (a {", 0).is_err());

        let errors = parse("x = \"unterminated", 0).unwrap_err();
        assert!(errors[0].message.contains("Unterminated"));
    }

    #[test]
    fn test_error_recovery_reports_multiple_errors() {
        let errors = parse("var = 1;\nfoo();\nconst = 2;", 0).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
