//! Attachment of prototype and static methods to synthesized classes

use crate::diagnostics::{Diagnostic, DiagnosticKind, MemberRole, Severity, UnresolvedClassReference};
use crate::pattern::{Classification, MethodAssign};
use crate::registry::ClassRegistry;
use crate::synthesizer::method_member;
use crate::TransformReport;
use protoclass_ast::*;
use tracing::{debug, debug_span, info, warn};

/// Runs the instance pass, then the static pass.
///
/// Every attempt is logged with its location whether or not the class is
/// found. A miss leaves the assignment in place.
pub fn attach_methods(
    tree: &mut SyntaxTree,
    classification: &Classification,
    registry: &ClassRegistry,
    report: &mut TransformReport,
) {
    let lines = LineIndex::new(&tree.source);
    {
        let _span = debug_span!("attach_instance_methods").entered();
        for (id, method) in classification.instance_methods() {
            attach(tree, id, method, false, registry, &lines, report);
        }
    }
    {
        let _span = debug_span!("attach_static_methods").entered();
        for (id, method) in classification.static_methods() {
            attach(tree, id, method, true, registry, &lines, report);
        }
    }
}

fn attach(
    tree: &mut SyntaxTree,
    id: StmtId,
    assign: &MethodAssign,
    is_static: bool,
    registry: &ClassRegistry,
    lines: &LineIndex,
    report: &mut TransformReport,
) {
    let class = &assign.class.value.name;
    let method = &assign.method.value.name;
    let span = tree.stmt(id).span;
    let (line, column) = lines.line_col(&tree.source, span.start);

    info!(class = %class, method = %method, is_static, line, column, "adding method to class");
    report.push(Diagnostic::new(
        Severity::Note,
        DiagnosticKind::AttachAttempt {
            class: class.clone(),
            method: method.clone(),
            is_static,
        },
        span,
    ));

    let Some(class_stmt) = registry.get(class) else {
        warn!(class = %class, method = %method, line, column, "class not found for method; statement kept");
        let role = if is_static {
            MemberRole::StaticMethod
        } else {
            MemberRole::InstanceMethod
        };
        report.push(Diagnostic::unresolved(
            UnresolvedClassReference {
                class: class.clone(),
                member: method.clone(),
                role,
                strict: false,
            },
            span,
        ));
        return;
    };

    let member = method_member(
        MethodKind::Method,
        PropertyName::Ident(assign.method.clone()),
        is_static,
        &assign.function,
    );
    if !tree.push_class_member(class_stmt, member) {
        debug!(class = %class, "registered statement is not a class");
        return;
    }
    tree.remove_stmt(id);

    if is_static {
        report.static_methods += 1;
    } else {
        report.instance_methods += 1;
    }
    report.removed += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesizer::synthesize;
    use crate::TransformOptions;
    use protoclass_parser::parse;

    fn run(source: &str) -> (SyntaxTree, ClassRegistry, TransformReport) {
        let mut tree = parse(source, 0).unwrap();
        let classification = Classification::of(&tree, &TransformOptions::default());
        let mut registry = ClassRegistry::new();
        let mut report = TransformReport::default();
        synthesize(&mut tree, &classification, &mut registry, &mut report);
        attach_methods(&mut tree, &classification, &registry, &mut report);
        (tree, registry, report)
    }

    fn member_names(tree: &SyntaxTree, registry: &ClassRegistry, class: &str) -> Vec<(String, bool)> {
        let id = registry.get(class).unwrap();
        tree.stmt(id)
            .value
            .as_class()
            .unwrap()
            .methods()
            .map(|m| (m.key.static_name().unwrap(), m.is_static))
            .collect()
    }

    #[test]
    fn test_instance_methods_precede_static_methods() {
        let source = r#"
function Foo() {}
Foo.create = function () {};
Foo.prototype.run = function () {};
Foo.prototype.stop = function (force) {};
"#;
        let (tree, registry, report) = run(source);
        assert_eq!(
            member_names(&tree, &registry, "Foo"),
            vec![
                ("constructor".to_string(), false),
                ("run".to_string(), false),
                ("stop".to_string(), false),
                ("create".to_string(), true),
            ]
        );
        assert_eq!(report.instance_methods, 2);
        assert_eq!(report.static_methods, 1);
        assert_eq!(tree.block_stmts(tree.root()).len(), 1);
    }

    #[test]
    fn test_every_attempt_is_reported() {
        let source = "function Foo() {}\nFoo.prototype.a = function () {};\nBar.prototype.b = function () {};";
        let (tree, _, report) = run(source);

        let attempts: Vec<_> = report
            .diagnostics
            .iter()
            .filter(|d| matches!(d.kind, DiagnosticKind::AttachAttempt { .. }))
            .collect();
        assert_eq!(attempts.len(), 2);
        assert_eq!(report.count(Severity::Warning), 1);

        // The unresolved assignment stays in the program body
        assert_eq!(tree.block_stmts(tree.root()).len(), 2);
    }

    #[test]
    fn test_exports_are_never_static_methods() {
        let (tree, _, report) = run("function Foo() {}\nexports.helper = function () {};");
        assert_eq!(report.static_methods, 0);
        assert!(report.diagnostics.is_empty());
        assert_eq!(tree.block_stmts(tree.root()).len(), 2);
    }

    #[test]
    fn test_method_body_moves_to_class() {
        let source = "function Foo() {}\nFoo.prototype.run = function () {\n  return 1;\n};";
        let (tree, registry, _) = run(source);
        let class_stmt = registry.get("Foo").unwrap();
        let class = tree.stmt(class_stmt).value.as_class().unwrap();
        let run = class.methods().nth(1).unwrap();
        assert_eq!(tree.block(run.function.body).owner, Some(class_stmt));
        assert_eq!(tree.block_stmts(run.function.body).len(), 1);
    }
}
