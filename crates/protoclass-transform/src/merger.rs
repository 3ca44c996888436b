//! Merging of prototype field literals into constructors

use crate::diagnostics::{Diagnostic, DiagnosticKind, MemberRole, Severity, UnresolvedClassReference};
use crate::pattern::Classification;
use crate::registry::{constructor_body, ClassRegistry};
use crate::TransformReport;
use protoclass_ast::*;
use tracing::{debug, debug_span, error, warn};

/// Moves each `Name.prototype.member = <literal>` into the constructor of
/// `Name` as `this.member = <literal>;`, appended after the existing body.
///
/// Statements naming an unregistered class stay where they are.
pub fn merge_fields(
    tree: &mut SyntaxTree,
    classification: &Classification,
    registry: &ClassRegistry,
    report: &mut TransformReport,
) {
    let _span = debug_span!("merge_fields").entered();

    for (id, field) in classification.fields() {
        let class = &field.class.value.name;
        let member = &field.member.value.name;
        let span = tree.stmt(id).span;

        let Some(class_stmt) = registry.get(class) else {
            warn!(class = %class, member = %member, "class not found for field; statement kept");
            report.push(Diagnostic::unresolved(
                UnresolvedClassReference {
                    class: class.clone(),
                    member: member.clone(),
                    role: MemberRole::Field,
                    strict: false,
                },
                span,
            ));
            continue;
        };

        let Some(body) = constructor_body(tree, class_stmt) else {
            error!(class = %class, member = %member, "class has no constructor; statement kept");
            report.push(Diagnostic::new(
                Severity::Error,
                DiagnosticKind::MissingConstructor {
                    class: class.clone(),
                    member: member.clone(),
                },
                span,
            ));
            continue;
        };

        tree.append_stmt(body, Stmt::Expr(this_assignment(&field.member, field.value.clone())));
        tree.remove_stmt(id);
        report.fields_merged += 1;
        report.removed += 1;
        debug!(class = %class, member = %member, "merged field into constructor");
    }
}

/// `this.member = value`
fn this_assignment(member: &Node<Ident>, value: Node<Expr>) -> Node<Expr> {
    let target = Expr::Member {
        object: Box::new(Node::synthesized(Expr::This)),
        property: Node::synthesized(member.value.clone()),
    };
    Node::synthesized(Expr::Assignment {
        target: Box::new(Node::synthesized(target)),
        op: AssignmentOp::Assign,
        value: Box::new(value),
    })
}
