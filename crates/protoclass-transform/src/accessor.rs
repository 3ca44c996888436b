//! Conversion of `Object.defineProperty` descriptors into class accessors

use crate::diagnostics::{Diagnostic, DiagnosticKind, MemberRole, Severity, UnresolvedClassReference};
use crate::pattern::Classification;
use crate::registry::ClassRegistry;
use crate::synthesizer::method_member;
use crate::TransformReport;
use protoclass_ast::*;
use tracing::{debug, debug_span, error, warn};

/// Turns the `get` and `set` entries of each descriptor into accessor
/// members of the named class and deletes the call.
///
/// The class must exist: a call naming an unregistered class is reported as
/// an error and left untouched.
pub fn transform_accessors(
    tree: &mut SyntaxTree,
    classification: &Classification,
    registry: &ClassRegistry,
    report: &mut TransformReport,
) {
    let _span = debug_span!("transform_accessors").entered();

    for (id, call) in classification.accessors() {
        let class = &call.class.value.name;
        let property = call.property_name();
        let span = tree.stmt(id).span;

        let Some(class_stmt) = registry.get(class) else {
            error!(class = %class, property = %property, "class not found for accessor");
            report.push(Diagnostic::unresolved(
                UnresolvedClassReference {
                    class: class.clone(),
                    member: property,
                    role: MemberRole::Accessor,
                    strict: true,
                },
                span,
            ));
            continue;
        };

        match &call.entries {
            Some(entries) => {
                for entry in entries {
                    let member = method_member(entry.kind, call.property.clone(), false, &entry.function);
                    if tree.push_class_member(class_stmt, member) {
                        report.accessors += 1;
                    }
                }
                debug!(class = %class, property = %property, accessors = entries.len(), "converted descriptor");
            }
            None => {
                warn!(class = %class, property = %property, "descriptor is not an object literal; discarded");
                report.push(Diagnostic::new(
                    Severity::Warning,
                    DiagnosticKind::DescriptorDiscarded {
                        class: class.clone(),
                        property,
                    },
                    span,
                ));
            }
        }

        tree.remove_stmt(id);
        report.removed += 1;
    }
}
