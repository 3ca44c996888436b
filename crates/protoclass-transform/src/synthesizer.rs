//! Class synthesis from constructor functions

use crate::diagnostics::{Diagnostic, DiagnosticKind, Severity};
use crate::pattern::{CandidateForm, Classification};
use crate::registry::ClassRegistry;
use crate::TransformReport;
use protoclass_ast::*;
use tracing::{debug, debug_span, info, warn};

/// Replaces every class candidate with a class holding a single constructor
/// and registers it by name.
///
/// The candidate's slot is reused, so comments leading the function lead the
/// class. For the variable form the whole declaration statement is replaced.
pub fn synthesize(
    tree: &mut SyntaxTree,
    classification: &Classification,
    registry: &mut ClassRegistry,
    report: &mut TransformReport,
) {
    let _span = debug_span!("synthesize").entered();

    for (id, candidate) in classification.candidates() {
        let name = candidate.name.value.name.clone();

        let mut constructor = candidate.function.clone();
        for modifier in dropped_modifiers(&constructor) {
            warn!(class = %name, modifier, "constructor cannot carry modifier; dropped");
            report.push(Diagnostic::new(
                Severity::Warning,
                DiagnosticKind::DroppedModifier {
                    class: name.clone(),
                    modifier,
                },
                candidate.name.span,
            ));
        }
        constructor.is_async = false;
        constructor.is_generator = false;

        let class = Class {
            name: Some(candidate.name.clone()),
            extends: None,
            members: vec![method_member(
                MethodKind::Constructor,
                PropertyName::Ident(Node::synthesized(Ident::new("constructor"))),
                false,
                &constructor,
            )],
        };
        tree.replace_stmt(id, Stmt::Class(class));

        info!(
            class = %name,
            variable = candidate.form == CandidateForm::Variable,
            "synthesized class"
        );

        if registry.insert(name.clone(), id).is_some() {
            debug!(class = %name, "class registered again; latest declaration wins");
            report.push(Diagnostic::new(
                Severity::Note,
                DiagnosticKind::RegistryOverwrite { class: name.clone() },
                candidate.name.span,
            ));
        }
        report.classes.push(name);
    }
}

fn dropped_modifiers(function: &Function) -> Vec<&'static str> {
    let mut modifiers = Vec::new();
    if function.is_async {
        modifiers.push("async");
    }
    if function.is_generator {
        modifiers.push("a generator");
    }
    modifiers
}

/// Class member wrapping `function`. The function loses its own name; the
/// member key names it instead.
pub(crate) fn method_member(
    kind: MethodKind,
    key: PropertyName,
    is_static: bool,
    function: &Function,
) -> ClassMember {
    ClassMember::Method(Node::synthesized(MethodDef {
        kind,
        key,
        is_static,
        function: Function {
            name: None,
            ..function.clone()
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransformOptions;
    use protoclass_parser::parse;

    fn run(source: &str) -> (SyntaxTree, ClassRegistry, TransformReport) {
        let mut tree = parse(source, 0).unwrap();
        let classification = Classification::of(&tree, &TransformOptions::default());
        let mut registry = ClassRegistry::new();
        let mut report = TransformReport::default();
        synthesize(&mut tree, &classification, &mut registry, &mut report);
        (tree, registry, report)
    }

    #[test]
    fn test_candidate_becomes_class_with_constructor() {
        let (tree, registry, report) = run("function Point(x, y) {\n  this.x = x;\n}");
        let id = registry.get("Point").unwrap();
        let class = tree.stmt(id).value.as_class().unwrap();

        assert_eq!(class.name.as_ref().unwrap().value.name, "Point");
        assert_eq!(class.members.len(), 1);
        let constructor = class.constructor().unwrap();
        assert_eq!(constructor.function.params.len(), 2);
        assert!(constructor.function.name.is_none());
        assert_eq!(tree.block_stmts(constructor.function.body).len(), 1);

        assert_eq!(tree.slot(id).origin, Origin::Replaced);
        assert_eq!(report.classes, vec!["Point"]);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_lowercase_functions_are_untouched() {
        let (tree, registry, report) = run("function point() {}");
        assert!(registry.is_empty());
        assert!(report.classes.is_empty());
        assert!(!tree.is_modified());
    }

    #[test]
    fn test_async_modifier_is_dropped_with_warning() {
        let (tree, registry, report) = run("async function Loader() {}");
        let id = registry.get("Loader").unwrap();
        let constructor = tree.stmt(id).value.as_class().unwrap().constructor().unwrap().clone();
        assert!(!constructor.function.is_async);

        assert_eq!(report.count(Severity::Warning), 1);
        assert!(matches!(
            &report.diagnostics[0].kind,
            DiagnosticKind::DroppedModifier { modifier: "async", .. }
        ));
    }

    #[test]
    fn test_duplicate_declaration_overwrites_registry() {
        let (_, registry, report) = run("function Foo() {}\nfunction Foo(a) {}");
        assert_eq!(registry.len(), 1);
        assert_eq!(report.classes, vec!["Foo", "Foo"]);
        assert_eq!(report.count(Severity::Note), 1);
    }
}
