//! # Protoclass Transform
//!
//! Rewrites prototype-style constructor functions into class declarations.
//!
//! One invocation works on one [`SyntaxTree`]:
//!
//! 1. the scanner collects the names involved in prototype code (reported only),
//! 2. every statement is classified against the recognized shapes,
//! 3. uppercase-named functions become classes and are registered by name,
//! 4. literal prototype fields move into the constructors,
//! 5. prototype methods, then static methods, become class methods,
//! 6. `Object.defineProperty` descriptors become accessors.
//!
//! Lookups that miss leave the source statement in place and produce a
//! [`Diagnostic`]; nothing aborts the transform.

pub mod accessor;
pub mod attacher;
pub mod diagnostics;
pub mod merger;
pub mod pattern;
pub mod registry;
pub mod scanner;
pub mod synthesizer;

pub use diagnostics::{Diagnostic, DiagnosticKind, MemberRole, Severity, UnresolvedClassReference};
pub use pattern::{classify, Classification, PatternMatch};
pub use registry::ClassRegistry;

use protoclass_ast::SyntaxTree;
use std::collections::BTreeSet;
use tracing::{debug, info_span};

/// Transform configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Also convert `var Name = function () {}` declarations
    pub convert_function_variables: bool,
}

/// Outcome of one transform invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformReport {
    /// In emission order
    pub diagnostics: Vec<Diagnostic>,
    /// Names collected by the scanner
    pub scanned_names: BTreeSet<String>,
    /// Synthesized classes, in source order
    pub classes: Vec<String>,
    pub fields_merged: usize,
    pub instance_methods: usize,
    pub static_methods: usize,
    pub accessors: usize,
    /// Statements deleted after their content moved into a class
    pub removed: usize,
}

impl TransformReport {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    /// Number of tree edits made
    pub fn changes(&self) -> usize {
        self.classes.len() + self.removed
    }
}

/// Runs every phase over `tree`.
pub fn transform(tree: &mut SyntaxTree, options: &TransformOptions) -> TransformReport {
    let _span = info_span!("transform", file_id = tree.file_id).entered();
    let mut report = TransformReport::default();

    report.scanned_names = scanner::scan(tree);
    debug!(names = ?report.scanned_names, "scanned prototype names");

    let classification = Classification::of(tree, options);
    debug!(matches = classification.len(), "classified statements");

    let mut registry = ClassRegistry::new();
    synthesizer::synthesize(tree, &classification, &mut registry, &mut report);
    merger::merge_fields(tree, &classification, &registry, &mut report);
    attacher::attach_methods(tree, &classification, &registry, &mut report);
    accessor::transform_accessors(tree, &classification, &registry, &mut report);

    report
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use protoclass_emitter::print;
    use protoclass_parser::parse;

    fn rewrite_with(source: &str, options: &TransformOptions) -> (String, TransformReport) {
        let mut tree = parse(source, 0).unwrap();
        let report = transform(&mut tree, options);
        (print(&tree), report)
    }

    fn rewrite(source: &str) -> (String, TransformReport) {
        rewrite_with(source, &TransformOptions::default())
    }

    #[test]
    fn test_constructor_conversion_keeps_comments() {
        let source = "// Shape base\nfunction Shape(name, sides) {\n  this.name = name;\n  this.sides = sides;\n}\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "// Shape base\nclass Shape {\n  constructor(name, sides) {\n    this.name = name;\n    this.sides = sides;\n  }\n}\n"
        );
        assert_eq!(report.classes, vec!["Shape"]);
    }

    #[test]
    fn test_lowercase_function_is_byte_identical() {
        let source = "function shape(a) {\n  return a;\n}\nshape.prototype.x = 1;\n";
        let (output, report) = rewrite(source);
        assert_eq!(output, source);
        assert!(report.classes.is_empty());
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_field_merged_into_constructor() {
        let source = "function Foo() {\n  this.a = 1;\n}\n\nFoo.prototype.bar = 5;\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n  constructor() {\n    this.a = 1;\n    this.bar = 5;\n  }\n}\n"
        );
        assert_eq!(report.fields_merged, 1);
    }

    #[test]
    fn test_instance_method_attached() {
        let source = "function Foo() {}\n\nFoo.prototype.baz = function (x) {\n  return x * 2;\n};\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n  constructor() {}\n\n  baz(x) {\n    return x * 2;\n  }\n}\n"
        );
        assert_eq!(report.instance_methods, 1);
    }

    #[test]
    fn test_static_method_attached_and_exports_ignored() {
        let source = "function Foo() {}\nFoo.qux = function () {\n  return 1;\n};\nexports.qux = function () {};\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n  constructor() {}\n\n  static qux() {\n    return 1;\n  }\n}\nexports.qux = function () {};\n"
        );
        assert_eq!(report.static_methods, 1);
    }

    #[test]
    fn test_accessors_in_descriptor_order() {
        let source = r#"function Foo() {}
Object.defineProperty(Foo, "size", {
  get: function () { return this._size; },
  set: function (v) { this._size = v; }
});
"#;
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n  constructor() {}\n\n  get size() { return this._size; }\n\n  set size(v) { this._size = v; }\n}\n"
        );
        assert_eq!(report.accessors, 2);
    }

    #[test]
    fn test_unresolved_method_stays_byte_identical() {
        let source = "function Foo() {}\nBar.prototype.a = function () {\n  return 1;\n};\nBar.b = 2;\nFoo.prototype.c = function () {};\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n  constructor() {}\n\n  c() {}\n}\nBar.prototype.a = function () {\n  return 1;\n};\nBar.b = 2;\n"
        );

        let unresolved: Vec<_> = report
            .diagnostics
            .iter()
            .filter_map(|d| match &d.kind {
                DiagnosticKind::UnresolvedClass(reference) => Some(reference.class.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(unresolved, vec!["Bar"]);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_strict_accessor_miss_is_an_error() {
        let source = "function Foo() {}\nObject.defineProperty(Missing, \"x\", { get: function () {} });\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n  constructor() {}\n}\nObject.defineProperty(Missing, \"x\", { get: function () {} });\n"
        );
        assert!(report.has_errors());
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let source = r#"/**
 * A counter.
 */
function Counter(start) {
  this.value = start;
}

Counter.prototype.step = 1;

Counter.prototype.next = function () {
  this.value += this.step;
  return this.value;
};

Counter.from = function (n) {
  return new Counter(n);
};

Object.defineProperty(Counter.prototype, "double", {
  get: function () {
    return this.value * 2;
  }
});

Helper.prototype.run = function () {};

module.exports = Counter;
"#;
        let (once, _) = rewrite(source);
        let (twice, report) = rewrite(&once);
        assert_eq!(twice, once);
        assert_eq!(report.changes(), 0);
        assert!(once.contains("class Counter {"));
        assert!(once.contains("Helper.prototype.run = function () {};"));
    }

    #[test]
    fn test_attach_order_is_source_order_then_static() {
        let source = "function Foo() {}\nFoo.make = function () {};\nFoo.prototype.b = function () {};\nFoo.prototype.a = function () {};\n";
        let expected = "class Foo {\n  constructor() {}\n\n  b() {}\n\n  a() {}\n\n  static make() {}\n}\n";
        let (first, _) = rewrite(source);
        let (second, _) = rewrite(source);
        assert_eq!(first, expected);
        assert_eq!(second, expected);
    }

    #[test]
    fn test_exported_declaration_becomes_exported_class() {
        let source = "export function Foo() {}\nFoo.prototype.a = 1;\n";
        let (output, _) = rewrite(source);
        assert_eq!(
            output,
            "export class Foo {\n  constructor() {\n    this.a = 1;\n  }\n}\n"
        );
    }

    #[test]
    fn test_function_variables_when_enabled() {
        let source = "var Foo = function (a) {\n  this.a = a;\n};\nFoo.prototype.b = 1;\n";
        let options = TransformOptions {
            convert_function_variables: true,
        };
        let (output, _) = rewrite_with(source, &options);
        assert_eq!(
            output,
            "class Foo {\n  constructor(a) {\n    this.a = a;\n    this.b = 1;\n  }\n}\n"
        );

        let (untouched, report) = rewrite(source);
        assert_eq!(untouched, source);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn test_array_valued_constructor_field() {
        let source = "function Stack() {\n  this.items = [];\n}\n\nStack.prototype.limit = 10;\n\nStack.prototype.push = function (x) {\n  this.items.push([x, this.items.length]);\n};\n";
        let (output, report) = rewrite(source);
        assert_eq!(
            output,
            "class Stack {\n  constructor() {\n    this.items = [];\n    this.limit = 10;\n  }\n\n  push(x) {\n    this.items.push([x, this.items.length]);\n  }\n}\n"
        );
        assert_eq!(report.fields_merged, 1);
        assert_eq!(report.instance_methods, 1);
    }

    #[test]
    fn test_array_prototype_value_is_not_merged() {
        let source = "function Foo() {}\nFoo.prototype.list = [];\n";
        let (output, report) = rewrite(source);
        assert_eq!(output, "class Foo {\n  constructor() {}\n}\nFoo.prototype.list = [];\n");
        assert_eq!(report.fields_merged, 0);
    }

    #[test]
    fn test_tab_indented_unit_keeps_tabs() {
        let source = "function Foo() {\n\tthis.a = 1;\n}\nFoo.prototype.b = function () {\n\treturn 1;\n};\n";
        let (output, _) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\n\tconstructor() {\n\t\tthis.a = 1;\n\t}\n\n\tb() {\n\t\treturn 1;\n\t}\n}\n"
        );
    }

    #[test]
    fn test_crlf_unit_keeps_line_endings() {
        let source = "function Foo() {\r\n  this.a = 1;\r\n}\r\nFoo.prototype.b = function () {\r\n  return 1;\r\n};\r\n";
        let (output, _) = rewrite(source);
        assert_eq!(
            output,
            "class Foo {\r\n  constructor() {\r\n    this.a = 1;\r\n  }\r\n\r\n  b() {\r\n    return 1;\r\n  }\r\n}\r\n"
        );
        assert!(!output.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_folded_statement_drops_its_comments() {
        let source = "function Foo() {}\n// about bar\nFoo.prototype.bar = function () {}; // trailing\n";
        let (output, _) = rewrite(source);
        assert_eq!(output, "class Foo {\n  constructor() {}\n\n  bar() {}\n}\n");
    }

    #[test]
    fn test_report_counts_and_scanned_names() {
        let source = "function Foo() {}\nFoo.prototype.a = 1;\nFoo.prototype.b = function () {};\nFoo.c = function () {};\nObject.defineProperty(Foo, 'd', { get() { return 1; } });\nlib.util = function () {};\n";
        let (_, report) = rewrite(source);

        assert_eq!(report.classes, vec!["Foo"]);
        assert_eq!(report.fields_merged, 1);
        assert_eq!(report.instance_methods, 1);
        assert_eq!(report.static_methods, 1);
        assert_eq!(report.accessors, 1);
        assert_eq!(report.removed, 4);
        assert_eq!(report.changes(), 5);
        assert!(report.scanned_names.contains("Foo"));
        assert!(report.scanned_names.contains("lib"));

        // `lib.util` is a static shape whose class does not exist
        assert_eq!(report.count(Severity::Warning), 1);
        assert_eq!(report.count(Severity::Note), 3);
    }
}
