//! Classification of statements into the recognized prototype shapes.
//!
//! Every live statement is classified once, before any phase edits the tree.
//! A statement matches at most one shape; the phases then act on the
//! extracted fields instead of re-probing the tree.

use crate::TransformOptions;
use protoclass_ast::*;

/// How a class candidate was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateForm {
    /// `function Name() {}`
    Declaration,
    /// `var Name = function () {}`
    Variable,
}

/// A function that becomes a class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCandidate {
    pub name: Node<Ident>,
    pub function: Function,
    pub form: CandidateForm,
}

/// `Name.prototype.member = <literal>`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLiteralAssign {
    pub class: Node<Ident>,
    pub member: Node<Ident>,
    pub value: Node<Expr>,
}

/// `Name.prototype.method = function () {}` or `Name.method = function () {}`
#[derive(Debug, Clone, PartialEq)]
pub struct MethodAssign {
    pub class: Node<Ident>,
    pub method: Node<Ident>,
    pub function: Function,
}

/// One `get` or `set` entry of a descriptor literal
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorEntry {
    pub kind: MethodKind,
    pub function: Function,
}

/// `Object.defineProperty(Name, "property", descriptor)`
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDescriptorCall {
    pub class: Node<Ident>,
    pub property: PropertyName,
    /// `None` when the descriptor is not an object literal
    pub entries: Option<Vec<AccessorEntry>>,
}

impl AccessorDescriptorCall {
    pub fn property_name(&self) -> String {
        self.property.static_name().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternMatch {
    ClassCandidate(ClassCandidate),
    FieldLiteralAssign(FieldLiteralAssign),
    PrototypeMethodAssign(MethodAssign),
    StaticMethodAssign(MethodAssign),
    AccessorDescriptorCall(AccessorDescriptorCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub stmt: StmtId,
    pub pattern: PatternMatch,
}

/// All matches of one tree, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    entries: Vec<Classified>,
}

impl Classification {
    pub fn of(tree: &SyntaxTree, options: &TransformOptions) -> Self {
        let entries = tree
            .preorder()
            .into_iter()
            .filter_map(|stmt| {
                classify(tree, stmt, options).map(|pattern| Classified { stmt, pattern })
            })
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Classified> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = (StmtId, &ClassCandidate)> {
        self.entries.iter().filter_map(|entry| match &entry.pattern {
            PatternMatch::ClassCandidate(candidate) => Some((entry.stmt, candidate)),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = (StmtId, &FieldLiteralAssign)> {
        self.entries.iter().filter_map(|entry| match &entry.pattern {
            PatternMatch::FieldLiteralAssign(field) => Some((entry.stmt, field)),
            _ => None,
        })
    }

    pub fn instance_methods(&self) -> impl Iterator<Item = (StmtId, &MethodAssign)> {
        self.entries.iter().filter_map(|entry| match &entry.pattern {
            PatternMatch::PrototypeMethodAssign(method) => Some((entry.stmt, method)),
            _ => None,
        })
    }

    pub fn static_methods(&self) -> impl Iterator<Item = (StmtId, &MethodAssign)> {
        self.entries.iter().filter_map(|entry| match &entry.pattern {
            PatternMatch::StaticMethodAssign(method) => Some((entry.stmt, method)),
            _ => None,
        })
    }

    pub fn accessors(&self) -> impl Iterator<Item = (StmtId, &AccessorDescriptorCall)> {
        self.entries.iter().filter_map(|entry| match &entry.pattern {
            PatternMatch::AccessorDescriptorCall(call) => Some((entry.stmt, call)),
            _ => None,
        })
    }
}

/// First character equals its own uppercase mapping. `_` and `$` have no
/// case and therefore qualify.
pub fn is_class_name(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return false;
    };
    first.to_uppercase().eq(std::iter::once(first))
}

/// Maps one statement to the shape it matches, if any.
pub fn classify(tree: &SyntaxTree, id: StmtId, options: &TransformOptions) -> Option<PatternMatch> {
    match &tree.stmt(id).value {
        Stmt::Function(function) => {
            let name = function.name.as_ref()?;
            if !is_class_name(&name.value.name) {
                return None;
            }
            Some(PatternMatch::ClassCandidate(ClassCandidate {
                name: name.clone(),
                function: function.clone(),
                form: CandidateForm::Declaration,
            }))
        }
        Stmt::VarDecl(decl) if options.convert_function_variables => function_variable(decl),
        Stmt::Expr(expr) => match &expr.unparen().value {
            Expr::Assignment {
                target,
                op: AssignmentOp::Assign,
                value,
            } => classify_assignment(target, value),
            Expr::Call { callee, args } => {
                descriptor_call(callee, args).map(PatternMatch::AccessorDescriptorCall)
            }
            _ => None,
        },
        _ => None,
    }
}

fn function_variable(decl: &VarDecl) -> Option<PatternMatch> {
    let [declarator] = decl.declarations.as_slice() else {
        return None;
    };
    let name = declarator.pattern.value.as_ident()?;
    if !is_class_name(&name.value.name) {
        return None;
    }
    let Expr::Function(function) = &declarator.init.as_ref()?.unparen().value else {
        return None;
    };
    Some(PatternMatch::ClassCandidate(ClassCandidate {
        name: name.clone(),
        function: function.clone(),
        form: CandidateForm::Variable,
    }))
}

fn classify_assignment(target: &Node<Expr>, value: &Node<Expr>) -> Option<PatternMatch> {
    let Expr::Member { object, property } = &target.value else {
        return None;
    };
    let value = value.unparen();

    if let Some(class) = prototype_of(object) {
        return match &value.value {
            Expr::Literal(literal) if literal.is_primitive() => {
                Some(PatternMatch::FieldLiteralAssign(FieldLiteralAssign {
                    class,
                    member: property.clone(),
                    value: value.clone(),
                }))
            }
            // A method named `constructor` would clash with the real one
            Expr::Function(function) if property.value.name != "constructor" => {
                Some(PatternMatch::PrototypeMethodAssign(MethodAssign {
                    class,
                    method: property.clone(),
                    function: function.clone(),
                }))
            }
            _ => None,
        };
    }

    let Expr::Ident(ident) = &object.value else {
        return None;
    };
    if ident.name == "exports" || property.value.name == "prototype" {
        return None;
    }
    let Expr::Function(function) = &value.value else {
        return None;
    };

    Some(PatternMatch::StaticMethodAssign(MethodAssign {
        class: Node::new(ident.clone(), object.span),
        method: property.clone(),
        function: function.clone(),
    }))
}

fn descriptor_call(callee: &Node<Expr>, args: &[Node<Expr>]) -> Option<AccessorDescriptorCall> {
    if !is_define_property(callee) || args.len() < 3 {
        return None;
    }

    let target = args[0].unparen();
    let class = match &target.value {
        Expr::Ident(ident) => Node::new(ident.clone(), target.span),
        _ => prototype_of(target)?,
    };

    let property = match &args[1].unparen().value {
        Expr::Literal(Literal::String(name)) => PropertyName::String(name.clone()),
        Expr::Literal(Literal::Number(n)) => PropertyName::Number(*n),
        _ => return None,
    };

    let entries = match &args[2].unparen().value {
        Expr::Object(properties) => Some(descriptor_entries(properties)),
        _ => None,
    };

    Some(AccessorDescriptorCall {
        class,
        property,
        entries,
    })
}

/// `get`/`set` entries holding function values, in literal order.
fn descriptor_entries(properties: &[ObjectProperty]) -> Vec<AccessorEntry> {
    properties
        .iter()
        .filter_map(|property| {
            let (key, function) = match property {
                ObjectProperty::Property { key, value, .. } => match &value.unparen().value {
                    Expr::Function(function) => (key, function),
                    _ => return None,
                },
                ObjectProperty::Method {
                    kind: MethodKind::Method,
                    key,
                    function,
                } => (key, function),
                _ => return None,
            };
            let kind = match key {
                PropertyName::Computed(_) => return None,
                key => match key.static_name()?.as_str() {
                    "get" => MethodKind::Get,
                    "set" => MethodKind::Set,
                    _ => return None,
                },
            };
            Some(AccessorEntry {
                kind,
                function: function.clone(),
            })
        })
        .collect()
}

/// `Object.defineProperty`
pub(crate) fn is_define_property(callee: &Node<Expr>) -> bool {
    matches!(
        &callee.value,
        Expr::Member { object, property }
            if object.value.as_ident() == Some("Object") && property.value.name == "defineProperty"
    )
}

/// `Name` of a `Name.prototype` expression.
pub(crate) fn prototype_of(expr: &Node<Expr>) -> Option<Node<Ident>> {
    let Expr::Member { object, property } = &expr.value else {
        return None;
    };
    if property.value.name != "prototype" {
        return None;
    }
    match &object.value {
        Expr::Ident(ident) => Some(Node::new(ident.clone(), object.span)),
        _ => None,
    }
}
