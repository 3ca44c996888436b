//! Transform diagnostics

use protoclass_ast::Span;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// What the unresolved member would have become
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberRole {
    Field,
    InstanceMethod,
    StaticMethod,
    Accessor,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MemberRole::Field => "field",
            MemberRole::InstanceMethod => "method",
            MemberRole::StaticMethod => "static method",
            MemberRole::Accessor => "accessor",
        };
        write!(f, "{}", s)
    }
}

/// A member refers to a class name that no synthesized class carries.
///
/// Strict lookups (accessor descriptors) report it as an error, lenient ones
/// (fields and methods) as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("class `{class}` not found for {role} `{member}`")]
pub struct UnresolvedClassReference {
    pub class: String,
    pub member: String,
    pub role: MemberRole,
    pub strict: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// Emitted for every method attachment, successful or not
    AttachAttempt {
        class: String,
        method: String,
        is_static: bool,
    },
    UnresolvedClass(UnresolvedClassReference),
    /// The registered class has no constructor to receive a field
    MissingConstructor { class: String, member: String },
    /// A candidate function was `async` or a generator
    DroppedModifier { class: String, modifier: &'static str },
    /// A second candidate with the same name replaced the first in the registry
    RegistryOverwrite { class: String },
    /// The descriptor argument was not an object literal
    DescriptorDiscarded { class: String, property: String },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::AttachAttempt {
                class,
                method,
                is_static,
            } => {
                let kind = if *is_static { "static method" } else { "method" };
                write!(f, "adding {} `{}` to class `{}`", kind, method, class)
            }
            DiagnosticKind::UnresolvedClass(err) => write!(f, "{}", err),
            DiagnosticKind::MissingConstructor { class, member } => {
                write!(f, "class `{}` has no constructor to receive field `{}`", class, member)
            }
            DiagnosticKind::DroppedModifier { class, modifier } => {
                write!(f, "constructor of class `{}` cannot be {}; modifier dropped", class, modifier)
            }
            DiagnosticKind::RegistryOverwrite { class } => {
                write!(f, "class `{}` declared again; later members attach to the last declaration", class)
            }
            DiagnosticKind::DescriptorDiscarded { class, property } => {
                write!(
                    f,
                    "descriptor for `{}.{}` is not an object literal; no accessors produced",
                    class, property
                )
            }
        }
    }
}

/// Diagnostic with location information
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(severity: Severity, kind: DiagnosticKind, span: Span) -> Self {
        Self {
            severity,
            span,
            kind,
        }
    }

    pub fn unresolved(reference: UnresolvedClassReference, span: Span) -> Self {
        let severity = if reference.strict {
            Severity::Error
        } else {
            Severity::Warning
        };
        Self::new(severity, DiagnosticKind::UnresolvedClass(reference), span)
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity, self.span.start, self.span.end, self.kind
        )
    }
}
