//! Single-unit pipeline: lex, parse, transform, print.

use protoclass_ast::Span;
use protoclass_emitter::{PrintOptions, Printer};
use protoclass_lexer::TokenKind;
use protoclass_parser::{ParseError, Parser};
use protoclass_transform::{transform, TransformOptions, TransformReport};
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug_span;

/// Options for rewriting one unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteOptions {
    pub transform: TransformOptions,
    pub print: PrintOptions,
}

/// A lexical error token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} lexical error(s)", .0.len())]
    Lex(Vec<LexError>),
    #[error("{} parse error(s)", .0.len())]
    Parse(Vec<ParseError>),
}

/// Result of rewriting one unit
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub output: String,
    pub report: TransformReport,
}

impl Rewrite {
    /// True when the output differs from the input.
    pub fn changed(&self) -> bool {
        self.report.changes() > 0
    }
}

/// Rewrites one source text. Each call works on a fresh tree and a fresh
/// class registry.
pub fn rewrite_source(source: &str, file_id: usize, options: &RewriteOptions) -> Result<Rewrite, UnitError> {
    let _span = debug_span!("rewrite_source", file_id).entered();

    let (tokens, comments) = protoclass_lexer::lex(source, file_id);
    let lex_errors: Vec<LexError> = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Error)
        .map(|token| LexError {
            message: token.value.clone(),
            span: token.span,
        })
        .collect();
    if !lex_errors.is_empty() {
        return Err(UnitError::Lex(lex_errors));
    }

    let mut tree = Parser::new(source, tokens, comments)
        .parse_program()
        .map_err(UnitError::Parse)?;

    let report = transform(&mut tree, &options.transform);
    let output = Printer::with_options(&tree, options.print.clone()).print();

    Ok(Rewrite { output, report })
}
