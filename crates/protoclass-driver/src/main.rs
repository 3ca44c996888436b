use anyhow::{bail, Context, Result};
use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use protoclass_driver::{
    discover, init_logging, run_batch, BatchOptions, BatchSummary, DiscoverOptions, LogFormat, OutputMode,
    RewriteOptions, UnitError, UnitOutcome,
};
use protoclass_emitter::PrintOptions;
use protoclass_lexer::TokenKind;
use protoclass_transform::{Diagnostic, DiagnosticKind, Severity, TransformOptions};

#[derive(Parser)]
#[command(
    name = "protoclass",
    version,
    about = "Rewrite prototype-style JavaScript into class declarations",
    long_about = "Converts constructor functions with prototype assignments, static member\nassignments and Object.defineProperty accessors into ES class syntax.\nUntouched code is copied byte for byte."
)]
struct Cli {
    /// Log progress at info level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite files; a single file is printed to stdout unless --write or --out-dir
    Rewrite {
        #[command(flatten)]
        units: UnitArgs,

        /// Overwrite changed files in place
        #[arg(short, long, conflicts_with = "out_dir")]
        write: bool,

        /// Write every rewritten file below this directory
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// List files that would change, without writing anything
    Check {
        #[command(flatten)]
        units: UnitArgs,
    },

    /// Print the names involved in prototype-style code (debug)
    Scan {
        /// Input JavaScript file
        input: PathBuf,
    },

    /// Parse a file and show the syntax tree (debug)
    Parse {
        /// Input JavaScript file
        input: PathBuf,
    },
}

#[derive(Args)]
struct UnitArgs {
    /// Files or directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Extensions picked up while walking directories
    #[arg(long, value_delimiter = ',', default_value = "js,mjs,cjs")]
    extensions: Vec<String>,

    /// Directory names skipped while walking
    #[arg(long = "ignore", default_value = "node_modules")]
    ignore: Vec<String>,

    /// Number of worker threads
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Spaces per indentation level in generated classes (default: follow each file)
    #[arg(long)]
    indent: Option<usize>,

    /// Indent generated classes with tabs
    #[arg(long, conflicts_with = "indent")]
    tabs: bool,

    /// Also convert `var Name = function () {}` declarations
    #[arg(long)]
    function_variables: bool,

    /// Hide note diagnostics
    #[arg(short, long)]
    quiet: bool,
}

impl UnitArgs {
    fn discover_options(&self) -> DiscoverOptions {
        DiscoverOptions {
            extensions: self
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
            ignore: self.ignore.clone(),
        }
    }

    fn batch_options(&self, output: OutputMode) -> BatchOptions {
        let print = match (self.tabs, self.indent) {
            (true, _) => PrintOptions::tabs(),
            (false, Some(width)) => PrintOptions::spaces(width),
            (false, None) => PrintOptions::default(),
        };
        BatchOptions {
            rewrite: RewriteOptions {
                transform: TransformOptions {
                    convert_function_variables: self.function_variables,
                },
                print,
            },
            output,
            jobs: self.jobs,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    let result = match cli.command {
        Commands::Rewrite {
            units,
            write,
            out_dir,
        } => rewrite_command(units, write, out_dir),
        Commands::Check { units } => check_command(units),
        Commands::Scan { input } => scan_command(&input),
        Commands::Parse { input } => parse_command(&input),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn rewrite_command(units: UnitArgs, write: bool, out_dir: Option<PathBuf>) -> Result<ExitCode> {
    let paths = discover(&units.paths, &units.discover_options()).context("failed to collect input files")?;

    let output = match (write, out_dir) {
        (true, _) => OutputMode::InPlace,
        (false, Some(dir)) => OutputMode::Directory(dir),
        (false, None) => OutputMode::DryRun,
    };
    let to_stdout = output == OutputMode::DryRun;
    if to_stdout && paths.len() != 1 {
        bail!(
            "{} input files found; use --write or --out-dir to rewrite more than one file",
            paths.len()
        );
    }

    let outcomes = run_batch(&paths, &units.batch_options(output)).context("failed to start worker pool")?;
    for outcome in &outcomes {
        report_unit(outcome, units.quiet)?;
    }

    if to_stdout {
        if let Some(Ok(rewrite)) = outcomes.first().map(|outcome| &outcome.result) {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rewrite.output.as_bytes())?;
            stdout.flush()?;
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    if !to_stdout || !summary.is_success() {
        eprintln!("{}", summary);
    }

    Ok(exit_code(summary.is_success()))
}

fn check_command(units: UnitArgs) -> Result<ExitCode> {
    let paths = discover(&units.paths, &units.discover_options()).context("failed to collect input files")?;
    let outcomes = run_batch(&paths, &units.batch_options(OutputMode::DryRun))
        .context("failed to start worker pool")?;

    for outcome in &outcomes {
        report_unit(outcome, units.quiet)?;
        if outcome.changed() {
            println!("would rewrite {}", outcome.path.display());
        }
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    eprintln!("{}", summary);

    Ok(exit_code(summary.is_success() && summary.changed == 0))
}

fn scan_command(input: &Path) -> Result<ExitCode> {
    let source = read_source_file(input)?;
    let filename = input.display().to_string();

    let Some(tree) = parse_or_report(&source, &filename)? else {
        return Ok(ExitCode::FAILURE);
    };

    for name in protoclass_transform::scanner::scan(&tree) {
        println!("{}", name);
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_command(input: &Path) -> Result<ExitCode> {
    let source = read_source_file(input)?;
    let filename = input.display().to_string();

    let Some(tree) = parse_or_report(&source, &filename)? else {
        return Ok(ExitCode::FAILURE);
    };

    println!("{:#?}", tree);
    Ok(ExitCode::SUCCESS)
}

// Helper functions

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn read_source_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses `source`, reporting lexical and parse errors. `None` when any were found.
fn parse_or_report(source: &str, filename: &str) -> io::Result<Option<protoclass_ast::SyntaxTree>> {
    let (tokens, comments) = protoclass_lexer::lex(source, 0);

    let mut lexical_errors = false;
    for token in tokens.iter().filter(|t| t.kind == TokenKind::Error) {
        report_error(
            ReportKind::Error,
            "E0001",
            "Lexical error",
            &token.value,
            token.span.start..token.span.end,
            filename,
            source,
        )?;
        lexical_errors = true;
    }
    if lexical_errors {
        return Ok(None);
    }

    match protoclass_parser::Parser::new(source, tokens, comments).parse_program() {
        Ok(tree) => Ok(Some(tree)),
        Err(errors) => {
            for err in &errors {
                report_error(
                    ReportKind::Error,
                    "E1000",
                    "Parse error",
                    &err.message,
                    err.span.start..err.span.end,
                    filename,
                    source,
                )?;
            }
            Ok(None)
        }
    }
}

fn report_unit(outcome: &UnitOutcome, quiet: bool) -> io::Result<()> {
    let filename = outcome.path.display().to_string();
    let source = outcome.source.as_str();

    match &outcome.result {
        Ok(rewrite) => {
            for diagnostic in &rewrite.report.diagnostics {
                if quiet && diagnostic.severity == Severity::Note {
                    continue;
                }
                report_diagnostic(diagnostic, &filename, source)?;
            }
        }
        Err(UnitError::Lex(errors)) => {
            for err in errors {
                report_error(
                    ReportKind::Error,
                    "E0001",
                    "Lexical error",
                    &err.message,
                    err.span.start..err.span.end,
                    &filename,
                    source,
                )?;
            }
        }
        Err(UnitError::Parse(errors)) => {
            for err in errors {
                report_error(
                    ReportKind::Error,
                    "E1000",
                    "Parse error",
                    &err.message,
                    err.span.start..err.span.end,
                    &filename,
                    source,
                )?;
            }
        }
        Err(err) => eprintln!("error: {}", err),
    }
    Ok(())
}

fn report_diagnostic(diagnostic: &Diagnostic, filename: &str, source: &str) -> io::Result<()> {
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Note => ReportKind::Advice,
    };
    let (code, title) = match &diagnostic.kind {
        DiagnosticKind::AttachAttempt { .. } => ("P100", "Method attachment"),
        DiagnosticKind::UnresolvedClass(_) => ("P200", "Unresolved class"),
        DiagnosticKind::MissingConstructor { .. } => ("P201", "Missing constructor"),
        DiagnosticKind::DroppedModifier { .. } => ("P300", "Dropped modifier"),
        DiagnosticKind::RegistryOverwrite { .. } => ("P301", "Duplicate class"),
        DiagnosticKind::DescriptorDiscarded { .. } => ("P302", "Discarded descriptor"),
    };
    report_error(
        kind,
        code,
        title,
        &diagnostic.message(),
        diagnostic.span.start..diagnostic.span.end,
        filename,
        source,
    )
}

fn report_error(
    kind: ReportKind<'_>,
    code: &str,
    title: &str,
    message: &str,
    range: Range<usize>,
    filename: &str,
    source: &str,
) -> io::Result<()> {
    let color = match kind {
        ReportKind::Error => Color::Red,
        ReportKind::Warning => Color::Yellow,
        _ => Color::Blue,
    };
    let end = range.end.min(source.len());
    let span = (filename, range.start.min(end)..end);

    Report::build(kind, span.clone())
        .with_config(
            Config::default()
                .with_index_type(IndexType::Byte)
                .with_color(io::stderr().is_terminal()),
        )
        .with_code(code)
        .with_message(title)
        .with_label(Label::new(span).with_message(message).with_color(color))
        .finish()
        .eprint((filename, Source::from(source)))
}
