//! Parallel batch driving
//!
//! Units are independent: every unit gets its own tree and registry, so the
//! pool needs no synchronization beyond collecting outcomes.

use crate::pipeline::{rewrite_source, Rewrite, RewriteOptions, UnitError};
use protoclass_transform::Severity;
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{info, info_span, warn};

/// Where rewritten sources go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Nothing is written
    DryRun,
    /// Changed files are overwritten
    InPlace,
    /// Every unit is written below this directory, mirroring its input path
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    pub rewrite: RewriteOptions,
    pub output: OutputMode,
    /// Worker threads; `None` lets rayon decide
    pub jobs: Option<usize>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            rewrite: RewriteOptions::default(),
            output: OutputMode::DryRun,
            jobs: None,
        }
    }
}

#[derive(Debug)]
pub struct UnitOutcome {
    pub path: PathBuf,
    /// Empty when the file could not be read
    pub source: String,
    pub result: Result<Rewrite, UnitError>,
}

impl UnitOutcome {
    /// Failed units could not be rewritten or produced error diagnostics.
    pub fn failed(&self) -> bool {
        match &self.result {
            Ok(rewrite) => rewrite.report.has_errors(),
            Err(_) => true,
        }
    }

    pub fn changed(&self) -> bool {
        matches!(&self.result, Ok(rewrite) if rewrite.changed())
    }
}

/// Rewrites every unit on a rayon pool. Outcomes keep the order of `units`.
pub fn run_batch(units: &[PathBuf], options: &BatchOptions) -> Result<Vec<UnitOutcome>, rayon::ThreadPoolBuildError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = options.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build()?;

    let outcomes = pool.install(|| {
        units
            .par_iter()
            .enumerate()
            .map(|(file_id, path)| process_unit(file_id, path, options))
            .collect::<Vec<_>>()
    });
    Ok(outcomes)
}

fn process_unit(file_id: usize, path: &Path, options: &BatchOptions) -> UnitOutcome {
    let _span = info_span!("unit", path = %path.display()).entered();

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(source) => {
            warn!(error = %source, "failed to read unit");
            return UnitOutcome {
                path: path.to_path_buf(),
                source: String::new(),
                result: Err(UnitError::Read {
                    path: path.to_path_buf(),
                    source,
                }),
            };
        }
    };

    let result = rewrite_source(&source, file_id, &options.rewrite).and_then(|rewrite| {
        write_output(path, &rewrite, &options.output)?;
        Ok(rewrite)
    });

    match &result {
        Ok(rewrite) => info!(
            changes = rewrite.report.changes(),
            diagnostics = rewrite.report.diagnostics.len(),
            "rewrote unit"
        ),
        Err(err) => warn!(error = %err, "unit failed"),
    }

    UnitOutcome {
        path: path.to_path_buf(),
        source,
        result,
    }
}

fn write_output(path: &Path, rewrite: &Rewrite, output: &OutputMode) -> Result<(), UnitError> {
    match output {
        OutputMode::DryRun => Ok(()),
        OutputMode::InPlace => {
            if rewrite.changed() {
                fs::write(path, &rewrite.output).map_err(write_error(path))?;
            }
            Ok(())
        }
        OutputMode::Directory(dir) => {
            let target = mirrored_path(dir, path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(write_error(parent))?;
            }
            fs::write(&target, &rewrite.output).map_err(write_error(&target))
        }
    }
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> UnitError {
    let path = path.to_path_buf();
    move |source| UnitError::Write { path, source }
}

/// `dir` joined with the normal components of `path`.
pub fn mirrored_path(dir: &Path, path: &Path) -> PathBuf {
    let mut target = dir.to_path_buf();
    for component in path.components() {
        if let Component::Normal(part) = component {
            target.push(part);
        }
    }
    target
}

/// Aggregate counts over a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub notes: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: &[UnitOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    pub fn record(&mut self, outcome: &UnitOutcome) {
        self.processed += 1;
        if outcome.failed() {
            self.failed += 1;
        }
        if let Ok(rewrite) = &outcome.result {
            if rewrite.changed() {
                self.changed += 1;
            } else {
                self.unchanged += 1;
            }
            self.notes += rewrite.report.count(Severity::Note);
            self.warnings += rewrite.report.count(Severity::Warning);
            self.errors += rewrite.report.count(Severity::Error);
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} file(s): {} changed, {} unchanged, {} failed; {} error(s), {} warning(s), {} note(s)",
            self.processed,
            self.changed,
            self.unchanged,
            self.failed,
            self.errors,
            self.warnings,
            self.notes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_batch_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = write(dir.path(), "legacy.js", "function Foo() {}\nFoo.prototype.a = 1;\n");
        let modern = write(dir.path(), "modern.js", "class Bar {}\n");
        let broken = write(dir.path(), "broken.js", "function (\n");

        let options = BatchOptions {
            output: OutputMode::InPlace,
            jobs: Some(2),
            ..BatchOptions::default()
        };
        let outcomes = run_batch(&[legacy.clone(), modern.clone(), broken], &options).unwrap();
        let summary = BatchSummary::from_outcomes(&outcomes);

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.changed, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_success());

        assert_eq!(
            fs::read_to_string(&legacy).unwrap(),
            "class Foo {\n  constructor() {\n    this.a = 1;\n  }\n}\n"
        );
        assert_eq!(fs::read_to_string(&modern).unwrap(), "class Bar {}\n");
    }

    #[test]
    fn test_strict_error_counts_as_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "a.js",
            "Object.defineProperty(Nope, 'x', { get: function () {} });\n",
        );
        let outcomes = run_batch(&[path], &BatchOptions::default()).unwrap();
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_out_dir_mirrors_paths() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        assert_eq!(
            mirrored_path(&out, Path::new("./src/../lib/a.js")),
            out.join("src").join("lib").join("a.js")
        );

        let input = write(dir.path(), "b.js", "function B() {}\n");
        let options = BatchOptions {
            output: OutputMode::Directory(out.clone()),
            ..BatchOptions::default()
        };
        run_batch(&[input.clone()], &options).unwrap();
        let written = fs::read_to_string(mirrored_path(&out, &input)).unwrap();
        assert_eq!(written, "class B {\n  constructor() {}\n}\n");
        assert_eq!(fs::read_to_string(&input).unwrap(), "function B() {}\n");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let outcomes = run_batch(&[dir.path().join("gone.js")], &BatchOptions::default()).unwrap();
        assert!(matches!(outcomes[0].result, Err(UnitError::Read { .. })));
        assert_eq!(BatchSummary::from_outcomes(&outcomes).failed, 1);
    }

    #[test]
    fn test_summary_display() {
        let summary = BatchSummary {
            processed: 3,
            changed: 1,
            unchanged: 1,
            failed: 1,
            notes: 4,
            warnings: 2,
            errors: 0,
        };
        assert_eq!(
            summary.to_string(),
            "3 file(s): 1 changed, 1 unchanged, 1 failed; 0 error(s), 2 warning(s), 4 note(s)"
        );
    }
}
