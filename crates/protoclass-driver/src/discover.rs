//! Input discovery

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// File extensions to pick up inside directories, without the dot
    pub extensions: Vec<String>,
    /// Directory names skipped while walking
    pub ignore: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            extensions: vec!["js".to_string(), "mjs".to_string(), "cjs".to_string()],
            ignore: vec!["node_modules".to_string()],
        }
    }
}

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("no such file or directory: {}", .0.display())]
    Missing(PathBuf),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

/// Expands `paths` into the sorted list of units to process.
///
/// Files named explicitly are taken as they are. Directories are walked
/// recursively for files with a matching extension.
pub fn discover(paths: &[PathBuf], options: &DiscoverOptions) -> Result<Vec<PathBuf>, DiscoverError> {
    let mut units = Vec::new();

    for path in paths {
        if path.is_file() {
            units.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            return Err(DiscoverError::Missing(path.clone()));
        }

        let walker = WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_ignored(entry, options));
        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file() && has_extension(entry.path(), options) {
                units.push(entry.into_path());
            }
        }
    }

    units.sort();
    units.dedup();
    tracing::debug!(units = units.len(), "discovered input files");
    Ok(units)
}

fn is_ignored(entry: &DirEntry, options: &DiscoverOptions) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map_or(false, |name| options.ignore.iter().any(|ignored| ignored == name))
}

fn has_extension(path: &Path, options: &DiscoverOptions) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| options.extensions.iter().any(|wanted| wanted == ext))
}
