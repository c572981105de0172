//! Batch import of search-engine descriptor files.
//!
//! The batch runs strictly sequentially in input order, and one file's
//! failure never stops the files after it. Each failure is reported
//! through the [`ErrorReporter`] sink on its own, naming the offending
//! file; the batch itself always completes with a summary.

use crate::config::Config;
use crate::db::EngineDb;
use crate::error::{Result, SengiError};
use crate::models::engine::EngineDescriptor;
use crate::{fetch, opensearch};
use std::path::{Path, PathBuf};

/// Sink for per-file import diagnostics. Implementations must not fail.
pub trait ErrorReporter {
    fn report(&self, context: &str, error: &SengiError);
}

/// Default reporter, writes through the `log` facade.
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, context: &str, error: &SengiError) {
        log::error!("{}: {}", context, error);
    }
}

/// Outcome of one input file. Every file of a batch yields exactly one.
#[derive(Debug)]
pub enum ImportResult {
    Success(EngineDescriptor),
    Failure { file: PathBuf, error: SengiError },
}

/// Results of a batch, in input order.
#[derive(Debug, Default)]
pub struct ImportSummary {
    results: Vec<ImportResult>,
}

impl ImportSummary {
    pub fn results(&self) -> &[ImportResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Successfully imported descriptors, in input order.
    pub fn succeeded(&self) -> Vec<&EngineDescriptor> {
        self.results
            .iter()
            .filter_map(|r| match r {
                ImportResult::Success(engine) => Some(engine),
                ImportResult::Failure { .. } => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(&Path, &SengiError)> {
        self.results
            .iter()
            .filter_map(|r| match r {
                ImportResult::Success(_) => None,
                ImportResult::Failure { file, error } => Some((file.as_path(), error)),
            })
            .collect()
    }

    /// The engine a caller should select/focus after the batch: the last
    /// success in input order, regardless of failures after it.
    pub fn last_imported(&self) -> Option<&EngineDescriptor> {
        self.succeeded().last().copied()
    }
}

/// Import a single descriptor file: read, parse, register.
pub fn import_engine_file(db: &EngineDb, path: &Path) -> Result<EngineDescriptor> {
    let bytes = std::fs::read(path)?;
    let descriptor = opensearch::parse_descriptor(&bytes)?;
    db.add_engine(&descriptor, false)?;
    Ok(descriptor)
}

/// Import a batch of descriptor files.
///
/// An empty batch returns an empty summary. Every file yields exactly one
/// entry in the summary, and files are processed one after another in the
/// order given, so the registry never sees concurrent registrations and
/// [`ImportSummary::last_imported`] is deterministic.
pub fn import_engine_files(
    db: &EngineDb,
    files: &[PathBuf],
    reporter: &dyn ErrorReporter,
) -> ImportSummary {
    import_engine_files_with_progress(db, files, reporter, |_, _, _| {})
}

/// Like [`import_engine_files`], invoking `progress(index, total, file)`
/// before each file is processed.
pub fn import_engine_files_with_progress<F>(
    db: &EngineDb,
    files: &[PathBuf],
    reporter: &dyn ErrorReporter,
    mut progress: F,
) -> ImportSummary
where
    F: FnMut(usize, usize, &Path),
{
    let mut results = Vec::with_capacity(files.len());

    for (index, file) in files.iter().enumerate() {
        progress(index, files.len(), file);

        match import_engine_file(db, file) {
            Ok(descriptor) => results.push(ImportResult::Success(descriptor)),
            Err(error) => {
                // One diagnostic per failing file, naming the file. Never
                // aggregated, and never allowed to stop the rest of the batch.
                reporter.report(
                    &format!(
                        "import of a search engine from the file '{}' failed",
                        display_name(file)
                    ),
                    &error,
                );
                results.push(ImportResult::Failure {
                    file: file.clone(),
                    error,
                });
            }
        }
    }

    ImportSummary { results }
}

/// Fetch a descriptor from `url` and register it.
///
/// The URL may point at the descriptor XML itself, or at an HTML page that
/// advertises one via `<link rel="search">`. Single-item operation, so
/// errors propagate instead of being isolated.
pub fn import_engine_from_url(
    config: &Config,
    db: &EngineDb,
    url: &str,
) -> Result<EngineDescriptor> {
    let descriptor = fetch::fetch_descriptor(url, Some(&config.user_agent))?;
    db.add_engine(&descriptor, false)?;
    Ok(descriptor)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
