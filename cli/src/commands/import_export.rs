use super::{AppContext, SengiCommand};
use chrono::Local;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use sengi::db::StoredEngine;
use sengi::error::Result;
use sengi::models::engine::EngineDescriptor;
use sengi::{import_export, operations, picker, utils};
use std::path::{Path, PathBuf};

/// Truncate a progress message to fit the terminal width, accounting for
/// spinner, counter and the message prefix
fn truncate_for_display(text: &str, prefix: &str) -> String {
    let term = Term::stdout();
    let terminal_width = term.size().1 as usize;

    // spinner (2) + space (1) + brackets (2) + counter (max ~5) + space (1) + prefix
    let overhead = 2 + 1 + 2 + 5 + 1 + prefix.len();

    let available_width = if terminal_width > overhead + 10 {
        terminal_width - overhead
    } else {
        60 // Fallback to reasonable default
    };

    if text.chars().count() <= available_width {
        format!("{}{}", prefix, text)
    } else if available_width > 3 {
        let shortened: String = text.chars().take(available_width - 3).collect();
        format!("{}{}...", prefix, shortened)
    } else {
        format!("{}...", prefix)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone)]
pub struct ImportCommand {
    pub files: Vec<PathBuf>,
    pub from_url: Option<String>,
}

impl SengiCommand for ImportCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        if let Some(url) = &self.from_url {
            let engine = import_export::import_engine_from_url(ctx.config, ctx.db, url)?;
            eprintln!("✓ Imported '{}' from {}", engine.name, url);
            if self.files.is_empty() {
                return Ok(());
            }
        } else if self.files.is_empty() {
            return Err("No files given. Try 'sengi import <files>...' \
                        or 'sengi import --from-url <url>'"
                .into());
        }

        let pb = ProgressBar::new(self.files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{pos}/{len}] {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let summary = import_export::import_engine_files_with_progress(
            ctx.db,
            &self.files,
            &import_export::LogReporter,
            |index, _total, file| {
                pb.set_position(index as u64);
                pb.set_message(truncate_for_display(&display_name(file), "Importing "));
            },
        );

        pb.finish_and_clear();
        log::debug!(
            "import batch finished: {} succeeded, {} failed",
            summary.succeeded().len(),
            summary.failures().len()
        );

        // One line per failed file; the batch itself never fails
        for (file, error) in summary.failures() {
            eprintln!("✗ {}: {}", display_name(file), error);
        }
        eprintln!(
            "✓ Imported {} of {} engine(s)",
            summary.succeeded().len(),
            summary.len()
        );
        if let Some(last) = summary.last_imported() {
            eprintln!("Selected engine: {}", last.name);
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExportCommand {
    pub name: Option<String>,
    pub output: Option<PathBuf>,
}

impl SengiCommand for ExportCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let engine = match &self.name {
            Some(name) => operations::find_engine(ctx.db, name)?.descriptor,
            None => {
                let engines = ctx.db.get_all()?;
                if engines.is_empty() {
                    eprintln!("No engines in the registry.");
                    return Ok(());
                }
                match picker::pick_engine(&engines)? {
                    Some(stored) => stored.descriptor,
                    // User cancelled the picker: nothing exported, nothing reported
                    None => return Ok(()),
                }
            }
        };

        let dest = self.output.clone().unwrap_or_else(|| PathBuf::from("."));
        let path = import_export::export_engine(&engine, &dest)?;
        eprintln!("✓ Exported '{}' to {}", engine.name, path.display());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExportAllCommand {
    pub output: Option<PathBuf>,
    pub filename: Option<String>,
}

impl SengiCommand for ExportAllCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let engines = ctx.db.get_all()?;
        if engines.is_empty() {
            eprintln!("No engines to export.");
            return Ok(());
        }

        let template = self
            .filename
            .as_deref()
            .unwrap_or(&ctx.config.export_all_filename);
        export_zip(engines, template, &self.output)
    }
}

#[derive(Debug, Clone)]
pub struct ExportCustomCommand {
    pub output: Option<PathBuf>,
    pub filename: Option<String>,
}

impl SengiCommand for ExportCustomCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let engines = ctx.db.get_custom()?;
        if engines.is_empty() {
            eprintln!("No custom engines to export.");
            return Ok(());
        }

        let template = self
            .filename
            .as_deref()
            .unwrap_or(&ctx.config.export_custom_filename);
        export_zip(engines, template, &self.output)
    }
}

fn export_zip(engines: Vec<StoredEngine>, template: &str, output: &Option<PathBuf>) -> Result<()> {
    let filename = import_export::resolve_archive_filename(template, &Local::now().naive_local())?;
    let dest = resolve_zip_dest(&filename, output);

    let descriptors: Vec<EngineDescriptor> =
        engines.into_iter().map(|e| e.descriptor).collect();
    let count = descriptors.len();

    let path = import_export::export_engines_to_zip(&descriptors, &dest)?;
    eprintln!("✓ Exported {} engine(s) to {}", count, path.display());
    Ok(())
}

/// Combine the resolved archive filename with the user's --output choice:
/// a directory gets the filename appended, an explicit file path gets
/// `.zip` ensured, no output means the current directory.
fn resolve_zip_dest(filename: &str, output: &Option<PathBuf>) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => path.with_file_name(utils::ensure_extension(name, ".zip")),
            None => path.join(filename),
        },
        None => PathBuf::from(filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_zip_dest_default_is_cwd_filename() {
        assert_eq!(
            resolve_zip_dest("engines-2026-08-07.zip", &None),
            PathBuf::from("engines-2026-08-07.zip")
        );
    }

    #[test]
    fn test_resolve_zip_dest_directory_gets_filename() {
        let dir = TempDir::new().unwrap();
        let dest = resolve_zip_dest("engines.zip", &Some(dir.path().to_path_buf()));
        assert_eq!(dest, dir.path().join("engines.zip"));
    }

    #[rstest]
    #[case("backup", "backup.zip")]
    #[case("backup.zip", "backup.zip")]
    #[case("nested/dir/backup", "nested/dir/backup.zip")]
    fn test_resolve_zip_dest_explicit_file_gets_extension(
        #[case] given: &str,
        #[case] expected: &str,
    ) {
        let dest = resolve_zip_dest("ignored.zip", &Some(PathBuf::from(given)));
        assert_eq!(dest, PathBuf::from(expected));
    }
}
