pub mod export;
pub mod import;

// Re-export main entry points for convenience
pub use export::{export_engine, export_engines_to_zip, resolve_archive_filename};
pub use import::{
    import_engine_file, import_engine_files, import_engine_files_with_progress,
    import_engine_from_url, ErrorReporter, ImportResult, ImportSummary, LogReporter,
};
