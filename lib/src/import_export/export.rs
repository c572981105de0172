//! Export of engines to descriptor XML files and zip archives.
//!
//! Unlike import, batch export is not failure-isolated: the archive is one
//! artifact, so any entry's failure aborts the batch before anything is
//! written to disk.

use crate::error::{Result, SengiError};
use crate::models::engine::EngineDescriptor;
use crate::{opensearch, utils};
use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Filename for a single exported engine: sanitized name plus `.xml`.
pub fn xml_filename(name: &str) -> String {
    utils::ensure_extension(&utils::sanitize_engine_name(name), ".xml")
}

/// Resolve the concrete file path for a single-engine export.
///
/// A directory destination gets the derived filename appended; a file
/// destination gets `.xml` appended unless already present.
pub fn resolve_export_path(descriptor: &EngineDescriptor, dest: &Path) -> PathBuf {
    if dest.is_dir() {
        return dest.join(xml_filename(&descriptor.name));
    }
    match dest.file_name().and_then(|n| n.to_str()) {
        Some(name) => dest.with_file_name(utils::ensure_extension(name, ".xml")),
        None => dest.join(xml_filename(&descriptor.name)),
    }
}

/// Serialize one engine to an XML file. Returns the path written.
pub fn export_engine(descriptor: &EngineDescriptor, dest: &Path) -> Result<PathBuf> {
    let path = resolve_export_path(descriptor, dest);
    let xml = opensearch::serialize_descriptor(descriptor)?;
    std::fs::write(&path, xml)?;
    Ok(path)
}

/// Serialize every engine into one zip archive at `dest`.
///
/// The archive is assembled in memory and only written to disk once every
/// entry serialized, so a failing entry leaves no partial archive behind.
/// An empty batch produces a valid, empty archive.
pub fn export_engines_to_zip(engines: &[EngineDescriptor], dest: &Path) -> Result<PathBuf> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut used: HashSet<String> = HashSet::new();
    for engine in engines {
        let xml = opensearch::serialize_descriptor(engine)?;
        let entry = unique_entry_name(&engine.name, &mut used);
        zip.start_file(entry, options)?;
        zip.write_all(xml.as_bytes())?;
    }

    let cursor = zip.finish()?;
    std::fs::write(dest, cursor.into_inner())?;
    Ok(dest.to_path_buf())
}

/// Resolve a `strftime`-style filename template against `now` and make the
/// result archive-safe: path separators become `-`, and `.zip` is appended
/// if missing. Never truncates.
pub fn resolve_archive_filename(template: &str, now: &NaiveDateTime) -> Result<String> {
    let mut resolved = String::new();
    write!(resolved, "{}", now.format(template))
        .map_err(|_| SengiError::Template(template.to_string()))?;

    let resolved = resolved.replace(['/', '\\'], "-");
    Ok(utils::ensure_extension(&resolved, ".zip"))
}

/// Sanitized entry name, disambiguated with a numeric suffix on collision.
fn unique_entry_name(engine_name: &str, used: &mut HashSet<String>) -> String {
    let base = utils::sanitize_engine_name(engine_name);
    let mut candidate = format!("{}.xml", base);
    let mut n = 2;
    while used.contains(&candidate) {
        candidate = format!("{}-{}.xml", base, n);
        n += 1;
    }
    used.insert(candidate.clone());
    candidate
}
