//! Package archive patching
//!
//! Web Deploy produces the package zip; the parameters descriptor is then
//! injected as a top-level entry. Existing entries are copied raw, keeping
//! their name, compressed bytes and compression method.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{PackageError, PackageResult};

/// An in-memory handle on a package zip.
///
/// Lifecycle: [`open`](Self::open), inspect or
/// [`replace_entry`](Self::replace_entry), then [`save`](Self::save).
pub struct PackageArchive {
    path: PathBuf,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    replacements: IndexMap<String, Vec<u8>>,
}

impl std::fmt::Debug for PackageArchive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageArchive")
            .field("path", &self.path)
            .field("entries", &self.archive.len())
            .field("replacements", &self.replacements.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PackageArchive {
    /// Read the whole archive at `path` into memory
    pub fn open(path: impl Into<PathBuf>) -> PackageResult<Self> {
        let path = path.into();
        let bytes = std::fs::read(&path)
            .map_err(|e| PackageError::archive(&path, format!("failed to read package: {}", e)))?;
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| PackageError::archive(&path, format!("not a zip archive: {}", e)))?;

        tracing::debug!(path = %path.display(), entries = archive.len(), "Opened package");
        Ok(Self {
            path,
            archive,
            replacements: IndexMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in the order [`save`](Self::save) will write them
    pub fn entry_names(&self) -> Vec<String> {
        let mut names: Vec<String> = (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .filter(|name| !self.replacements.contains_key(*name))
            .map(str::to_string)
            .collect();
        names.extend(self.replacements.keys().cloned());
        names
    }

    pub fn len(&self) -> usize {
        self.entry_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `name`, or overwrite it if already present
    pub fn replace_entry(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.replacements.insert(name.into(), content.into());
    }

    /// Rewrite the archive in place.
    ///
    /// The new archive is written to a temporary file next to the original
    /// and renamed over it. Returns the number of entries written.
    pub fn save(mut self) -> PackageResult<usize> {
        let bytes = self.rebuild()?;
        let entries = self.len();

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| PackageError::archive(&self.path, format!("failed to create temp file: {}", e)))?;
        temp.write_all(&bytes)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| PackageError::archive(&self.path, format!("failed to write package: {}", e)))?;
        temp.persist(&self.path).map_err(|e| {
            PackageError::archive(&self.path, format!("failed to replace package: {}", e.error))
        })?;

        tracing::info!(path = %self.path.display(), entries, "Saved package");
        Ok(entries)
    }

    fn rebuild(&mut self) -> PackageResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

        for i in 0..self.archive.len() {
            let file = self
                .archive
                .by_index_raw(i)
                .map_err(|e| PackageError::archive(&self.path, e))?;
            if self.replacements.contains_key(file.name()) {
                tracing::debug!(name = file.name(), "Replacing existing entry");
                continue;
            }
            writer
                .raw_copy_file(file)
                .map_err(|e| PackageError::archive(&self.path, e))?;
        }

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, content) in &self.replacements {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| PackageError::archive(&self.path, e))?;
            writer
                .write_all(content)
                .map_err(|e| PackageError::archive(&self.path, e))?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| PackageError::archive(&self.path, e))?;
        Ok(cursor.into_inner())
    }
}

/// Insert or overwrite a single entry of the package at `path`.
pub fn patch_package(path: &Path, entry_name: &str, content: &str) -> PackageResult<usize> {
    let mut archive = PackageArchive::open(path)?;
    archive.replace_entry(entry_name, content.as_bytes());
    archive.save()
}
