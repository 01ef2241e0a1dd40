mod types;

pub use types::{CatalogEntry, DirectorySummary, EntryStatus};

use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::{CatalogerError, Result};

/// Directory key used for files directly under the root.
pub const ROOT_DIRECTORY: &str = ".";

/// Separator used for relative paths in the catalog and in reports.
pub const PATH_SEPARATOR: char = '/';

fn is_separator(c: char) -> bool {
    c == PATH_SEPARATOR || c == std::path::MAIN_SEPARATOR
}

/// Split a root-relative path into `(directory, file_name)`.
///
/// A leading `./` is ignored and a path without a separator lives in `"."`.
#[must_use]
pub fn split_rel_path(rel_path: &str) -> (String, String) {
    let mut path = rel_path.trim();
    while let Some(rest) = path.strip_prefix('.').and_then(|p| p.strip_prefix(is_separator)) {
        path = rest;
    }

    let Some((directory, file_name)) = path.rsplit_once(is_separator) else {
        return (ROOT_DIRECTORY.to_string(), path.to_string());
    };
    // `sub//a.py` lives in `sub`, as the walker reports it.
    let directory = directory.trim_end_matches(is_separator);
    if directory.is_empty() {
        (ROOT_DIRECTORY.to_string(), file_name.to_string())
    } else {
        (normalize_directory(directory), file_name.to_string())
    }
}

fn normalize_directory(directory: &str) -> String {
    if std::path::MAIN_SEPARATOR == PATH_SEPARATOR {
        directory.to_string()
    } else {
        directory.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Join a catalog directory key and a file name; root files stay bare.
#[must_use]
pub fn join_rel_path(directory: &str, file_name: &str) -> String {
    if directory.is_empty() || directory == ROOT_DIRECTORY {
        file_name.to_string()
    } else {
        format!("{directory}{PATH_SEPARATOR}{file_name}")
    }
}

/// Two-level map of directory → file name → entry, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    directories: IndexMap<String, IndexMap<String, CatalogEntry>>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse persisted catalog text.
    ///
    /// # Errors
    /// Returns a `Catalog` error on a malformed line or when no entries are found.
    pub fn parse(content: &str, source_name: &str) -> Result<Self> {
        Self::from_lines(content.lines(), source_name)
    }

    /// Parse persisted `path<TAB>signature` lines. Blank lines are skipped.
    ///
    /// # Errors
    /// Returns a `Catalog` error if a line has no tab, a signature is not
    /// hexadecimal, or the input holds no entries at all.
    pub fn from_lines<I, S>(lines: I, source_name: &str) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();

        for (index, raw) in lines.into_iter().enumerate() {
            let line_no = index + 1;
            let entry = raw.as_ref().trim();
            if entry.is_empty() {
                continue;
            }

            let Some((path, signature)) = entry.split_once('\t') else {
                return Err(CatalogerError::catalog(format!(
                    "Invalid catalog format - missing tab on line {line_no}"
                )));
            };

            let signature = signature.trim();
            if signature.is_empty() || !signature.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(CatalogerError::catalog(format!(
                    "Invalid catalog format - invalid signature on line {line_no}"
                )));
            }

            let (directory, file_name) = split_rel_path(path);
            if file_name.is_empty() {
                return Err(CatalogerError::catalog(format!(
                    "Invalid catalog format - missing path on line {line_no}"
                )));
            }

            catalog
                .directories
                .entry(directory)
                .or_default()
                .insert(file_name, CatalogEntry::new(signature.to_ascii_lowercase()));
        }

        if catalog.is_empty() {
            return Err(CatalogerError::catalog(format!(
                "Empty catalog file: {source_name}"
            )));
        }

        tracing::debug!(
            source = source_name,
            entries = catalog.len(),
            directories = catalog.directories.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Load a catalog file from disk.
    ///
    /// # Errors
    /// Returns `CatalogAccess` if the file cannot be opened or read, or a
    /// `Catalog` error if its content is malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let access_error = |source| CatalogerError::CatalogAccess {
            path: path.to_path_buf(),
            source,
        };

        let file = fs::File::open(path).map_err(access_error)?;
        let lines = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(access_error)?;

        Self::from_lines(&lines, &path.display().to_string())
    }

    /// Write every `added` entry to `path`, returning how many were written.
    ///
    /// # Errors
    /// Returns `CatalogAccess` if the file cannot be created or written.
    pub fn save(&self, path: &Path) -> Result<usize> {
        let access_error = |source| CatalogerError::CatalogAccess {
            path: path.to_path_buf(),
            source,
        };

        let file = fs::File::create(path).map_err(access_error)?;
        let mut writer = BufWriter::new(file);
        let written = self.write_to(&mut writer).map_err(access_error)?;
        writer.flush().map_err(access_error)?;

        tracing::debug!(path = %path.display(), entries = written, "wrote catalog");
        Ok(written)
    }

    /// Write `path<TAB>signature` lines for every `added` entry.
    ///
    /// # Errors
    /// Returns any error raised by the writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<usize> {
        let mut written = 0;
        for (path, signature) in self.serialize() {
            writeln!(writer, "{path}\t{signature}")?;
            written += 1;
        }
        Ok(written)
    }

    /// `(relative path, signature)` for every `added` entry, directory then file order.
    pub fn serialize(&self) -> impl Iterator<Item = (String, &str)> {
        self.directories.iter().flat_map(|(directory, files)| {
            files.iter().filter_map(move |(file_name, entry)| {
                match (entry.status, entry.signature.as_deref()) {
                    (EntryStatus::Added, Some(signature)) => {
                        Some((join_rel_path(directory, file_name), signature))
                    }
                    _ => None,
                }
            })
        })
    }

    #[must_use]
    pub fn is_file_known(&self, directory: &str, file_name: &str) -> bool {
        self.directories
            .get(directory)
            .is_some_and(|files| files.contains_key(file_name))
    }

    #[must_use]
    pub fn is_directory_known(&self, directory: &str) -> bool {
        self.directories.contains_key(directory)
    }

    #[must_use]
    pub fn signature_of(&self, directory: &str, file_name: &str) -> Option<&str> {
        self.directories
            .get(directory)
            .and_then(|files| files.get(file_name))
            .and_then(|entry| entry.signature.as_deref())
    }

    #[must_use]
    pub fn status_of(&self, rel_path: &str) -> Option<EntryStatus> {
        let (directory, file_name) = split_rel_path(rel_path);
        self.directories
            .get(&directory)
            .and_then(|files| files.get(&file_name))
            .map(|entry| entry.status)
    }

    /// Set the status of `rel_path`, creating the entry if it does not exist.
    pub fn mark_status(&mut self, rel_path: &str, status: EntryStatus) {
        self.entry_mut(rel_path).status = status;
    }

    /// Record a file produced by a create run.
    pub fn add(&mut self, rel_path: &str, signature: String) {
        let entry = self.entry_mut(rel_path);
        entry.signature = Some(signature);
        entry.status = EntryStatus::Added;
    }

    fn entry_mut(&mut self, rel_path: &str) -> &mut CatalogEntry {
        let (directory, file_name) = split_rel_path(rel_path);
        self.directories
            .entry(directory)
            .or_default()
            .entry(file_name)
            .or_default()
    }

    /// File names in `directory` that no pass has classified yet.
    pub fn unprocessed_filenames<'a>(
        &'a self,
        directory: &str,
    ) -> impl Iterator<Item = &'a str> + use<'a> {
        self.directories
            .get(directory)
            .into_iter()
            .flat_map(|files| files.iter())
            .filter(|(_, entry)| entry.status.is_unprocessed())
            .map(|(file_name, _)| file_name.as_str())
    }

    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.directories.keys().map(String::as_str)
    }

    /// Relative paths of every entry with `status`, root files bare.
    #[must_use]
    pub fn files_with_status(&self, status: EntryStatus) -> Vec<String> {
        self.directories
            .iter()
            .flat_map(|(directory, files)| {
                files
                    .iter()
                    .filter(move |(_, entry)| entry.status == status)
                    .map(move |(file_name, _)| join_rel_path(directory, file_name))
            })
            .collect()
    }

    #[must_use]
    pub fn summary_by_directory(&self) -> Vec<DirectorySummary> {
        self.directories
            .iter()
            .map(|(directory, files)| {
                let mut summary = DirectorySummary {
                    path: directory.clone(),
                    ..DirectorySummary::default()
                };
                for entry in files.values() {
                    summary.record(entry.status);
                }
                summary
            })
            .collect()
    }

    /// Total number of file entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directories.values().map(IndexMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
