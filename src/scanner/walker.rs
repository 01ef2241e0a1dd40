use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::filter::{FileFilter, FilterVerdict};
use crate::catalog::{PATH_SEPARATOR, ROOT_DIRECTORY, join_rel_path};

/// Files of one visited directory, split by the filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryBatch {
    /// Root-relative directory, `"."` for the root itself.
    pub directory: String,
    pub files: Vec<String>,
    pub excluded: Vec<String>,
}

impl DirectoryBatch {
    #[must_use]
    pub fn rel_path(&self, file_name: &str) -> String {
        join_rel_path(&self.directory, file_name)
    }
}

/// True when `directory` lies inside a top-level directory the walker prunes.
#[must_use]
pub fn is_under_ignored(directory: &str, ignored: &BTreeSet<String>) -> bool {
    if directory == ROOT_DIRECTORY {
        return false;
    }
    let top = directory
        .split([PATH_SEPARATOR, std::path::MAIN_SEPARATOR])
        .next()
        .unwrap_or(directory);
    ignored.contains(top)
}

/// Top-down traversal of the root yielding one [`DirectoryBatch`] per directory.
///
/// Ignored directories are pruned only when they sit directly under the root.
/// Every visited directory is yielded, even when none of its files is in scope.
pub struct DirectoryWalker<F: FileFilter> {
    root: PathBuf,
    ignored: BTreeSet<String>,
    filter: F,
}

impl<F: FileFilter> DirectoryWalker<F> {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, ignored: BTreeSet<String>, filter: F) -> Self {
        Self {
            root: root.into(),
            ignored,
            filter,
        }
    }

    #[must_use]
    pub const fn filter(&self) -> &F {
        &self.filter
    }

    #[must_use]
    pub const fn ignored(&self) -> &BTreeSet<String> {
        &self.ignored
    }

    /// Start a single pass over the live tree. Walking again means calling this again.
    pub fn walk(&self) -> impl Iterator<Item = DirectoryBatch> + '_ {
        let ignored = &self.ignored;
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| is_walked_directory(entry, ignored))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable directory");
                    None
                }
            })
            .map(move |entry| self.batch_for(&entry))
    }

    fn batch_for(&self, entry: &DirEntry) -> DirectoryBatch {
        let mut batch = DirectoryBatch {
            directory: self.relative_directory(entry.path()),
            ..DirectoryBatch::default()
        };

        for file_name in list_files(entry.path()) {
            match self.filter.classify(&batch.directory, &file_name) {
                FilterVerdict::InScope => batch.files.push(file_name),
                FilterVerdict::Excluded => batch.excluded.push(file_name),
                FilterVerdict::CatalogFile => {}
            }
        }

        tracing::debug!(
            directory = %batch.directory,
            files = batch.files.len(),
            excluded = batch.excluded.len(),
            "walked directory"
        );
        batch
    }

    fn relative_directory(&self, path: &Path) -> String {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return ROOT_DIRECTORY.to_string();
        };
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            ROOT_DIRECTORY.to_string()
        } else {
            parts.join("/")
        }
    }
}

fn is_walked_directory(entry: &DirEntry, ignored: &BTreeSet<String>) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if !entry.file_type().is_dir() {
        return false;
    }
    !(entry.depth() == 1 && ignored.contains(entry.file_name().to_string_lossy().as_ref()))
}

/// Names of the non-directory children of `dir`, sorted.
fn list_files(dir: &Path) -> Vec<String> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(directory = %dir.display(), error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| !entry.file_type().is_dir() && !entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
