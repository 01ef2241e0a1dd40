use std::collections::BTreeSet;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::catalog::{join_rel_path, split_rel_path};
use crate::config::Settings;
use crate::error::{CatalogerError, Result};

/// Why a file was or was not taken into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    InScope,
    /// Out of scope because of a filter or the extension allow-set.
    Excluded,
    /// The catalog file itself; neither cataloged nor counted as excluded.
    CatalogFile,
}

pub trait FileFilter {
    /// Decide what to do with `file_name` inside the root-relative `directory`.
    fn classify(&self, directory: &str, file_name: &str) -> FilterVerdict;

    fn is_in_scope(&self, directory: &str, file_name: &str) -> bool {
        self.classify(directory, file_name) == FilterVerdict::InScope
    }
}

/// Extension of a file name including the leading dot, or `""` when there is
/// none. Leading dots of hidden files do not start an extension.
#[must_use]
pub fn extension_of(file_name: &str) -> &str {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    file_name[stem_start..]
        .rfind('.')
        .map_or("", |i| &file_name[stem_start + i..])
}

pub struct PathFilter {
    /// Root-relative catalog path; `None` when the catalog lies outside the root.
    catalog_path: Option<String>,
    extensions: BTreeSet<String>,
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl PathFilter {
    /// Create a new filter from the root-relative catalog path, extension
    /// allow-set and glob lists.
    ///
    /// # Errors
    /// Returns an error if any include or exclude pattern is invalid.
    pub fn new(
        catalog_path: impl Into<String>,
        extensions: BTreeSet<String>,
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Self> {
        Self::build(
            Some(catalog_path.into()),
            extensions,
            include_patterns,
            exclude_patterns,
        )
    }

    /// # Errors
    /// Returns an error if any configured filter pattern is invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::build(
            settings.catalog_rel_path(),
            settings.extensions.clone(),
            &settings.include_filter,
            &settings.exclude_filter,
        )
    }

    fn build(
        catalog_path: Option<String>,
        extensions: BTreeSet<String>,
        include_patterns: &[String],
        exclude_patterns: &[String],
    ) -> Result<Self> {
        Ok(Self {
            catalog_path: catalog_path.map(|path| {
                let (directory, file_name) = split_rel_path(&path);
                join_rel_path(&directory, &file_name)
            }),
            extensions,
            include: build_glob_set(include_patterns)?,
            exclude: build_glob_set(exclude_patterns)?,
        })
    }

    fn is_catalog_file(&self, directory: &str, file_name: &str) -> bool {
        self.catalog_path
            .as_deref()
            .is_some_and(|path| path == join_rel_path(directory, file_name))
    }

    fn is_excluded(&self, path: &str) -> bool {
        self.exclude.as_ref().is_some_and(|set| set.is_match(path))
    }

    fn is_not_included(&self, path: &str) -> bool {
        self.include.as_ref().is_some_and(|set| !set.is_match(path))
    }

    fn has_valid_extension(&self, file_name: &str) -> bool {
        self.extensions.contains(extension_of(file_name))
    }
}

impl FileFilter for PathFilter {
    fn classify(&self, directory: &str, file_name: &str) -> FilterVerdict {
        if self.is_catalog_file(directory, file_name) {
            return FilterVerdict::CatalogFile;
        }

        let path = join_rel_path(directory, file_name);
        if self.is_excluded(&path) || self.is_not_included(&path) {
            return FilterVerdict::Excluded;
        }

        if self.has_valid_extension(file_name) {
            FilterVerdict::InScope
        } else {
            FilterVerdict::Excluded
        }
    }
}

/// Shell-style patterns: `*` and `?` also match the path separator, as with
/// `fnmatch`. An empty list means "no filter".
fn build_glob_set(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| CatalogerError::InvalidPattern {
            pattern: pattern.clone(),
            source: e,
        })?;
        builder.add(glob);
    }
    let set = builder
        .build()
        .map_err(|e| CatalogerError::InvalidPattern {
            pattern: "combined patterns".to_string(),
            source: e,
        })?;
    Ok(Some(set))
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
