use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{CatalogerError, Result};
use crate::signature::HashAlgorithm;

pub const DEFAULT_CATALOG_FILE: &str = "catalog.cat";
pub const DEFAULT_CONFIG_FILE: &str = "catalog.cfg";
pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_VERBOSE: u8 = 1;
pub const MAX_VERBOSE: u8 = 3;

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".html", ".txt", ".css", ".js", ".gif", ".png", ".jpg", ".jpeg",
];

pub const DEFAULT_IGNORED_DIRECTORIES: &[&str] =
    &["static", "htmlcov", "media", "build", "dist", "docs"];

/// Report categories that can be switched on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Mismatch,
    Missing,
    Extra,
    Excluded,
    Extension,
}

/// Per-category report toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ReportFlags {
    pub mismatch: bool,
    pub missing: bool,
    pub extra: bool,
    pub excluded: bool,
    pub extension: bool,
}

impl Default for ReportFlags {
    fn default() -> Self {
        Self {
            mismatch: true,
            missing: true,
            extra: true,
            excluded: true,
            extension: true,
        }
    }
}

impl ReportFlags {
    #[must_use]
    pub const fn is_enabled(&self, category: ReportCategory) -> bool {
        match category {
            ReportCategory::Mismatch => self.mismatch,
            ReportCategory::Missing => self.missing,
            ReportCategory::Extra => self.extra,
            ReportCategory::Excluded => self.excluded,
            ReportCategory::Extension => self.extension,
        }
    }

    pub const fn set(&mut self, category: ReportCategory, enabled: bool) {
        match category {
            ReportCategory::Mismatch => self.mismatch = enabled,
            ReportCategory::Missing => self.missing = enabled,
            ReportCategory::Extra => self.extra = enabled,
            ReportCategory::Excluded => self.excluded = enabled,
            ReportCategory::Extension => self.extension = enabled,
        }
    }
}

/// Fully resolved settings for one create or check run.
///
/// Every instance owns its collections; `Settings::default()` builds them afresh
/// from the constant tables above.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub root: PathBuf,
    pub catalog_name: String,
    pub hash: HashAlgorithm,
    pub extensions: BTreeSet<String>,
    pub ignored_directories: BTreeSet<String>,
    pub include_filter: Vec<String>,
    pub exclude_filter: Vec<String>,
    pub reports: ReportFlags,
    pub verbose: u8,
    pub group: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            catalog_name: DEFAULT_CATALOG_FILE.to_string(),
            hash: HashAlgorithm::default(),
            extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            ignored_directories: DEFAULT_IGNORED_DIRECTORIES
                .iter()
                .map(ToString::to_string)
                .collect(),
            include_filter: Vec::new(),
            exclude_filter: Vec::new(),
            reports: ReportFlags::default(),
            verbose: DEFAULT_VERBOSE,
            group: true,
        }
    }
}

impl Settings {
    /// Location of the catalog file. Relative names are resolved against the root.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        let name = Path::new(&self.catalog_name);
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.root.join(name)
        }
    }

    /// The catalog file as a `/`-separated path relative to the root, or `None`
    /// when it lives outside the root.
    #[must_use]
    pub fn catalog_rel_path(&self) -> Option<String> {
        let path = self.catalog_path();
        let relative = match path.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => {
                // Absolute catalog path against a relative root, or the reverse.
                let root = fs::canonicalize(&self.root).ok()?;
                let parent = fs::canonicalize(path.parent()?).ok()?;
                parent
                    .join(path.file_name()?)
                    .strip_prefix(root)
                    .ok()?
                    .to_path_buf()
            }
        };

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        (!parts.is_empty()).then(|| parts.join("/"))
    }

    /// Apply the command-line layer on top of these settings.
    ///
    /// # Errors
    /// Returns an error if a supplied extension is malformed or the merged
    /// extension set ends up empty.
    pub fn apply_overrides(mut self, overrides: &SettingsOverrides) -> Result<Self> {
        if let Some(ref root) = overrides.root {
            self.root.clone_from(root);
        }
        if let Some(ref catalog_name) = overrides.catalog_name {
            self.catalog_name.clone_from(catalog_name);
        }
        if let Some(hash) = overrides.hash {
            self.hash = hash;
        }
        if let Some(verbose) = overrides.verbose {
            self.verbose = verbose;
        }
        if let Some(group) = overrides.group {
            self.group = group;
        }
        for (category, enabled) in &overrides.reports {
            self.reports.set(*category, *enabled);
        }

        for ext in overrides
            .extensions
            .iter()
            .flatten()
            .chain(&overrides.add_extensions)
            .chain(&overrides.remove_extensions)
        {
            validate_extension(ext)?;
        }
        if let Some(ref extensions) = overrides.extensions {
            self.extensions.clone_from(extensions);
        }
        if let Some(ref directories) = overrides.ignored_directories {
            self.ignored_directories.clone_from(directories);
        }
        apply_set_edits(
            &mut self.extensions,
            &overrides.remove_extensions,
            &overrides.add_extensions,
        );
        apply_set_edits(
            &mut self.ignored_directories,
            &overrides.remove_directories,
            &overrides.add_directories,
        );

        if !overrides.include_filter.is_empty() {
            self.include_filter.clone_from(&overrides.include_filter);
        }
        if !overrides.exclude_filter.is_empty() {
            self.exclude_filter.clone_from(&overrides.exclude_filter);
        }

        self.validate()?;
        Ok(self)
    }

    /// Check invariants that must hold before any filesystem work starts.
    ///
    /// # Errors
    /// Returns `InvalidSettings` when no extensions remain or verbosity is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.extensions.is_empty() {
            return Err(CatalogerError::InvalidSettings(
                "No file extensions given to catalogue or check".to_string(),
            ));
        }
        if self.verbose > MAX_VERBOSE {
            return Err(CatalogerError::InvalidSettings(format!(
                "Verbosity must be between 0 and {MAX_VERBOSE}, got {}",
                self.verbose
            )));
        }
        Ok(())
    }
}

fn apply_set_edits(set: &mut BTreeSet<String>, remove: &[String], add: &[String]) {
    for value in remove {
        set.remove(value);
    }
    set.extend(add.iter().cloned());
}

fn validate_extension(ext: &str) -> Result<()> {
    if ext.len() > 1 && ext.starts_with('.') {
        Ok(())
    } else {
        Err(CatalogerError::InvalidSettings(format!(
            "File extensions must start with a '.': '{ext}'"
        )))
    }
}

/// Values supplied explicitly on the command line (or by an API caller).
///
/// These always win over the config file and the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub root: Option<PathBuf>,
    pub catalog_name: Option<String>,
    pub hash: Option<HashAlgorithm>,
    pub verbose: Option<u8>,
    pub group: Option<bool>,
    pub reports: Vec<(ReportCategory, bool)>,
    /// Replaces the extension set before the remove and add lists apply.
    pub extensions: Option<BTreeSet<String>>,
    /// Replaces the ignored-directory set before the remove and add lists apply.
    pub ignored_directories: Option<BTreeSet<String>>,
    pub add_extensions: Vec<String>,
    pub remove_extensions: Vec<String>,
    pub add_directories: Vec<String>,
    pub remove_directories: Vec<String>,
    pub include_filter: Vec<String>,
    pub exclude_filter: Vec<String>,
}

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;
