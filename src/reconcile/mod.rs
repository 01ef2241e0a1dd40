//! Reconciliation of the live tree against a catalog.
//!
//! A [`Reconciler`] owns one catalog for exactly one pass: `check` and `create`
//! consume it, so a store can never be reconciled twice.

mod result;

pub use result::{RunAction, RunSummary};

use std::collections::HashSet;

use crate::catalog::{Catalog, EntryStatus, join_rel_path};
use crate::config::Settings;
use crate::error::{CatalogerError, Result};
use crate::scanner::{
    DirectoryWalker, FileFilter, FilterVerdict, PathFilter, extension_of, is_under_ignored,
};
use crate::signature::SignatureProvider;

pub struct Reconciler {
    settings: Settings,
    catalog: Catalog,
    signer: SignatureProvider,
    walker: DirectoryWalker<PathFilter>,
}

impl Reconciler {
    /// Prepare a check run: load the catalog named by the settings.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory, a filter pattern is
    /// invalid, or the catalog cannot be loaded.
    pub fn for_check(settings: &Settings) -> Result<Self> {
        ensure_root(settings)?;
        let walker = build_walker(settings)?;
        let catalog = Catalog::load(&settings.catalog_path())?;
        Ok(Self::with_parts(settings, catalog, walker))
    }

    /// Prepare a create run over an empty catalog.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory or a filter pattern is invalid.
    pub fn for_create(settings: &Settings) -> Result<Self> {
        ensure_root(settings)?;
        let walker = build_walker(settings)?;
        Ok(Self::with_parts(settings, Catalog::new(), walker))
    }

    /// Reconcile against an already loaded catalog.
    ///
    /// # Errors
    /// Returns an error if the root is not a directory or a filter pattern is invalid.
    pub fn with_catalog(settings: &Settings, catalog: Catalog) -> Result<Self> {
        ensure_root(settings)?;
        let walker = build_walker(settings)?;
        Ok(Self::with_parts(settings, catalog, walker))
    }

    fn with_parts(
        settings: &Settings,
        catalog: Catalog,
        walker: DirectoryWalker<PathFilter>,
    ) -> Self {
        Self {
            signer: SignatureProvider::new(settings.root.clone(), settings.hash),
            settings: settings.clone(),
            catalog,
            walker,
        }
    }

    /// Compare the live tree with the catalog.
    ///
    /// `observer` sees every file as soon as it is classified.
    pub fn check(self, mut observer: impl FnMut(&str, EntryStatus)) -> RunSummary {
        let Self {
            settings,
            mut catalog,
            signer,
            walker,
        } = self;
        let mut pass = Pass::new(RunAction::Check, &settings);
        pass.summary.catalog_entries = catalog.len();
        let mut visited = HashSet::new();

        for batch in walker.walk() {
            for name in &batch.excluded {
                let rel_path = batch.rel_path(name);
                pass.record(&mut catalog, &rel_path, EntryStatus::Excluded, &mut observer);
            }

            for name in &batch.files {
                let rel_path = batch.rel_path(name);
                let status = if !catalog.is_file_known(&batch.directory, name) {
                    EntryStatus::Extra
                } else if signer.signature_of(&catalog, &rel_path, true)
                    != signer.signature_of(&catalog, &rel_path, false)
                {
                    EntryStatus::Mismatch
                } else {
                    EntryStatus::Processed
                };
                pass.record(&mut catalog, &rel_path, status, &mut observer);
            }

            if catalog.is_directory_known(&batch.directory) {
                pass.sweep_missing(
                    &mut catalog,
                    walker.filter(),
                    &batch.directory,
                    &mut observer,
                );
            }
            visited.insert(batch.directory);
        }

        let unvisited: Vec<String> = catalog
            .directories()
            .filter(|d| !visited.contains(*d) && !is_under_ignored(d, walker.ignored()))
            .map(ToString::to_string)
            .collect();
        for directory in &unvisited {
            tracing::debug!(directory = %directory, "catalog directory no longer on disk");
            pass.sweep_missing(&mut catalog, walker.filter(), directory, &mut observer);
        }

        pass.finish(&catalog)
    }

    /// Hash every in-scope file and write the catalog.
    ///
    /// # Errors
    /// Returns an error if the catalog file cannot be written.
    pub fn create(self, mut observer: impl FnMut(&str, EntryStatus)) -> Result<RunSummary> {
        let Self {
            settings,
            mut catalog,
            signer,
            walker,
        } = self;
        let mut pass = Pass::new(RunAction::Create, &settings);

        for batch in walker.walk() {
            for name in &batch.excluded {
                let rel_path = batch.rel_path(name);
                pass.record(&mut catalog, &rel_path, EntryStatus::Excluded, &mut observer);
            }

            for name in &batch.files {
                let rel_path = batch.rel_path(name);
                // Unreadable files were already reported by the signer.
                if let Some(signature) = signer.live_signature(&rel_path) {
                    catalog.add(&rel_path, signature);
                    pass.count(&rel_path, EntryStatus::Added, &mut observer);
                }
            }
        }

        let written = catalog.save(&settings.catalog_path())?;
        let mut summary = pass.finish(&catalog);
        summary.catalog_entries = written;
        Ok(summary)
    }
}

/// Load the configured catalog and compare it with the tree under the root.
///
/// # Errors
/// Returns an error if the root, the filters or the catalog are unusable.
pub fn check_catalog(settings: &Settings) -> Result<RunSummary> {
    Ok(Reconciler::for_check(settings)?.check(|_, _| {}))
}

/// Build a fresh catalog of the tree under the root and write it out.
///
/// # Errors
/// Returns an error if the root or the filters are unusable, or the catalog
/// cannot be written.
pub fn create_catalog(settings: &Settings) -> Result<RunSummary> {
    Reconciler::for_create(settings)?.create(|_, _| {})
}

fn ensure_root(settings: &Settings) -> Result<()> {
    if settings.root.is_dir() {
        Ok(())
    } else {
        Err(CatalogerError::InvalidSettings(format!(
            "Root is not a directory: {}",
            settings.root.display()
        )))
    }
}

fn build_walker(settings: &Settings) -> Result<DirectoryWalker<PathFilter>> {
    let filter = PathFilter::from_settings(settings)?;
    Ok(DirectoryWalker::new(
        settings.root.clone(),
        settings.ignored_directories.clone(),
        filter,
    ))
}

/// Running totals of one pass.
struct Pass {
    summary: RunSummary,
}

impl Pass {
    fn new(action: RunAction, settings: &Settings) -> Self {
        Self {
            summary: RunSummary::new(action, settings.reports),
        }
    }

    /// Store the final status of `rel_path` and account for it.
    fn record(
        &mut self,
        catalog: &mut Catalog,
        rel_path: &str,
        status: EntryStatus,
        observer: &mut impl FnMut(&str, EntryStatus),
    ) {
        catalog.mark_status(rel_path, status);
        self.count(rel_path, status, observer);
    }

    fn count(
        &mut self,
        rel_path: &str,
        status: EntryStatus,
        observer: &mut impl FnMut(&str, EntryStatus),
    ) {
        tracing::trace!(path = rel_path, status = status.as_str(), "classified");
        let summary = &mut self.summary;
        match status {
            EntryStatus::Excluded => summary.excluded.push(rel_path.to_string()),
            EntryStatus::Mismatch => summary.mismatched.push(rel_path.to_string()),
            EntryStatus::Missing => summary.missing.push(rel_path.to_string()),
            EntryStatus::Extra => summary.extra.push(rel_path.to_string()),
            EntryStatus::Processed => summary.ok_count += 1,
            EntryStatus::Added | EntryStatus::Unprocessed => {}
        }
        if status.counts_extension() {
            summary.processed_count += 1;
            let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
            summary.count_extension(extension_of(file_name));
        }
        observer(rel_path, status);
    }

    /// Classify what is still unprocessed in `directory` as missing. Entries
    /// the current filters put out of scope are excluded instead.
    fn sweep_missing(
        &mut self,
        catalog: &mut Catalog,
        filter: &PathFilter,
        directory: &str,
        observer: &mut impl FnMut(&str, EntryStatus),
    ) {
        let remaining: Vec<String> = catalog
            .unprocessed_filenames(directory)
            .map(ToString::to_string)
            .collect();
        for name in remaining {
            let status = match filter.classify(directory, &name) {
                FilterVerdict::InScope => EntryStatus::Missing,
                FilterVerdict::Excluded | FilterVerdict::CatalogFile => EntryStatus::Excluded,
            };
            let rel_path = join_rel_path(directory, &name);
            self.record(catalog, &rel_path, status, observer);
        }
    }

    fn finish(self, catalog: &Catalog) -> RunSummary {
        let mut summary = self.summary;
        summary.by_directory = catalog.summary_by_directory();
        summary
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
