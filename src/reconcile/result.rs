use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::DirectorySummary;
use crate::config::{ReportCategory, ReportFlags};
use crate::{EXIT_PROBLEMS_FOUND, EXIT_SUCCESS};

/// Which pass produced a [`RunSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunAction {
    Create,
    Check,
}

/// Structured outcome of a create or check run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub action: RunAction,
    /// Entries loaded from (check) or written to (create) the catalog.
    pub catalog_entries: usize,
    /// Files that reached a terminal classification other than excluded.
    pub processed_count: usize,
    pub ok_count: usize,
    pub mismatched: Vec<String>,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
    pub excluded: Vec<String>,
    pub extension_counts: IndexMap<String, usize>,
    pub by_directory: Vec<DirectorySummary>,
    pub reports: ReportFlags,
}

impl RunSummary {
    #[must_use]
    pub fn new(action: RunAction, reports: ReportFlags) -> Self {
        Self {
            action,
            catalog_entries: 0,
            processed_count: 0,
            ok_count: 0,
            mismatched: Vec::new(),
            missing: Vec::new(),
            extra: Vec::new(),
            excluded: Vec::new(),
            extension_counts: IndexMap::new(),
            by_directory: Vec::new(),
            reports,
        }
    }

    /// Files listed under a category.
    #[must_use]
    pub fn files(&self, category: ReportCategory) -> &[String] {
        match category {
            ReportCategory::Mismatch => &self.mismatched,
            ReportCategory::Missing => &self.missing,
            ReportCategory::Extra => &self.extra,
            ReportCategory::Excluded => &self.excluded,
            ReportCategory::Extension => &[],
        }
    }

    /// True when an enabled category among mismatch, missing and extra is non-empty.
    #[must_use]
    pub fn has_problems(&self) -> bool {
        [
            ReportCategory::Mismatch,
            ReportCategory::Missing,
            ReportCategory::Extra,
        ]
        .into_iter()
        .any(|category| self.reports.is_enabled(category) && !self.files(category).is_empty())
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.action {
            RunAction::Create => EXIT_SUCCESS,
            RunAction::Check if self.has_problems() => EXIT_PROBLEMS_FOUND,
            RunAction::Check => EXIT_SUCCESS,
        }
    }

    pub(crate) fn count_extension(&mut self, extension: &str) {
        *self
            .extension_counts
            .entry(extension.to_string())
            .or_insert(0) += 1;
    }
}
