use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::DirectorySummary;
use crate::config::ReportFlags;
use crate::error::Result;
use crate::reconcile::{RunAction, RunSummary};

use super::ReportFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonOutput<'a> {
    action: RunAction,
    summary: Summary,
    mismatched: &'a [String],
    missing: &'a [String],
    extra: &'a [String],
    excluded: &'a [String],
    extensions: &'a IndexMap<String, usize>,
    by_directory: &'a [DirectorySummary],
    reports: ReportFlags,
    exit_code: i32,
}

#[derive(Serialize)]
struct Summary {
    catalog_entries: usize,
    processed: usize,
    ok: usize,
    mismatched: usize,
    missing: usize,
    extra: usize,
    excluded: usize,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary) -> Result<String> {
        let output = JsonOutput {
            action: summary.action,
            summary: Summary {
                catalog_entries: summary.catalog_entries,
                processed: summary.processed_count,
                ok: summary.ok_count,
                mismatched: summary.mismatched.len(),
                missing: summary.missing.len(),
                extra: summary.extra.len(),
                excluded: summary.excluded.len(),
            },
            mismatched: &summary.mismatched,
            missing: &summary.missing,
            extra: &summary.extra,
            excluded: &summary.excluded,
            extensions: &summary.extension_counts,
            by_directory: &summary.by_directory,
            reports: summary.reports,
            exit_code: summary.exit_code(),
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
