use std::fmt::Write;

use crate::catalog::DirectorySummary;
use crate::config::ReportCategory;
use crate::error::Result;
use crate::reconcile::{RunAction, RunSummary};

use super::{ColorMode, ReportFormatter, ansi};

/// Categories in report order, with their heading.
const PROBLEM_CATEGORIES: [(ReportCategory, &str); 3] = [
    (ReportCategory::Mismatch, "Mismatched"),
    (ReportCategory::Missing, "Missing"),
    (ReportCategory::Extra, "Extra"),
];

/// Human readable report.
///
/// Verbosity 0 prints nothing, 1 prints counts, 2 adds the file lists (when
/// grouped) and 3 adds the per-directory breakdown.
pub struct TextFormatter {
    use_colors: bool,
    verbose: u8,
    group: bool,
}

impl TextFormatter {
    #[must_use]
    pub fn new(mode: ColorMode, verbose: u8) -> Self {
        Self {
            use_colors: mode.use_colors(std::io::IsTerminal::is_terminal(&std::io::stdout())),
            verbose,
            group: true,
        }
    }

    /// Grouped reports list files under their category; streamed runs have
    /// already printed them one by one.
    #[must_use]
    pub const fn with_group(mut self, group: bool) -> Self {
        self.group = group;
        self
    }

    #[cfg(test)]
    pub const fn plain(verbose: u8) -> Self {
        Self {
            use_colors: false,
            verbose,
            group: true,
        }
    }

    const fn lists_files(&self) -> bool {
        self.group && self.verbose >= 2
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }
        format!("{color}{text}{}", ansi::RESET)
    }

    fn write_category(&self, out: &mut String, heading: &str, files: &[String], problem: bool) {
        let count = files.len().to_string();
        let count = match (problem, files.is_empty()) {
            (true, false) => self.colorize(&count, ansi::RED),
            (true, true) => self.colorize(&count, ansi::GREEN),
            (false, _) => count,
        };
        let _ = writeln!(out, "{heading}: {count}");
        if self.lists_files() {
            for file in files {
                let _ = writeln!(out, "  {file}");
            }
        }
    }

    fn write_extensions(out: &mut String, summary: &RunSummary) {
        if summary.extension_counts.is_empty() {
            return;
        }
        let _ = writeln!(out, "Extensions:");
        let width = summary
            .extension_counts
            .keys()
            .map(String::len)
            .max()
            .unwrap_or(0);
        for (extension, count) in &summary.extension_counts {
            let _ = writeln!(out, "  {extension:<width$} : {count}");
        }
    }

    fn write_directories(out: &mut String, action: RunAction, directories: &[DirectorySummary]) {
        let _ = writeln!(out, "By directory:");
        for dir in directories {
            let _ = match action {
                RunAction::Create => writeln!(
                    out,
                    "  {}: added={}, excluded={}",
                    dir.path, dir.added, dir.excluded
                ),
                RunAction::Check => writeln!(
                    out,
                    "  {}: ok={}, mismatch={}, missing={}, extra={}, excluded={}",
                    dir.path, dir.processed, dir.mismatch, dir.missing, dir.extra, dir.excluded
                ),
            };
        }
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new(ColorMode::Auto, crate::config::DEFAULT_VERBOSE)
    }
}

impl ReportFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary) -> Result<String> {
        let mut out = String::new();
        if self.verbose == 0 {
            return Ok(out);
        }

        match summary.action {
            RunAction::Create => {
                let _ = writeln!(out, "Files cataloged: {}", summary.catalog_entries);
            }
            RunAction::Check => {
                let _ = writeln!(
                    out,
                    "Files processed: {} ({} ok)",
                    summary.processed_count, summary.ok_count
                );
                for (category, heading) in PROBLEM_CATEGORIES {
                    if summary.reports.is_enabled(category) {
                        self.write_category(&mut out, heading, summary.files(category), true);
                    }
                }
            }
        }

        if summary.reports.excluded {
            self.write_category(&mut out, "Excluded", &summary.excluded, false);
        }
        if summary.reports.extension {
            Self::write_extensions(&mut out, summary);
        }
        if self.verbose >= 3 {
            Self::write_directories(&mut out, summary.action, &summary.by_directory);
        }

        if summary.action == RunAction::Check {
            let verdict = if summary.has_problems() {
                self.colorize("PROBLEMS FOUND", ansi::RED)
            } else {
                self.colorize("OK", ansi::GREEN)
            };
            let _ = writeln!(out, "Result: {verdict}");
        }

        Ok(out)
    }
}

#[cfg(test)]
#[path = "text_tests.rs"]
mod tests;
