use crate::catalog::EntryStatus;
use crate::config::{ReportCategory, ReportFlags};

use super::{ColorMode, ansi};

/// One line per classified file, printed while the run is still walking.
pub struct StreamFormatter {
    use_colors: bool,
    reports: ReportFlags,
}

impl StreamFormatter {
    #[must_use]
    pub fn new(mode: ColorMode, reports: ReportFlags) -> Self {
        Self {
            use_colors: mode.use_colors(std::io::IsTerminal::is_terminal(&std::io::stdout())),
            reports,
        }
    }

    #[cfg(test)]
    pub const fn plain(reports: ReportFlags) -> Self {
        Self {
            use_colors: false,
            reports,
        }
    }

    /// The line for `rel_path`, or `None` when its category is not reported.
    #[must_use]
    pub fn line(&self, rel_path: &str, status: EntryStatus) -> Option<String> {
        let (category, label, color) = match status {
            EntryStatus::Mismatch => (ReportCategory::Mismatch, "MISMATCH", ansi::RED),
            EntryStatus::Missing => (ReportCategory::Missing, "MISSING", ansi::RED),
            EntryStatus::Extra => (ReportCategory::Extra, "EXTRA", ansi::YELLOW),
            EntryStatus::Excluded => (ReportCategory::Excluded, "EXCLUDED", ansi::CYAN),
            EntryStatus::Processed | EntryStatus::Added | EntryStatus::Unprocessed => return None,
        };
        if !self.reports.is_enabled(category) {
            return None;
        }

        let label = if self.use_colors {
            format!("{color}{label:<8}{}", ansi::RESET)
        } else {
            format!("{label:<8}")
        };
        Some(format!("{label} : '{rel_path}'"))
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
