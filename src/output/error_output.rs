//! Error and warning lines on stderr.
//!
//! Format: `✖ Type: message` / `  × detail` / `  help: suggestion`

use std::io::{IsTerminal, Write};

use super::ColorMode;
use super::ansi;
use crate::error::CatalogerError;

pub struct ErrorOutput {
    use_colors: bool,
}

impl ErrorOutput {
    #[must_use]
    pub fn new(mode: ColorMode) -> Self {
        Self {
            use_colors: mode.use_colors(std::io::stderr().is_terminal()),
        }
    }

    /// Creates an error output formatter with explicit color control (for testing).
    #[cfg(test)]
    pub const fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Print a crate error with its category label and a hint where one applies.
    pub fn print_failure(&self, error: &CatalogerError) {
        let mut stderr = std::io::stderr().lock();
        self.write_failure(&mut stderr, error);
    }

    pub fn print_warning(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        self.write_warning(&mut stderr, message, None);
    }

    pub fn write_failure<W: Write>(&self, w: &mut W, error: &CatalogerError) {
        let detail = std::error::Error::source(error).map(ToString::to_string);
        let detail = detail.filter(|d| !error.to_string().contains(d.as_str()));
        self.write_error(
            w,
            error.error_type(),
            &error.to_string(),
            detail.as_deref(),
            suggestion_for(error),
        );
    }

    /// Writes error to a writer (for testing).
    pub fn write_error<W: Write>(
        &self,
        w: &mut W,
        error_type: &str,
        message: &str,
        detail: Option<&str>,
        suggestion: Option<&str>,
    ) {
        // Nothing sensible can be done when stderr itself is gone.
        if self.use_colors {
            let _ = writeln!(
                w,
                "{}{}✖ {error_type}:{} {message}",
                ansi::BOLD,
                ansi::RED,
                ansi::RESET
            );
        } else {
            let _ = writeln!(w, "✖ {error_type}: {message}");
        }
        self.write_trailer(w, detail, suggestion);
    }

    /// Writes warning to a writer (for testing).
    pub fn write_warning<W: Write>(&self, w: &mut W, message: &str, suggestion: Option<&str>) {
        if self.use_colors {
            let _ = writeln!(
                w,
                "{}{}⚠ Warning:{} {message}",
                ansi::BOLD,
                ansi::YELLOW,
                ansi::RESET
            );
        } else {
            let _ = writeln!(w, "⚠ Warning: {message}");
        }
        self.write_trailer(w, None, suggestion);
    }

    fn write_trailer<W: Write>(&self, w: &mut W, detail: Option<&str>, suggestion: Option<&str>) {
        if let Some(d) = detail {
            if self.use_colors {
                let _ = writeln!(w, "  {}× {d}{}", ansi::DIM, ansi::RESET);
            } else {
                let _ = writeln!(w, "  × {d}");
            }
        }

        if let Some(s) = suggestion {
            if self.use_colors {
                let _ = writeln!(w, "  {}help:{} {s}", ansi::CYAN, ansi::RESET);
            } else {
                let _ = writeln!(w, "  help: {s}");
            }
        }
    }
}

const fn suggestion_for(error: &CatalogerError) -> Option<&'static str> {
    match error {
        CatalogerError::Config { .. } | CatalogerError::ConfigRead { .. } => {
            Some("Fix the config file or run with --no-config")
        }
        CatalogerError::CatalogAccess { .. } => {
            Some("Run 'cataloger create' first, or point --catalog at an existing file")
        }
        CatalogerError::InvalidPattern { .. } => {
            Some("Filters use shell-style globs such as 'app/*.py'")
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "error_output_tests.rs"]
mod tests;
