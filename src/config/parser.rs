//! Parser for the line-oriented, INI-like catalog configuration file.
//!
//! ```text
//! # comment
//! [catalog]
//! catalog = site.cat
//! hash = sha256
//!
//! [extensions]
//! - .gif,.png
//! + .svg
//!
//! [directories]
//! = build,dist
//!
//! [filters]
//! exclude = *_test.py
//!
//! [reports]
//! verbose = 2
//! extra = no
//! ```

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use super::model::{MAX_VERBOSE, ReportCategory, Settings};
use crate::error::{CatalogerError, Result};
use crate::signature::HashAlgorithm;

/// The closed set of section names a config file may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Catalog,
    Extensions,
    Directories,
    Filters,
    Reports,
}

type LineHandler = fn(&mut Settings, &ConfigLine<'_>) -> Result<()>;

impl Section {
    /// `manifest` is accepted as an alias of `catalog`.
    #[must_use]
    pub fn from_title(title: &str) -> Option<Self> {
        match title {
            "catalog" | "manifest" => Some(Self::Catalog),
            "extensions" => Some(Self::Extensions),
            "directories" => Some(Self::Directories),
            "filters" => Some(Self::Filters),
            "reports" => Some(Self::Reports),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Extensions => "extensions",
            Self::Directories => "directories",
            Self::Filters => "filters",
            Self::Reports => "reports",
        }
    }

    const fn handler(self) -> LineHandler {
        match self {
            Self::Catalog => catalog_line,
            Self::Extensions => extensions_line,
            Self::Directories => directories_line,
            Self::Filters => filters_line,
            Self::Reports => reports_line,
        }
    }
}

/// One significant (non-blank, non-comment) line with its 1-based number.
#[derive(Debug, Clone, Copy)]
pub struct ConfigLine<'a> {
    pub text: &'a str,
    pub number: usize,
}

impl ConfigLine<'_> {
    fn error(&self, what: &str, section: Section) -> CatalogerError {
        CatalogerError::config(format!(
            "{what} in section [{}]: '{}' on line {}",
            section.name(),
            self.text,
            self.number
        ))
    }

    /// Split `option = value`, trimming both halves.
    fn option_value(&self) -> Option<(&str, &str)> {
        self.text
            .split_once('=')
            .map(|(option, value)| (option.trim(), value.trim()))
    }
}

pub struct ConfigParser {
    title_pattern: Regex,
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            title_pattern: Regex::new(r"^\[(.*?)\]$").expect("Invalid regex"),
        }
    }

    /// Parse config lines on top of the built-in defaults.
    ///
    /// # Errors
    /// Returns a `Config` error for any malformed line.
    pub fn parse<I, S>(&self, lines: I) -> Result<Settings>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut settings = Settings::default();
        self.parse_into(&mut settings, lines)?;
        Ok(settings)
    }

    /// Apply config lines to an existing settings value.
    ///
    /// # Errors
    /// Returns a `Config` error on an unknown or repeated section, a line outside
    /// any section, or an invalid line inside a section.
    pub fn parse_into<I, S>(&self, settings: &mut Settings, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut current: Option<Section> = None;

        for (index, raw) in lines.into_iter().enumerate() {
            let text = raw.as_ref().trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            let line = ConfigLine {
                text,
                number: index + 1,
            };

            if let Some(caps) = self.title_pattern.captures(text) {
                let title = caps.get(1).map_or("", |m| m.as_str());
                let Some(section) = Section::from_title(title) else {
                    return Err(CatalogerError::config(format!(
                        "Unknown section title in config file: '{text}' on line {}",
                        line.number
                    )));
                };
                if !seen.insert(section) {
                    return Err(CatalogerError::config(format!(
                        "Repeated section title in config file: '{text}' on line {}",
                        line.number
                    )));
                }
                current = Some(section);
                continue;
            }

            let Some(section) = current else {
                return Err(CatalogerError::config(format!(
                    "Config line outside a section: '{text}' on line {}",
                    line.number
                )));
            };

            (section.handler())(settings, &line)?;
        }

        Ok(())
    }
}

fn catalog_line(settings: &mut Settings, line: &ConfigLine<'_>) -> Result<()> {
    let section = Section::Catalog;
    let Some((option, value)) = line.option_value() else {
        return Err(line.error("Invalid config line", section));
    };
    if value.is_empty() {
        return Err(line.error("Invalid value", section));
    }

    match option {
        "catalog" | "manifest" => settings.catalog_name = value.to_string(),
        "root" => settings.root = value.into(),
        "hash" => {
            settings.hash = value.parse::<HashAlgorithm>().map_err(|_| {
                CatalogerError::config(format!(
                    "Invalid value for hash: '{}' on line {} (expected one of {})",
                    line.text,
                    line.number,
                    HashAlgorithm::names().join(" | ")
                ))
            })?;
        }
        _ => return Err(line.error("Invalid config line", section)),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListOp {
    Replace,
    Union,
    Difference,
}

/// Split a `+ a,b` / `- a,b` / `= a,b` line into its operator and value set.
/// A blank remainder yields an empty set.
fn list_line(line: &ConfigLine<'_>, section: Section) -> Result<(ListOp, BTreeSet<String>)> {
    let mut chars = line.text.chars();
    let op = match chars.next() {
        Some('=') => ListOp::Replace,
        Some('+') => ListOp::Union,
        Some('-') => ListOp::Difference,
        _ => return Err(line.error("Invalid operator", section)),
    };

    let rest = chars.as_str().trim();
    let values: BTreeSet<String> = if rest.is_empty() {
        BTreeSet::new()
    } else {
        rest.split(',').map(|v| v.trim().to_string()).collect()
    };

    if values.contains("") {
        return Err(line.error("Invalid value", section));
    }
    Ok((op, values))
}

fn apply_list_op(
    target: &mut BTreeSet<String>,
    op: ListOp,
    values: BTreeSet<String>,
    line: &ConfigLine<'_>,
    section: Section,
) -> Result<()> {
    match op {
        ListOp::Replace => *target = values,
        _ if values.is_empty() => return Err(line.error("Invalid value", section)),
        ListOp::Union => target.extend(values),
        ListOp::Difference => target.retain(|v| !values.contains(v)),
    }
    Ok(())
}

fn extensions_line(settings: &mut Settings, line: &ConfigLine<'_>) -> Result<()> {
    let section = Section::Extensions;
    let (op, values) = list_line(line, section)?;
    if values.iter().any(|ext| ext.len() <= 1 || !ext.starts_with('.')) {
        return Err(line.error("Invalid value", section));
    }
    apply_list_op(&mut settings.extensions, op, values, line, section)
}

fn directories_line(settings: &mut Settings, line: &ConfigLine<'_>) -> Result<()> {
    let section = Section::Directories;
    let (op, values) = list_line(line, section)?;
    apply_list_op(&mut settings.ignored_directories, op, values, line, section)
}

fn filters_line(settings: &mut Settings, line: &ConfigLine<'_>) -> Result<()> {
    let section = Section::Filters;
    let Some((option, value)) = line.option_value() else {
        return Err(line.error("Invalid config line", section));
    };
    let patterns: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(ToString::to_string)
        .collect();

    match option {
        "include" => settings.include_filter = patterns,
        "exclude" => settings.exclude_filter = patterns,
        _ => return Err(line.error("Invalid config line", section)),
    }
    Ok(())
}

fn reports_line(settings: &mut Settings, line: &ConfigLine<'_>) -> Result<()> {
    let section = Section::Reports;
    let Some((option, value)) = line.option_value() else {
        return Err(line.error("Invalid option", section));
    };

    if option == "verbose" {
        settings.verbose = value
            .parse::<u8>()
            .ok()
            .filter(|v| *v <= MAX_VERBOSE)
            .ok_or_else(|| line.error("Invalid value", section))?;
        return Ok(());
    }

    let target = match option {
        "mismatch" => Some(ReportCategory::Mismatch),
        "missing" => Some(ReportCategory::Missing),
        "extra" => Some(ReportCategory::Extra),
        "excluded" | "skipped" => Some(ReportCategory::Excluded),
        "extension" => Some(ReportCategory::Extension),
        "group" => None,
        _ => return Err(line.error("Invalid option", section)),
    };

    let enabled = match value.to_ascii_lowercase().as_str() {
        "true" | "yes" => true,
        "false" | "no" => false,
        _ => return Err(line.error("Invalid value", section)),
    };

    match target {
        Some(category) => settings.reports.set(category, enabled),
        None => settings.group = enabled,
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
