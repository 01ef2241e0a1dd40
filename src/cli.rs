use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::{ReportCategory, SettingsOverrides};
use crate::output::{ColorMode, OutputFormat};
use crate::signature::HashAlgorithm;

/// Color output control
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal capability
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorChoice> for ColorMode {
    fn from(choice: ColorChoice) -> Self {
        match choice {
            ColorChoice::Auto => Self::Auto,
            ColorChoice::Always => Self::Always,
            ColorChoice::Never => Self::Never,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "cataloger")]
#[command(author, version, about = "Catalog file signatures and check a tree against them")]
#[command(long_about = "Walks a directory tree, records a signature for every matching file \
    (create) and later reports files that changed, disappeared or appeared (check).\n\n\
    Exit codes:\n  \
    0 - Success, nothing to report\n  \
    1 - Check found mismatched, missing or extra files\n  \
    2 - Configuration, catalog or runtime error")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Report detail: 0 silent, 1 counts, 2 file lists, 3 per-directory summary
    #[arg(short, long, global = true, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub verbose: Option<u8>,

    /// Hash algorithm for signatures
    #[arg(long, global = true)]
    pub hash: Option<HashAlgorithm>,

    /// Catalog file name, relative to the root
    #[arg(short = 'm', long = "catalog", global = true)]
    pub catalog: Option<String>,

    /// Root of the tree to catalog
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Only catalog paths matching this glob (repeatable)
    #[arg(long, global = true)]
    pub include_filter: Vec<String>,

    /// Skip paths matching this glob (repeatable)
    #[arg(long, global = true)]
    pub exclude_filter: Vec<String>,

    /// Add a file extension to the catalogued set, e.g. '.rst' (repeatable)
    #[arg(long, global = true)]
    pub add_extension: Vec<String>,

    /// Remove a file extension from the catalogued set (repeatable)
    #[arg(long, global = true)]
    pub rm_extension: Vec<String>,

    /// Ignore another top-level directory (repeatable)
    #[arg(long, global = true)]
    pub add_directory: Vec<String>,

    /// Stop ignoring a top-level directory (repeatable)
    #[arg(long, global = true)]
    pub rm_directory: Vec<String>,

    /// Report files left out by filters or extension rules
    #[arg(long, global = true, overrides_with = "no_report_excluded")]
    pub report_excluded: bool,

    #[arg(long, global = true, hide = true, overrides_with = "report_excluded")]
    pub no_report_excluded: bool,

    /// Report counts per file extension
    #[arg(long, global = true, overrides_with = "no_report_extensions")]
    pub report_extensions: bool,

    #[arg(long, global = true, hide = true, overrides_with = "report_extensions")]
    pub no_report_extensions: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(short = 'N', long, global = true)]
    pub no_config: bool,

    /// Output format [possible values: text, json]
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Control color output
    #[arg(long, value_enum, default_value = "auto", global = true)]
    pub color: ColorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new catalog
    Create,

    /// Check local files against the catalog
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct CheckArgs {
    /// Report files whose signature changed
    #[arg(long, overrides_with = "no_report_mismatch")]
    pub report_mismatch: bool,

    #[arg(long, hide = true, overrides_with = "report_mismatch")]
    pub no_report_mismatch: bool,

    /// Report cataloged files that are gone
    #[arg(long, overrides_with = "no_report_missing")]
    pub report_missing: bool,

    #[arg(long, hide = true, overrides_with = "report_missing")]
    pub no_report_missing: bool,

    /// Report files that are not in the catalog
    #[arg(long, overrides_with = "no_report_extra")]
    pub report_extra: bool,

    #[arg(long, hide = true, overrides_with = "report_extra")]
    pub no_report_extra: bool,

    /// Group files by category at the end instead of streaming them
    #[arg(long, overrides_with = "no_group")]
    pub group: bool,

    #[arg(long, hide = true, overrides_with = "group")]
    pub no_group: bool,
}

/// `Some(true)` for `--flag`, `Some(false)` for `--no-flag`, `None` when neither was given.
const fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

impl Cli {
    /// Values given on the command line, ready to layer over the config file.
    #[must_use]
    pub fn overrides(&self) -> SettingsOverrides {
        let mut reports = Vec::new();
        let mut push = |category, on, off| {
            if let Some(enabled) = flag_pair(on, off) {
                reports.push((category, enabled));
            }
        };
        push(
            ReportCategory::Excluded,
            self.report_excluded,
            self.no_report_excluded,
        );
        push(
            ReportCategory::Extension,
            self.report_extensions,
            self.no_report_extensions,
        );

        let mut group = None;
        if let Commands::Check(args) = &self.command {
            push(
                ReportCategory::Mismatch,
                args.report_mismatch,
                args.no_report_mismatch,
            );
            push(
                ReportCategory::Missing,
                args.report_missing,
                args.no_report_missing,
            );
            push(ReportCategory::Extra, args.report_extra, args.no_report_extra);
            group = flag_pair(args.group, args.no_group);
        }

        SettingsOverrides {
            root: self.root.clone(),
            catalog_name: self.catalog.clone(),
            hash: self.hash,
            verbose: self.verbose,
            group,
            reports,
            extensions: None,
            ignored_directories: None,
            add_extensions: self.add_extension.clone(),
            remove_extensions: self.rm_extension.clone(),
            add_directories: self.add_directory.clone(),
            remove_directories: self.rm_directory.clone(),
            include_filter: self.include_filter.clone(),
            exclude_filter: self.exclude_filter.clone(),
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
