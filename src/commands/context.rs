use std::io::Write;
use std::path::Path;

use crate::catalog::EntryStatus;
use crate::cli::Cli;
use crate::config::{FileConfigLoader, FileSystem, LoadResult, Settings, SettingsOverrides};
use crate::error::Result;
use crate::output::{
    ColorMode, ErrorOutput, JsonFormatter, OutputFormat, ReportFormatter, StreamFormatter,
    TextFormatter,
};
use crate::reconcile::RunSummary;

/// How a finished run is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub color: ColorMode,
}

impl OutputOptions {
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            color: cli.color.into(),
        }
    }

    /// Whether classified files are written one by one while the run walks.
    #[must_use]
    pub const fn streams(&self, settings: &Settings) -> bool {
        matches!(self.format, OutputFormat::Text) && !settings.group && settings.verbose >= 1
    }
}

/// Defaults, then the config file (unless disabled), then the command line.
///
/// # Errors
/// Returns an error if the config file is unreadable or invalid, or the
/// merged settings are invalid.
pub fn resolve_settings<F: FileSystem>(
    loader: &FileConfigLoader<F>,
    config: Option<&Path>,
    no_config: bool,
    overrides: &SettingsOverrides,
) -> Result<LoadResult> {
    let mut result = if no_config {
        LoadResult {
            settings: Settings::default(),
            loaded_from: None,
            missing_explicit: None,
        }
    } else {
        loader.load(config)?
    };
    result.settings = result.settings.apply_overrides(overrides)?;
    Ok(result)
}

/// Resolve settings for a command-line invocation, warning about an explicit
/// config file that does not exist.
///
/// # Errors
/// Same as [`resolve_settings`].
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let result = resolve_settings(
        &FileConfigLoader::new(),
        cli.config.as_deref(),
        cli.no_config,
        &cli.overrides(),
    )?;
    if let Some(path) = &result.missing_explicit {
        ErrorOutput::new(cli.color.into()).print_warning(&format!(
            "Unable to open config file '{}' - continuing with defaults",
            path.display()
        ));
    }
    Ok(result.settings)
}

/// Observer that streams classification lines to `out`, remembering the
/// first write failure.
pub(crate) struct StreamSink<'a> {
    formatter: Option<StreamFormatter>,
    out: &'a mut dyn Write,
    error: Option<std::io::Error>,
}

impl<'a> StreamSink<'a> {
    pub(crate) fn new(options: OutputOptions, settings: &Settings, out: &'a mut dyn Write) -> Self {
        let formatter = options
            .streams(settings)
            .then(|| StreamFormatter::new(options.color, settings.reports));
        Self {
            formatter,
            out,
            error: None,
        }
    }

    pub(crate) fn observe(&mut self, rel_path: &str, status: EntryStatus) {
        let Some(line) = self
            .formatter
            .as_ref()
            .and_then(|f| f.line(rel_path, status))
        else {
            return;
        };
        if self.error.is_none()
            && let Err(e) = writeln!(self.out, "{line}")
        {
            self.error = Some(e);
        }
    }

    /// Write the final report and hand back any streaming failure.
    pub(crate) fn finish(
        self,
        options: OutputOptions,
        settings: &Settings,
        summary: &RunSummary,
    ) -> Result<()> {
        if let Some(e) = self.error {
            return Err(e.into());
        }
        write_report(self.out, options, settings, summary)
    }
}

/// Render `summary` in the requested format and write it out.
///
/// # Errors
/// Returns an error if rendering or writing fails.
pub fn write_report(
    out: &mut dyn Write,
    options: OutputOptions,
    settings: &Settings,
    summary: &RunSummary,
) -> Result<()> {
    let output = match options.format {
        OutputFormat::Text => TextFormatter::new(options.color, settings.verbose)
            .with_group(settings.group)
            .format(summary)?,
        OutputFormat::Json => {
            let mut json = JsonFormatter.format(summary)?;
            json.push('\n');
            json
        }
    };
    out.write_all(output.as_bytes())?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
