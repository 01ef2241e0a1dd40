use std::io::Write;

use crate::EXIT_ERROR;
use crate::cli::Cli;
use crate::config::Settings;
use crate::error::Result;
use crate::output::ErrorOutput;
use crate::reconcile::Reconciler;

use super::context::{OutputOptions, StreamSink, load_settings};

#[must_use]
pub fn run_create(cli: &Cli) -> i32 {
    let result = load_settings(cli).and_then(|settings| {
        let mut stdout = std::io::stdout().lock();
        run_create_impl(&settings, OutputOptions::from_cli(cli), &mut stdout)
    });
    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            ErrorOutput::new(cli.color.into()).print_failure(&e);
            EXIT_ERROR
        }
    }
}

/// Write a fresh catalog for the tree and report on it.
///
/// # Errors
/// Returns an error if the catalog or the report cannot be written.
pub fn run_create_impl(
    settings: &Settings,
    options: OutputOptions,
    out: &mut dyn Write,
) -> Result<i32> {
    let reconciler = Reconciler::for_create(settings)?;
    let mut sink = StreamSink::new(options, settings, out);
    let summary = reconciler.create(|path, status| sink.observe(path, status))?;

    tracing::info!(
        entries = summary.catalog_entries,
        catalog = %settings.catalog_path().display(),
        "catalog written"
    );
    sink.finish(options, settings, &summary)?;
    Ok(summary.exit_code())
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
