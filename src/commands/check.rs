use std::io::Write;

use crate::EXIT_ERROR;
use crate::cli::Cli;
use crate::config::Settings;
use crate::error::Result;
use crate::output::ErrorOutput;
use crate::reconcile::Reconciler;

use super::context::{OutputOptions, StreamSink, load_settings};

#[must_use]
pub fn run_check(cli: &Cli) -> i32 {
    let result = load_settings(cli).and_then(|settings| {
        let mut stdout = std::io::stdout().lock();
        run_check_impl(&settings, OutputOptions::from_cli(cli), &mut stdout)
    });
    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            ErrorOutput::new(cli.color.into()).print_failure(&e);
            EXIT_ERROR
        }
    }
}

/// Check the tree against its catalog, writing the report to `out`.
///
/// Returns the exit code: non-zero when an enabled problem category is non-empty.
///
/// # Errors
/// Returns an error if the catalog cannot be loaded or the report cannot be written.
pub fn run_check_impl(
    settings: &Settings,
    options: OutputOptions,
    out: &mut dyn Write,
) -> Result<i32> {
    let reconciler = Reconciler::for_check(settings)?;
    let mut sink = StreamSink::new(options, settings, out);
    let summary = reconciler.check(|path, status| sink.observe(path, status));

    tracing::info!(
        processed = summary.processed_count,
        mismatched = summary.mismatched.len(),
        missing = summary.missing.len(),
        extra = summary.extra.len(),
        "check finished"
    );
    sink.finish(options, settings, &summary)?;
    Ok(summary.exit_code())
}

#[cfg(test)]
#[path = "check_tests.rs"]
mod tests;
