use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::output::{ColorMode, OutputFormat};
use crate::signature::HashAlgorithm;
use crate::{EXIT_PROBLEMS_FOUND, EXIT_SUCCESS};

fn options(format: OutputFormat) -> OutputOptions {
    OutputOptions {
        format,
        color: ColorMode::Never,
    }
}

fn tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.py"), "a").unwrap();
    fs::write(temp_dir.path().join("c.py"), "c").unwrap();
    let catalog = format!(
        "a.py\t{}\nb.py\t{}\n",
        HashAlgorithm::Sha224.digest_bytes(b"a"),
        HashAlgorithm::Sha224.digest_bytes(b"b")
    );
    fs::write(temp_dir.path().join("catalog.cat"), catalog).unwrap();
    temp_dir
}

fn settings_for(root: &Path) -> Settings {
    Settings {
        root: root.to_path_buf(),
        ..Settings::default()
    }
}

fn run(settings: &Settings, format: OutputFormat) -> (Result<i32>, String) {
    let mut out = Vec::new();
    let result = run_check_impl(settings, options(format), &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn problems_give_exit_one_and_report() {
    let temp_dir = tree();
    let mut settings = settings_for(temp_dir.path());
    settings.verbose = 2;

    let (result, output) = run(&settings, OutputFormat::Text);

    assert_eq!(result.unwrap(), EXIT_PROBLEMS_FOUND);
    assert!(output.contains("Missing: 1\n  b.py\n"));
    assert!(output.contains("Extra: 1\n  c.py\n"));
    assert!(output.ends_with("Result: PROBLEMS FOUND\n"));
}

#[test]
fn disabled_categories_give_exit_zero() {
    let temp_dir = tree();
    let mut settings = settings_for(temp_dir.path());
    settings.reports.missing = false;
    settings.reports.extra = false;

    let (result, output) = run(&settings, OutputFormat::Text);

    assert_eq!(result.unwrap(), EXIT_SUCCESS);
    assert!(output.ends_with("Result: OK\n"));
}

#[test]
fn ungrouped_check_streams_lines() {
    let temp_dir = tree();
    let mut settings = settings_for(temp_dir.path());
    settings.group = false;

    let (_, output) = run(&settings, OutputFormat::Text);

    assert!(output.starts_with("EXTRA    : 'c.py'\nMISSING  : 'b.py'\n"));
}

#[test]
fn quiet_check_still_sets_exit_code() {
    let temp_dir = tree();
    let mut settings = settings_for(temp_dir.path());
    settings.verbose = 0;

    let (result, output) = run(&settings, OutputFormat::Text);

    assert_eq!(result.unwrap(), EXIT_PROBLEMS_FOUND);
    assert!(output.is_empty());
}

#[test]
fn json_check_report() {
    let temp_dir = tree();
    let (result, output) = run(&settings_for(temp_dir.path()), OutputFormat::Json);

    assert_eq!(result.unwrap(), EXIT_PROBLEMS_FOUND);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["missing"][0], "b.py");
    assert_eq!(json["extra"][0], "c.py");
    assert_eq!(json["exit_code"], 1);
}

#[test]
fn missing_catalog_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let (result, output) = run(&settings_for(temp_dir.path()), OutputFormat::Text);

    assert!(result.unwrap_err().is_catalog_error());
    assert!(output.is_empty());
}
