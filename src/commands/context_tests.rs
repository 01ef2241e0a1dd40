use std::fs;

use tempfile::TempDir;

use super::*;
use crate::config::{RealFileSystem, ReportFlags};
use crate::reconcile::RunAction;
use crate::signature::HashAlgorithm;

fn loader() -> FileConfigLoader<RealFileSystem> {
    FileConfigLoader::new()
}

fn text_options() -> OutputOptions {
    OutputOptions {
        format: OutputFormat::Text,
        color: ColorMode::Never,
    }
}

#[test]
fn explicit_config_is_layered_under_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("site.cfg");
    fs::write(&config, "[catalog]\nhash=sha256\ncatalog=site.cat\n[reports]\nverbose=2\n").unwrap();

    let overrides = SettingsOverrides {
        verbose: Some(0),
        ..SettingsOverrides::default()
    };
    let result = resolve_settings(&loader(), Some(&config), false, &overrides).unwrap();

    assert_eq!(result.settings.hash, HashAlgorithm::Sha256);
    assert_eq!(result.settings.catalog_name, "site.cat");
    assert_eq!(result.settings.verbose, 0);
    assert_eq!(result.loaded_from, Some(config));
}

#[test]
fn no_config_skips_the_file_entirely() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("broken.cfg");
    fs::write(&config, "[nonsense]\n").unwrap();

    let result =
        resolve_settings(&loader(), Some(&config), true, &SettingsOverrides::default()).unwrap();

    assert_eq!(result.settings, Settings::default());
    assert!(result.loaded_from.is_none());
}

#[test]
fn missing_explicit_config_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("absent.cfg");

    let result =
        resolve_settings(&loader(), Some(&config), false, &SettingsOverrides::default()).unwrap();

    assert_eq!(result.settings, Settings::default());
    assert_eq!(result.missing_explicit, Some(config));
}

#[test]
fn invalid_config_line_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.cfg");
    fs::write(&config, "[extensions]\n* .py\n").unwrap();

    let err = resolve_settings(&loader(), Some(&config), false, &SettingsOverrides::default())
        .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn overrides_can_empty_the_extension_set() {
    let overrides = SettingsOverrides {
        remove_extensions: crate::config::DEFAULT_EXTENSIONS
            .iter()
            .map(ToString::to_string)
            .collect(),
        ..SettingsOverrides::default()
    };

    let err = resolve_settings(&loader(), None, true, &overrides).unwrap_err();
    assert!(err.to_string().contains("No file extensions given"));
}

#[test]
fn streaming_needs_text_ungrouped_and_verbose() {
    let mut settings = Settings::default();
    assert!(!text_options().streams(&settings));

    settings.group = false;
    assert!(text_options().streams(&settings));

    settings.verbose = 0;
    assert!(!text_options().streams(&settings));

    settings.verbose = 2;
    let json = OutputOptions {
        format: OutputFormat::Json,
        ..text_options()
    };
    assert!(!json.streams(&settings));
}

#[test]
fn stream_sink_writes_lines_then_report() {
    let settings = Settings {
        group: false,
        ..Settings::default()
    };
    let mut summary = RunSummary::new(RunAction::Check, ReportFlags::default());
    summary.missing = vec!["b.py".to_string()];

    let mut out = Vec::new();
    let mut sink = StreamSink::new(text_options(), &settings, &mut out);
    sink.observe("a.py", EntryStatus::Processed);
    sink.observe("b.py", EntryStatus::Missing);
    sink.finish(text_options(), &settings, &summary).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("MISSING  : 'b.py'\nFiles processed:"));
    assert!(text.contains("Missing: 1\n"));
}

#[test]
fn grouped_sink_writes_only_the_report() {
    let settings = Settings::default();
    let summary = RunSummary::new(RunAction::Create, ReportFlags::default());

    let mut out = Vec::new();
    let mut sink = StreamSink::new(text_options(), &settings, &mut out);
    sink.observe("notes.md", EntryStatus::Excluded);
    sink.finish(text_options(), &settings, &summary).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Files cataloged: 0\n"));
    assert!(!text.contains("EXCLUDED"));
}

#[test]
fn json_report_ends_with_newline() {
    let summary = RunSummary::new(RunAction::Check, ReportFlags::default());
    let options = OutputOptions {
        format: OutputFormat::Json,
        color: ColorMode::Never,
    };

    let mut out = Vec::new();
    write_report(&mut out, options, &Settings::default(), &summary).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("}\n"));
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["action"], "check");
}
