use tempfile::TempDir;

use super::*;

const SIG_A: &str = "aaaa1111";
const SIG_B: &str = "bbbb2222";

fn catalog_of(text: &str) -> Catalog {
    Catalog::parse(text, "catalog.cat").unwrap()
}

// =============================================================================
// Path helpers
// =============================================================================

#[test]
fn split_root_file_defaults_to_dot() {
    assert_eq!(split_rel_path("a.py"), (".".to_string(), "a.py".to_string()));
}

#[test]
fn split_strips_leading_dot_slash() {
    assert_eq!(split_rel_path("./a.py"), (".".to_string(), "a.py".to_string()));
    assert_eq!(
        split_rel_path("./app/views.py"),
        ("app".to_string(), "views.py".to_string())
    );
}

#[test]
fn split_uses_final_separator() {
    assert_eq!(
        split_rel_path("app/templates/base.html"),
        ("app/templates".to_string(), "base.html".to_string())
    );
}

#[test]
fn split_keeps_hidden_directory_names() {
    assert_eq!(
        split_rel_path(".config/site.txt"),
        (".config".to_string(), "site.txt".to_string())
    );
}

#[test]
fn split_collapses_repeated_separators() {
    assert_eq!(
        split_rel_path("sub//a.py"),
        ("sub".to_string(), "a.py".to_string())
    );
    assert_eq!(
        split_rel_path("app/templates///base.html"),
        ("app/templates".to_string(), "base.html".to_string())
    );
    assert_eq!(split_rel_path("//a.py"), (".".to_string(), "a.py".to_string()));
}

#[test]
fn join_root_files_are_bare() {
    assert_eq!(join_rel_path(".", "a.py"), "a.py");
    assert_eq!(join_rel_path("app", "views.py"), "app/views.py");
}

// =============================================================================
// Parsing
// =============================================================================

#[test]
fn parse_builds_two_level_map() {
    let catalog = catalog_of("a.py\tAAAA1111\napp/views.py\tbbbb2222\n\n");

    assert_eq!(catalog.len(), 2);
    assert!(catalog.is_directory_known("."));
    assert!(catalog.is_directory_known("app"));
    assert!(catalog.is_file_known(".", "a.py"));
    assert!(catalog.is_file_known("app", "views.py"));
    assert!(!catalog.is_file_known("app", "a.py"));
    assert_eq!(catalog.signature_of(".", "a.py"), Some(SIG_A));
    assert_eq!(catalog.signature_of("app", "views.py"), Some(SIG_B));
}

#[test]
fn parse_dot_prefixed_paths_equal_bare_paths() {
    let catalog = catalog_of("./a.py\taaaa1111\n");
    assert!(catalog.is_file_known(".", "a.py"));
}

#[test]
fn parse_loaded_entries_start_unprocessed() {
    let catalog = catalog_of("a.py\taaaa1111\n");
    assert_eq!(catalog.status_of("a.py"), Some(EntryStatus::Unprocessed));
}

#[test]
fn parse_missing_tab_is_error_with_line_number() {
    let err = Catalog::parse("a.py\taaaa\nb.py bbbb\n", "catalog.cat").unwrap_err();
    assert!(err.is_catalog_error());
    assert_eq!(
        err.to_string(),
        "Catalog error: Invalid catalog format - missing tab on line 2"
    );
}

#[test]
fn parse_non_hex_signature_is_error() {
    let err = Catalog::parse("a.py\tnot-hex\n", "catalog.cat").unwrap_err();
    assert!(err.to_string().contains("invalid signature on line 1"));
}

#[test]
fn parse_extra_tab_in_signature_is_error() {
    assert!(Catalog::parse("a.py\taaaa\tbbbb\n", "catalog.cat").is_err());
}

#[test]
fn parse_empty_signature_is_error() {
    assert!(Catalog::parse("a.py\t\n", "catalog.cat").is_err());
}

#[test]
fn parse_empty_input_is_error() {
    let err = Catalog::parse("\n\n   \n", "deploy.cat").unwrap_err();
    assert_eq!(err.to_string(), "Catalog error: Empty catalog file: deploy.cat");
}

// =============================================================================
// Mutation and queries
// =============================================================================

#[test]
fn mark_status_upserts_unknown_entries() {
    let mut catalog = catalog_of("a.py\taaaa1111\n");
    catalog.mark_status("extra/new.py", EntryStatus::Extra);

    assert!(catalog.is_file_known("extra", "new.py"));
    assert_eq!(catalog.status_of("extra/new.py"), Some(EntryStatus::Extra));
    assert_eq!(catalog.signature_of("extra", "new.py"), None);
}

#[test]
fn mark_status_keeps_signature() {
    let mut catalog = catalog_of("a.py\taaaa1111\n");
    catalog.mark_status("a.py", EntryStatus::Processed);

    assert_eq!(catalog.signature_of(".", "a.py"), Some(SIG_A));
    assert_eq!(catalog.status_of("a.py"), Some(EntryStatus::Processed));
}

#[test]
fn unprocessed_filenames_skips_classified_entries() {
    let mut catalog = catalog_of("a.py\taaaa\nb.py\tbbbb\nc.py\tcccc\n");
    catalog.mark_status("b.py", EntryStatus::Processed);

    let remaining: Vec<&str> = catalog.unprocessed_filenames(".").collect();
    assert_eq!(remaining, vec!["a.py", "c.py"]);
    assert_eq!(catalog.unprocessed_filenames("nowhere").count(), 0);
}

#[test]
fn files_with_status_uses_bare_root_paths() {
    let mut catalog = catalog_of("a.py\taaaa\napp/b.py\tbbbb\n");
    catalog.mark_status("a.py", EntryStatus::Missing);
    catalog.mark_status("app/b.py", EntryStatus::Missing);

    assert_eq!(
        catalog.files_with_status(EntryStatus::Missing),
        vec!["a.py", "app/b.py"]
    );
}

#[test]
fn summary_by_directory_counts_statuses() {
    let mut catalog = catalog_of("a.py\taaaa\nb.py\tbbbb\napp/c.py\tcccc\n");
    catalog.mark_status("a.py", EntryStatus::Processed);
    catalog.mark_status("b.py", EntryStatus::Mismatch);
    catalog.mark_status("app/c.py", EntryStatus::Missing);
    catalog.mark_status("app/d.py", EntryStatus::Extra);

    let summary = catalog.summary_by_directory();
    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].path, ".");
    assert_eq!(summary[0].processed, 1);
    assert_eq!(summary[0].mismatch, 1);
    assert_eq!(summary[1].path, "app");
    assert_eq!(summary[1].missing, 1);
    assert_eq!(summary[1].extra, 1);
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn serialize_emits_only_added_entries_in_order() {
    let mut catalog = Catalog::new();
    catalog.add("a.py", SIG_A.to_string());
    catalog.mark_status("skip.bin", EntryStatus::Excluded);
    catalog.add("app/views.py", SIG_B.to_string());
    catalog.add("b.html", "cccc3333".to_string());

    let entries: Vec<(String, &str)> = catalog.serialize().collect();
    assert_eq!(
        entries,
        vec![
            ("a.py".to_string(), SIG_A),
            ("b.html".to_string(), "cccc3333"),
            ("app/views.py".to_string(), SIG_B),
        ]
    );
}

#[test]
fn write_to_formats_tab_separated_lines() {
    let mut catalog = Catalog::new();
    catalog.add("a.py", SIG_A.to_string());
    catalog.add("app/views.py", SIG_B.to_string());

    let mut out = Vec::new();
    let written = catalog.write_to(&mut out).unwrap();

    assert_eq!(written, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "a.py\taaaa1111\napp/views.py\tbbbb2222\n"
    );
}

#[test]
fn written_catalog_reloads_to_same_mapping() {
    let mut created = Catalog::new();
    created.add("a.py", SIG_A.to_string());
    created.add("app/views.py", SIG_B.to_string());
    created.add("app/deep/x.css", "cccc".to_string());

    let mut out = Vec::new();
    created.write_to(&mut out).unwrap();
    let loaded = Catalog::parse(&String::from_utf8(out).unwrap(), "mem").unwrap();

    for (path, signature) in created.serialize() {
        let (directory, file_name) = split_rel_path(&path);
        assert_eq!(loaded.signature_of(&directory, &file_name), Some(signature));
    }
    assert_eq!(loaded.len(), created.len());
}

// =============================================================================
// File I/O
// =============================================================================

#[test]
fn save_and_load_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.cat");

    let mut catalog = Catalog::new();
    catalog.add("a.py", SIG_A.to_string());
    assert_eq!(catalog.save(&path).unwrap(), 1);

    let loaded = Catalog::load(&path).unwrap();
    assert_eq!(loaded.signature_of(".", "a.py"), Some(SIG_A));
}

#[test]
fn load_missing_file_is_access_error() {
    let temp_dir = TempDir::new().unwrap();
    let err = Catalog::load(&temp_dir.path().join("absent.cat")).unwrap_err();

    assert!(matches!(err, CatalogerError::CatalogAccess { .. }));
    assert!(err.to_string().contains("absent.cat"));
}

#[test]
fn save_into_missing_directory_is_access_error() {
    let temp_dir = TempDir::new().unwrap();
    let mut catalog = Catalog::new();
    catalog.add("a.py", SIG_A.to_string());

    let err = catalog
        .save(&temp_dir.path().join("no/such/dir/catalog.cat"))
        .unwrap_err();
    assert!(matches!(err, CatalogerError::CatalogAccess { .. }));
}

#[test]
fn load_empty_file_is_catalog_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("catalog.cat");
    std::fs::write(&path, "").unwrap();

    let err = Catalog::load(&path).unwrap_err();
    assert!(matches!(err, CatalogerError::Catalog { .. }));
    assert!(err.to_string().contains("Empty catalog file"));
}
