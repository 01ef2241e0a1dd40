use std::path::PathBuf;

use super::*;

#[test]
fn error_display_config() {
    let err = CatalogerError::config("Unknown section title in config file: '[bogus]' on line 3");
    assert_eq!(
        err.to_string(),
        "Configuration error: Unknown section title in config file: '[bogus]' on line 3"
    );
}

#[test]
fn error_display_config_read_includes_path() {
    let err = CatalogerError::ConfigRead {
        path: PathBuf::from("catalog.cfg"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied"),
    };
    let message = err.to_string();
    assert!(message.contains("catalog.cfg"));
    assert!(message.contains("permission denied"));
}

#[test]
fn error_display_catalog_access_includes_os_message() {
    let err = CatalogerError::CatalogAccess {
        path: PathBuf::from("catalog.cat"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
    };
    let message = err.to_string();
    assert!(message.contains("catalog.cat"));
    assert!(message.contains("No such file or directory"));
}

#[test]
fn error_display_invalid_settings() {
    let err = CatalogerError::InvalidSettings(
        "No file extensions given to catalogue or check".to_string(),
    );
    assert_eq!(
        err.to_string(),
        "Invalid settings: No file extensions given to catalogue or check"
    );
}

#[test]
fn error_type_returns_category() {
    assert_eq!(CatalogerError::config("x").error_type(), "Config");
    assert_eq!(CatalogerError::catalog("x").error_type(), "Catalog");
    assert_eq!(
        CatalogerError::InvalidSettings("x".to_string()).error_type(),
        "Settings"
    );
    assert_eq!(
        CatalogerError::Io(std::io::Error::other("x")).error_type(),
        "IO"
    );
    assert_eq!(
        CatalogerError::ConfigRead {
            path: PathBuf::from("c.cfg"),
            source: std::io::Error::other("x"),
        }
        .error_type(),
        "Config"
    );
}

#[test]
fn category_predicates() {
    assert!(CatalogerError::config("x").is_config_error());
    assert!(!CatalogerError::config("x").is_catalog_error());
    assert!(CatalogerError::catalog("x").is_catalog_error());
    assert!(
        CatalogerError::CatalogAccess {
            path: PathBuf::from("catalog.cat"),
            source: std::io::Error::other("x"),
        }
        .is_catalog_error()
    );
}

#[test]
fn invalid_pattern_keeps_source() {
    let source = globset::Glob::new("[invalid").unwrap_err();
    let err = CatalogerError::InvalidPattern {
        pattern: "[invalid".to_string(),
        source,
    };
    assert!(std::error::Error::source(&err).is_some());
    assert!(err.to_string().contains("[invalid"));
}
