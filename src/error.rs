use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Unable to read config file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Unable to access catalog file '{}': {source}", path.display())]
    CatalogAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialize(#[from] serde_json::Error),
}

impl CatalogerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Short category label used when printing the error on stderr.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::Config { .. } | Self::ConfigRead { .. } => "Config",
            Self::Catalog { .. } | Self::CatalogAccess { .. } => "Catalog",
            Self::InvalidSettings(_) => "Settings",
            Self::InvalidPattern { .. } => "Pattern",
            Self::Io(_) => "IO",
            Self::JsonSerialize(_) => "JSON",
        }
    }

    /// True for malformed or unreadable configuration files.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::ConfigRead { .. })
    }

    /// True for malformed or inaccessible catalog files.
    #[must_use]
    pub const fn is_catalog_error(&self) -> bool {
        matches!(self, Self::Catalog { .. } | Self::CatalogAccess { .. })
    }
}

pub type Result<T> = std::result::Result<T, CatalogerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
