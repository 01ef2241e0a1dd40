use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::model::{DEFAULT_CONFIG_FILE, Settings};
use super::parser::ConfigParser;
use crate::error::{CatalogerError, Result};

/// Outcome of trying to open a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// The file was read; its lines are ready for parsing.
    Found { path: PathBuf, lines: Vec<String> },
    /// The default file is absent and none was requested; defaults stand.
    NotFoundSilent,
    /// An explicitly requested file is absent; defaults stand and the caller
    /// should warn.
    NotFoundWarn(PathBuf),
}

/// Result of loading configuration, leaving the decision to print any warning
/// to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    pub settings: Settings,
    /// Config file that was actually parsed, if any.
    pub loaded_from: Option<PathBuf>,
    /// Explicitly requested config file that does not exist.
    pub missing_explicit: Option<PathBuf>,
}

/// Trait for filesystem operations (for testability).
pub trait FileSystem {
    /// Read file contents as a string.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Get the current working directory.
    ///
    /// # Errors
    /// Returns an error if the current directory cannot be determined.
    fn current_dir(&self) -> std::io::Result<PathBuf>;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn current_dir(&self) -> std::io::Result<PathBuf> {
        std::env::current_dir()
    }
}

/// Loads the catalog config file.
///
/// Without an explicit path, `catalog.cfg` in the current directory is used when
/// it exists.
pub struct FileConfigLoader<F: FileSystem = RealFileSystem> {
    fs: F,
    parser: ConfigParser,
}

impl Default for FileConfigLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl FileConfigLoader<RealFileSystem> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl<F: FileSystem> FileConfigLoader<F> {
    #[must_use]
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            parser: ConfigParser::new(),
        }
    }

    fn default_config_path(&self) -> PathBuf {
        self.fs.current_dir().map_or_else(
            |_| PathBuf::from(DEFAULT_CONFIG_FILE),
            |dir| dir.join(DEFAULT_CONFIG_FILE),
        )
    }

    /// Open the config file according to the open policy.
    ///
    /// # Errors
    /// Returns `ConfigRead` for any failure other than the file being absent.
    pub fn open(&self, explicit: Option<&Path>) -> Result<ConfigSource> {
        let path = explicit.map_or_else(|| self.default_config_path(), Path::to_path_buf);

        match self.fs.read_to_string(&path) {
            Ok(content) => Ok(ConfigSource::Found {
                lines: content.lines().map(ToString::to_string).collect(),
                path,
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if explicit.is_some() {
                    Ok(ConfigSource::NotFoundWarn(path))
                } else {
                    Ok(ConfigSource::NotFoundSilent)
                }
            }
            Err(source) => Err(CatalogerError::ConfigRead { path, source }),
        }
    }

    /// Open and parse the config file on top of the built-in defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains an invalid line.
    pub fn load(&self, explicit: Option<&Path>) -> Result<LoadResult> {
        let mut result = LoadResult {
            settings: Settings::default(),
            loaded_from: None,
            missing_explicit: None,
        };

        match self.open(explicit)? {
            ConfigSource::Found { path, lines } => {
                self.parser
                    .parse_into(&mut result.settings, &lines)
                    .map_err(|e| match e {
                        CatalogerError::Config { message } => CatalogerError::config(format!(
                            "{message} (in '{}')",
                            path.display()
                        )),
                        other => other,
                    })?;
                tracing::debug!(path = %path.display(), "loaded config file");
                result.loaded_from = Some(path);
            }
            ConfigSource::NotFoundSilent => {}
            ConfigSource::NotFoundWarn(path) => result.missing_explicit = Some(path),
        }

        Ok(result)
    }
}

#[cfg(test)]
#[path = "loader_tests/mod.rs"]
mod tests;
