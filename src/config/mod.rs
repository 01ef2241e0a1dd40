mod loader;
mod model;
mod parser;

pub use loader::{ConfigSource, FileConfigLoader, FileSystem, LoadResult, RealFileSystem};
pub use model::{
    DEFAULT_CATALOG_FILE, DEFAULT_CONFIG_FILE, DEFAULT_EXTENSIONS, DEFAULT_IGNORED_DIRECTORIES,
    DEFAULT_VERBOSE, MAX_VERBOSE, ReportCategory, ReportFlags, Settings, SettingsOverrides,
};
pub use parser::{ConfigLine, ConfigParser, Section};
