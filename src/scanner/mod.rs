mod filter;
mod walker;

pub use filter::{FileFilter, FilterVerdict, PathFilter, extension_of};
pub use walker::{DirectoryBatch, DirectoryWalker, is_under_ignored};
