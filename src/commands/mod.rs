mod check;
mod context;
mod create;

pub use check::{run_check, run_check_impl};
pub use context::{OutputOptions, load_settings, resolve_settings, write_report};
pub use create::{run_create, run_create_impl};
