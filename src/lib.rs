pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod reconcile;
pub mod scanner;
pub mod signature;

pub use error::{CatalogerError, Result};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_PROBLEMS_FOUND: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
