//! Command-line driver over the syntax tree crates.
//!
//! All file and stream access goes through an [`Environment`], so the driver
//! runs unchanged against the real file system or an in-memory one.

mod config;
mod driver;
mod env;

pub use config::Config;
pub use driver::Driver;
pub use env::{Environment, MemoryEnvironment, OsEnvironment};
