//! # shape-rs-cli
//!
//! CLI library for validating data files against shape definitions and
//! projecting shapes to JSON Schema documents.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`loader`] - Shape file and input document loading
//! - [`commands`] - `validate`, `project`, `check` and `init`
//! - [`writer`] - File output and dry-run support
//! - [`error`] - Error types and handling

pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod writer;

// Re-export main types for convenience
pub use commands::{run_check, run_init, run_project, run_validate, CheckReport};
pub use config::{CliArgs, Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use loader::{load_input, load_shapes, ShapeFile};
pub use writer::{FileWriter, WriteResult};
