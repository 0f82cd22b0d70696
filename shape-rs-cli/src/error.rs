//! Error types for the CLI.
//!
//! This module defines all error types used throughout the CLI,
//! providing detailed error messages with context for debugging.

use std::path::PathBuf;

use shape_rs::ShapeError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error loading shape definitions or input data.
    #[error("Failed to load: {0}")]
    Load(#[from] LoadError),

    /// Misconfigured shape definitions.
    #[error("Invalid shape definitions: {0}")]
    Shape(#[from] ShapeError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Input data was rejected by the shape.
    #[error("Validation failed:\n{0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    ///
    /// Rejected input exits with 2 so scripts can tell it apart from
    /// misconfiguration and IO failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Validation(_) => 2,
            _ => 1,
        }
    }
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error loading a shape file or input document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File does not exist.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// File extension is neither `.json` nor `.toml`.
    #[error("Unsupported file format for {path}: expected .json or .toml")]
    UnsupportedFormat { path: PathBuf },

    /// Malformed JSON.
    #[error("Invalid JSON in {path}: {message}")]
    InvalidJson { path: PathBuf, message: String },

    /// Malformed TOML.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Two shapes share an identity.
    #[error("Duplicate shape '{id}' in {path}")]
    DuplicateShape { path: PathBuf, id: String },

    /// The requested shape is not defined.
    #[error("Shape '{id}' is not defined; known shapes: {}", .known.join(", "))]
    UnknownShape { id: String, known: Vec<String> },

    /// IO error reading the file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Target exists and overwriting was not requested.
    #[error("Refusing to overwrite existing file {path} (use --force)")]
    AlreadyExists { path: PathBuf },

    /// Failed to serialize a document.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}

impl LoadError {
    /// Create an IO error, mapping missing files to [`LoadError::NotFound`].
    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
