//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `shape-rs.toml` files
//! and merging with command-line arguments.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use shape_rs::{EngineConfig, ProjectionOptions, ValidationOptions};

use crate::error::{CliResult, ConfigError};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "shape-rs.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where shape definitions live.
    pub shapes: ShapesConfig,

    /// Validation engine options.
    pub validation: ValidationOptions,

    /// Projection engine options.
    pub projection: ProjectionOptions,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Shape definition source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShapesConfig {
    /// Shape definition file (`.json` or `.toml`).
    pub file: PathBuf,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for projected documents when no explicit output is given.
    pub dir: PathBuf,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("shapes.json"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./schemas"),
            pretty: true,
        }
    }
}

impl Config {
    /// Engine options for the core library.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            validation: self.validation.clone(),
            projection: self.projection.clone(),
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file; using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref shapes) = args.shapes {
            config.shapes.file = shapes.clone();
        }

        if let Some(coerce) = args.coerce {
            config.validation.coerce = coerce;
        }

        if let Some(ref key) = args.definitions_key {
            config.projection.definitions_key = key.clone();
        }

        if let Some(include) = args.include_schema_uri {
            config.projection.include_schema_uri = include;
        }

        if let Some(ref dir) = args.output_dir {
            config.output.dir = dir.clone();
        }

        if let Some(pretty) = args.pretty {
            config.output.pretty = pretty;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# shape-rs configuration file

[shapes]
# Shape definition file (.json or .toml) holding { schemas = [...] }
file = "shapes.json"

[validation]
# Convert representations before type checking ("42" -> 42, 7 -> "7")
coerce = false

[projection]
# Key holding referenced shapes; "$defs" is also common
definitions_key = "definitions"

# Emit the Draft-7 $schema URI on projected documents
include_schema_uri = false

[output]
# Directory for projected documents when --output is not given
dir = "./schemas"

# Pretty-print JSON output
pretty = true
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Shape file override.
    pub shapes: Option<PathBuf>,

    /// Coercion override.
    pub coerce: Option<bool>,

    /// Definitions key override.
    pub definitions_key: Option<String>,

    /// `$schema` URI override.
    pub include_schema_uri: Option<bool>,

    /// Output directory override.
    pub output_dir: Option<PathBuf>,

    /// Pretty-print override.
    pub pretty: Option<bool>,
}
