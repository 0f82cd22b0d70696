//! Loading shape definitions and input documents from disk.
//!
//! Shape files are JSON or TOML documents of the form
//! `{ "schemas": [Schema, ...] }`, chosen by file extension.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use shape_rs::{Schema, ShapeRegistry, Value};
use tracing::debug;

use crate::error::{CliResult, LoadError};

/// Contents of a shape definition file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShapeFile {
    /// Schemas in file order.
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

impl ShapeFile {
    /// Build a registry, rejecting duplicate identities.
    pub fn into_registry(self, path: &Path) -> CliResult<ShapeRegistry> {
        let mut seen = HashSet::new();
        let mut registry = ShapeRegistry::new();
        for schema in self.schemas {
            if !seen.insert(schema.id.clone()) {
                return Err(LoadError::DuplicateShape {
                    path: path.to_path_buf(),
                    id: schema.id,
                }
                .into());
            }
            registry.register_schema(schema);
        }
        Ok(registry)
    }
}

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl Format {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Read and deserialize a JSON or TOML document.
fn read_document<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let format = Format::from_path(path)?;
    let content =
        std::fs::read_to_string(path).map_err(|e| LoadError::io(path.to_path_buf(), e))?;

    let parsed = match format {
        Format::Json => serde_json::from_str(&content).map_err(|e| LoadError::InvalidJson {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
        Format::Toml => toml::from_str(&content).map_err(|e| LoadError::InvalidToml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?,
    };
    Ok(parsed)
}

/// Load a shape file into a registry.
pub fn load_shapes(path: &Path) -> CliResult<ShapeRegistry> {
    let file: ShapeFile = read_document(path)?;
    debug!(path = %path.display(), schemas = file.schemas.len(), "Loaded shape file");
    file.into_registry(path)
}

/// Load an input document to validate.
pub fn load_input(path: &Path) -> CliResult<Value> {
    let json: serde_json::Value = read_document(path)?;
    Ok(Value::from(json))
}

/// Ensure a shape is registered, listing the known identities otherwise.
pub fn require_shape(registry: &ShapeRegistry, id: &str) -> Result<(), LoadError> {
    if registry.contains(id) {
        Ok(())
    } else {
        Err(LoadError::UnknownShape {
            id: id.to_string(),
            known: registry.identities().map(String::from).collect(),
        })
    }
}

/// Default output path for a projected shape.
pub fn projection_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.schema.json", id))
}
