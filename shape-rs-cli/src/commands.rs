//! Command implementations shared by the binary and integration tests.
//!
//! Each command takes an already-merged [`Config`] and returns plain data;
//! printing is left to `main`.

use std::path::{Path, PathBuf};

use shape_rs::{Projector, ValidateError, ValidationErrors, Validator, Value};
use tracing::{debug, info};

use crate::config::{Config, ConfigManager};
use crate::error::{CliError, CliResult};
use crate::loader::{load_input, load_shapes, projection_path, require_shape};
use crate::writer::{FileWriter, WriteResult};

/// Outcome of `check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Number of shapes defined.
    pub shapes: usize,
    /// First reference cycle found, if any. Cycles are legal.
    pub cycle: Option<Vec<String>>,
}

/// Validate an input document against a named shape.
///
/// Returns the validated value. Rejected data becomes
/// [`CliError::Validation`] carrying one line per error.
pub fn run_validate(config: &Config, shape: &str, input: &Path) -> CliResult<Value> {
    let registry = load_shapes(&config.shapes.file)?;
    require_shape(&registry, shape)?;
    let data = load_input(input)?;

    debug!(shape, input = %input.display(), coerce = config.validation.coerce, "Validating");

    let validator = Validator::new(&registry).with_options(config.validation.clone());
    match validator.validate_shape(shape, &data) {
        Ok(validated) => Ok(validated),
        Err(ValidateError::Invalid(errors)) => Err(CliError::Validation(format_errors(&errors))),
        Err(ValidateError::Shape(err)) => Err(CliError::Shape(err)),
    }
}

/// Project a named shape to a JSON Schema document and write it.
///
/// Without `output`, the document goes to `<output.dir>/<shape>.schema.json`.
pub fn run_project(
    config: &Config,
    shape: &str,
    output: Option<&Path>,
    dry_run: bool,
) -> CliResult<WriteResult> {
    let registry = load_shapes(&config.shapes.file)?;
    require_shape(&registry, shape)?;

    let document = Projector::new(&registry)
        .with_options(config.projection.clone())
        .project_shape(shape)?;

    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| projection_path(&config.output.dir, shape));

    FileWriter::new(dry_run).write_json(&path, &document, config.output.pretty)
}

/// Check that every reference in the shape file resolves.
pub fn run_check(config: &Config) -> CliResult<CheckReport> {
    let registry = load_shapes(&config.shapes.file)?;
    registry.check_references()?;

    let cycle = registry.detect_cycles();
    if let Some(ref cycle) = cycle {
        info!(cycle = %cycle.join(" -> "), "Shapes are recursive");
    }

    Ok(CheckReport {
        shapes: registry.len(),
        cycle,
    })
}

/// Write a commented default configuration file.
pub fn run_init(output: &Path, force: bool) -> CliResult<WriteResult> {
    FileWriter::new(false)
        .with_overwrite(force)
        .write(output, ConfigManager::default_config_content())
}

/// Render validation errors one per line.
pub fn format_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|error| format!("  {}", error))
        .collect::<Vec<_>>()
        .join("\n")
}
